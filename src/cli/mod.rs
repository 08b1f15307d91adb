//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

pub use types::Cli;

/// Report a failed run and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        output::print_json(&output::error_json(&err));
    }
    eprintln!("Error: {err:#}");
    std::process::exit(1);
}
