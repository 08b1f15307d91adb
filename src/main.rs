//! os-mfa CLI entry point.

use clap::Parser;

use os_mfa::cli::{commands, handle_error, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = commands::refresh::execute(cli.refresh, cli.json).await {
        handle_error(err, cli.json);
    }
}
