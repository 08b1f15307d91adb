//! CLI type definitions
//!
//! This module contains the clap structure that defines the CLI interface.

use clap::Parser;

use super::commands::refresh::RefreshArgs;

/// Top-level `os-mfa` command line
#[derive(Parser, Debug)]
#[command(name = "os-mfa")]
#[command(
    about = "Exchange OpenStack password + MFA credentials for a token in clouds.yaml",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[allow(missing_docs)]
    #[command(flatten)]
    pub refresh: RefreshArgs,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}
