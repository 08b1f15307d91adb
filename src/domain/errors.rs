//! Domain errors for the os-mfa token exchange.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Format a list of searched directories as `a, b, c`.
fn format_search_path(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while locating configs, exchanging credentials
/// for a token, or rewriting `clouds.yaml`.
#[derive(Debug, Error)]
pub enum MfaError {
    /// No active cloud: `OS_CLOUD` is unset or empty
    #[error("$OS_CLOUD must be set in your environment")]
    CloudNotSet,

    /// No search directory holds the file
    #[error("{name} not found in any of: {}", format_search_path(.searched))]
    ConfigNotFound { name: String, searched: Vec<PathBuf> },

    /// A config file is not valid YAML for the expected shape
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The active cloud is missing from the static config
    #[error("Cloud '{cloud}' not found in {}", .path.display())]
    CloudNotFound { cloud: String, path: PathBuf },

    /// `auth_url` or `project_id` is absent
    #[error("Cloud '{cloud}' is missing auth.{field}")]
    MissingAuthField { cloud: String, field: &'static str },

    /// A value needed in non-interactive mode was not supplied
    #[error("No {0} supplied and prompting is disabled")]
    MissingCredential(&'static str),

    /// Terminal I/O failed while prompting
    #[error("Failed to read from terminal: {0}")]
    Prompt(#[source] std::io::Error),

    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response in strict mode
    #[error("Identity service rejected the request with status {status}")]
    AuthenticationFailed { status: u16 },

    /// No `x-subject-token` header in strict mode
    #[error("Identity service response did not include an x-subject-token header")]
    MissingToken,
}

impl MfaError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True when the error means the requested file simply is not there.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ConfigNotFound { .. })
    }
}

/// Result alias for the domain
pub type MfaResult<T> = Result<T, MfaError>;
