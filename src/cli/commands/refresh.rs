//! Implementation of the `os-mfa` token refresh.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::MfaError;
use crate::domain::ports::CredentialProvider;
use crate::infrastructure::config::{ConfigLoader, ConfigLocator};
use crate::infrastructure::credentials::{InteractiveCredentials, SuppliedCredentials};
use crate::infrastructure::identity::KeystoneClient;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{RefreshOutcome, TokenRefreshService};

// Flags for the refresh; a doc comment here would become clap help text
#[allow(missing_docs)]
#[derive(Args, Debug, Default)]
pub struct RefreshArgs {
    /// Cloud entry to authenticate
    #[arg(long, env = "OS_CLOUD")]
    pub cloud: Option<String>,

    /// Directory searched before ., ~/.config/openstack and /etc/openstack
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Never prompt; take missing values from --username, --password, --mfa-code
    #[arg(long)]
    pub non_interactive: bool,

    /// Username used when the static config has none
    #[arg(long, requires = "non_interactive")]
    pub username: Option<String>,

    /// Password used when the static config has none
    #[arg(long, requires = "non_interactive")]
    pub password: Option<String>,

    /// One-time MFA code appended to the password
    #[arg(long, requires = "non_interactive")]
    pub mfa_code: Option<String>,

    /// Identity request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fail instead of writing a null token when authentication is rejected
    #[arg(long)]
    pub require_token: bool,
}

impl RefreshArgs {
    /// Active cloud name; unset and empty are both rejected.
    pub fn cloud_name(&self) -> Result<String, MfaError> {
        self.cloud
            .clone()
            .filter(|cloud| !cloud.is_empty())
            .ok_or(MfaError::CloudNotSet)
    }
}

/// Summary printed after a successful refresh
#[derive(Debug, serde::Serialize)]
pub struct RefreshOutput {
    /// Always `true`; failures go through `handle_error`
    pub success: bool,
    /// What the refresh did
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

impl CommandOutput for RefreshOutput {
    fn to_human(&self) -> String {
        let outcome = &self.outcome;
        let mut lines = vec![];
        if outcome.static_created {
            lines.push(format!(
                "Created {} from {}",
                outcome.static_config.display(),
                outcome.live_config.display()
            ));
        }
        lines.push(format!(
            "Updated {} with a token for cloud '{}'",
            outcome.live_config.display(),
            outcome.cloud
        ));
        if !outcome.token_present {
            lines.push(
                "Warning: the identity service returned no token; auth.token is null".to_string(),
            );
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run one token refresh and print its summary.
pub async fn execute(args: RefreshArgs, json_mode: bool) -> Result<()> {
    // Checked before anything touches the filesystem
    let cloud = args.cloud_name()?;

    let mut settings = ConfigLoader::load()?;
    if let Some(timeout) = args.timeout {
        settings.http.timeout_secs = timeout;
    }
    if args.require_token {
        settings.http.require_token = true;
    }
    ConfigLoader::validate(&settings)?;

    let _logger = LoggerImpl::init(&settings.logging)?;

    let mut locator = ConfigLocator::from_env();
    if let Some(dir) = args.config_dir {
        locator = locator.with_priority_dir(dir);
    }

    let issuer = KeystoneClient::with_config(settings.http.into())
        .context("Failed to build identity client")?;
    let service = TokenRefreshService::new(locator, Arc::new(issuer));

    let mut credentials: Box<dyn CredentialProvider> = if args.non_interactive {
        Box::new(SuppliedCredentials::new(
            args.username,
            args.password,
            args.mfa_code,
        ))
    } else {
        Box::new(InteractiveCredentials::new(json_mode))
    };

    let outcome = service.refresh(&cloud, credentials.as_mut()).await?;

    output(
        &RefreshOutput {
            success: true,
            outcome,
        },
        json_mode,
    );
    Ok(())
}
