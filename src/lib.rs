//! os-mfa - OpenStack MFA token helper
//!
//! Exchanges a username, password and optional one-time MFA code for a
//! Keystone token and writes it into `clouds.yaml`, keeping the long-lived
//! credentials in `static-clouds.yaml` so they only have to be entered once.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): `clouds.yaml` models, errors and ports
//! - **Service Layer** (`services`): the locate → load → fetch → rewrite pipeline
//! - **Infrastructure Layer** (`infrastructure`): config files, Keystone
//!   client, credential prompts, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use os_mfa::{ConfigLocator, KeystoneClient, SuppliedCredentials, TokenRefreshService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = TokenRefreshService::new(ConfigLocator::from_env(), Arc::new(KeystoneClient::new()?));
//!     let mut creds = SuppliedCredentials::new(None, None, Some("123456".into()));
//!     service.refresh("dev", &mut creds).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{MfaError, MfaResult};
pub use domain::models::{
    AuthSection, CloudEntry, CloudsConfig, IdentityEndpoint, PasswordCredentials, Settings,
};
pub use domain::ports::{CredentialProvider, TokenIssuer};
pub use infrastructure::config::{ConfigError, ConfigLoader, ConfigLocator, ConfigStore};
pub use infrastructure::credentials::{InteractiveCredentials, SuppliedCredentials};
pub use infrastructure::identity::{KeystoneClient, KeystoneClientConfig};
pub use services::{RefreshOutcome, TokenRefreshService};
