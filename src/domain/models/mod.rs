//! Domain models

pub mod clouds;
pub mod config;
pub mod identity;

pub use clouds::{AuthSection, CloudEntry, CloudsConfig, DEFAULT_USER_DOMAIN, TOKEN_AUTH_TYPE};
pub use config::{HttpConfig, LoggingConfig, Settings};
pub use identity::{IdentityEndpoint, PasswordCredentials};
