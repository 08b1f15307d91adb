//! Seams between the pipeline and the outside world.

use async_trait::async_trait;

use super::errors::MfaResult;
use super::models::{IdentityEndpoint, PasswordCredentials};

/// Exchanges password credentials for a token
///
/// Implemented by the Keystone HTTP client; tests substitute fakes.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Request a project-scoped token
    ///
    /// # Returns
    /// * `Ok(Some(token))` when the service returned a token
    /// * `Ok(None)` when the response carried no token (unless the
    ///   implementation is configured to treat that as an error)
    /// * `Err(MfaError)` on transport failure
    async fn issue_token(
        &self,
        endpoint: &IdentityEndpoint,
        credentials: &PasswordCredentials,
    ) -> MfaResult<Option<String>>;
}

/// Source of credentials that are not stored in the static config
///
/// Called only for values the static config lacks; `mfa_code` is always
/// requested.
pub trait CredentialProvider {
    /// User name, when the static config has none
    fn username(&mut self) -> MfaResult<String>;

    /// Password for `username`, when the static config has none
    fn password(&mut self, username: &str) -> MfaResult<String>;

    /// One-time code appended to the password; empty to skip
    fn mfa_code(&mut self) -> MfaResult<String>;
}
