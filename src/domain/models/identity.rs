//! Identity service request inputs.

use std::fmt;

/// Where to authenticate: the Keystone base URL and the project to scope to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEndpoint {
    /// Keystone base URL, e.g. `https://keystone.example.com:5000`
    pub auth_url: String,
    /// Project the token is scoped to
    pub project_id: String,
}

impl IdentityEndpoint {
    /// Endpoint for `auth_url`, scoped to `project_id`.
    pub fn new(auth_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            project_id: project_id.into(),
        }
    }

    /// `{auth_url}/v3/auth/tokens`, with a single trailing slash on
    /// `auth_url` ignored.
    pub fn token_url(&self) -> String {
        let base = self.auth_url.strip_suffix('/').unwrap_or(&self.auth_url);
        format!("{base}/v3/auth/tokens")
    }
}

/// Password identity for one token request.
///
/// `password` already has the MFA code appended.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredentials {
    /// User name sent as `user.name`
    pub username: String,
    /// Password with the MFA code appended
    pub password: String,
    /// Domain sent as `user.domain.name`
    pub user_domain_name: String,
}

impl PasswordCredentials {
    /// Build credentials, appending `mfa_code` to `password` with no separator.
    pub fn with_mfa(
        username: impl Into<String>,
        password: &str,
        mfa_code: &str,
        user_domain_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: format!("{password}{mfa_code}"),
            user_domain_name: user_domain_name.into(),
        }
    }
}

impl fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("user_domain_name", &self.user_domain_name)
            .finish()
    }
}
