//! Keystone v3 token client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as ReqwestClient;
use tracing::{debug, instrument, warn, Level};

use super::types::AuthRequest;
use crate::domain::errors::{MfaError, MfaResult};
use crate::domain::models::{HttpConfig, IdentityEndpoint, PasswordCredentials};
use crate::domain::ports::TokenIssuer;
use crate::infrastructure::logging::SecretScrubber;

/// Response header carrying the issued token.
pub const SUBJECT_TOKEN_HEADER: &str = "x-subject-token";

/// Configuration for the Keystone client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoneClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Turn a rejected request or a missing token header into an error
    pub require_token: bool,
}

impl Default for KeystoneClientConfig {
    fn default() -> Self {
        HttpConfig::default().into()
    }
}

impl From<HttpConfig> for KeystoneClientConfig {
    fn from(config: HttpConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
            require_token: config.require_token,
        }
    }
}

/// HTTP client for the Keystone v3 token API
///
/// Sends exactly one request per call; there is no retry.
pub struct KeystoneClient {
    http_client: ReqwestClient,
    require_token: bool,
    scrubber: SecretScrubber,
}

impl KeystoneClient {
    /// Create a client with default configuration (30s timeout, lenient)
    pub fn new() -> MfaResult<Self> {
        Self::with_config(KeystoneClientConfig::default())
    }

    /// Create a client with explicit timeout and strictness.
    pub fn with_config(config: KeystoneClientConfig) -> MfaResult<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            require_token: config.require_token,
            scrubber: SecretScrubber::new(),
        })
    }
}

#[async_trait]
impl TokenIssuer for KeystoneClient {
    #[instrument(
        skip(self, endpoint, credentials),
        fields(url = %endpoint.token_url(), user = %credentials.username)
    )]
    async fn issue_token(
        &self,
        endpoint: &IdentityEndpoint,
        credentials: &PasswordCredentials,
    ) -> MfaResult<Option<String>> {
        let body = AuthRequest::password(endpoint, credentials);
        if tracing::enabled!(Level::DEBUG) {
            let logged = self.scrubber.scrub_message(&redacted_body(endpoint, credentials));
            debug!(body = %logged, "sending token request");
        }

        let response = self
            .http_client
            .post(endpoint.token_url())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        debug!(
            status = status.as_u16(),
            token_present = token.is_some(),
            "identity service responded"
        );

        if !status.is_success() {
            if self.require_token {
                return Err(MfaError::AuthenticationFailed {
                    status: status.as_u16(),
                });
            }
            warn!(status = status.as_u16(), "identity service returned an error status");
        }

        if token.is_none() {
            if self.require_token {
                return Err(MfaError::MissingToken);
            }
            warn!("response has no {SUBJECT_TOKEN_HEADER} header; the token will be written as null");
        }

        Ok(token)
    }
}

/// The request body with the password (and MFA code) replaced, for logging.
fn redacted_body(endpoint: &IdentityEndpoint, credentials: &PasswordCredentials) -> String {
    let redacted = PasswordCredentials {
        password: "[REDACTED]".to_string(),
        ..credentials.clone()
    };
    serde_json::to_string(&AuthRequest::password(endpoint, &redacted)).unwrap_or_default()
}
