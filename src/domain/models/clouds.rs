//! Typed view of an OpenStack `clouds.yaml` document.
//!
//! Only the keys this tool reads or rewrites are modelled; everything else is
//! carried through `extra` so a load/save cycle never drops user settings
//! such as `region_name` or `identity_api_version`.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use super::identity::IdentityEndpoint;
use crate::domain::errors::{MfaError, MfaResult};

/// Domain used when an entry does not name one.
pub const DEFAULT_USER_DOMAIN: &str = "Default";

/// `auth_type` value written into the live config.
pub const TOKEN_AUTH_TYPE: &str = "token";

/// Root of a `clouds.yaml` / `static-clouds.yaml` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudsConfig {
    /// Cloud entries by name
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudEntry>,

    /// Keys this tool does not interpret, preserved as-is
    #[serde(flatten)]
    pub extra: Mapping,
}

/// One named cloud under `clouds:`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudEntry {
    /// `token` in the live config; usually absent in the static one
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_type: Option<String>,

    /// Credentials and endpoint
    #[serde(default)]
    pub auth: AuthSection,

    /// Keys this tool does not interpret, preserved as-is
    #[serde(flatten)]
    pub extra: Mapping,
}

/// The `auth:` block of a cloud entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSection {
    /// Keystone base URL
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_url: Option<String>,

    /// Project the token is scoped to
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,

    /// Domain of the user; `Default` when absent
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_domain_name: Option<String>,

    /// Long-lived user name; kept only in the static config
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    /// Long-lived password; kept only in the static config
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,

    /// `None` when the key is absent, `Some(None)` for an explicit `token: null`.
    #[serde(
        default,
        deserialize_with = "present_token",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Option<String>>,

    /// Keys this tool does not interpret, preserved as-is
    #[serde(flatten)]
    pub extra: Mapping,
}

impl CloudsConfig {
    /// Look up a cloud entry by name.
    pub fn cloud(&self, name: &str) -> Option<&CloudEntry> {
        self.clouds.get(name)
    }

    /// Derive the static (long-lived) copy of this document.
    ///
    /// `auth_type` and `auth.token` are removed from every entry; usernames
    /// and passwords are kept.
    #[must_use]
    pub fn to_static(&self) -> Self {
        let mut config = self.clone();
        for entry in config.clouds.values_mut() {
            entry.strip_token_auth();
        }
        config
    }

    /// Switch `cloud` to token auth, seeding the entry from `seed` when the
    /// document does not have it yet.
    pub fn apply_token(&mut self, cloud: &str, token: Option<String>, seed: &CloudEntry) {
        self.clouds
            .entry(cloud.to_string())
            .or_insert_with(|| seed.clone())
            .apply_token(token);
    }
}

impl CloudEntry {
    /// Remove the fields that only make sense for an ephemeral token config.
    pub fn strip_token_auth(&mut self) {
        self.auth_type = None;
        self.auth.token = None;
    }

    /// Replace password auth with `token` auth.
    pub fn apply_token(&mut self, token: Option<String>) {
        self.auth_type = Some(TOKEN_AUTH_TYPE.to_string());
        self.auth.token = Some(token);
        self.auth.username = None;
        self.auth.password = None;
        self.auth.user_domain_name = None;
    }

    /// Identity endpoint for this entry; both `auth_url` and `project_id`
    /// must be present.
    pub fn endpoint(&self, cloud: &str) -> MfaResult<IdentityEndpoint> {
        let missing = |field| MfaError::MissingAuthField {
            cloud: cloud.to_string(),
            field,
        };
        let auth_url = self.auth.auth_url.clone().ok_or_else(|| missing("auth_url"))?;
        let project_id = self
            .auth
            .project_id
            .clone()
            .ok_or_else(|| missing("project_id"))?;
        Ok(IdentityEndpoint::new(auth_url, project_id))
    }

    /// `auth.user_domain_name`, or `Default`.
    pub fn user_domain_name(&self) -> &str {
        self.auth
            .user_domain_name
            .as_deref()
            .unwrap_or(DEFAULT_USER_DOMAIN)
    }
}

/// Accept any YAML scalar where a string is expected, so an unquoted
/// `password: 123456` still loads.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {other:?}"
        ))),
    }
}

fn present_token<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Some)
}
