//! The os-mfa pipeline: locate → load → fetch → rewrite.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::credential_rewriter::rewrite_live_config;
use crate::domain::errors::{MfaError, MfaResult};
use crate::domain::models::PasswordCredentials;
use crate::domain::ports::{CredentialProvider, TokenIssuer};
use crate::infrastructure::config::{
    ConfigLocator, ConfigStore, LIVE_CONFIG_FILES, STATIC_CONFIG_FILE,
};

/// What a refresh did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    /// Cloud entry that was refreshed
    pub cloud: String,
    /// Directory holding both config files
    pub config_dir: PathBuf,
    /// Path of `static-clouds.yaml`
    pub static_config: PathBuf,
    /// Path of the rewritten live config
    pub live_config: PathBuf,
    /// `static-clouds.yaml` was derived from `clouds.yaml` on this run
    pub static_created: bool,
    /// The identity service returned a token (otherwise `token: null` was written)
    pub token_present: bool,
}

/// Exchanges long-lived credentials for a token and writes it into
/// `clouds.yaml`
pub struct TokenRefreshService<I: TokenIssuer> {
    locator: ConfigLocator,
    issuer: Arc<I>,
}

impl<I: TokenIssuer> TokenRefreshService<I> {
    /// Service searching `locator` and requesting tokens from `issuer`.
    pub const fn new(locator: ConfigLocator, issuer: Arc<I>) -> Self {
        Self { locator, issuer }
    }

    /// Run the full exchange for `cloud`.
    ///
    /// Username and password come from the static config; `credentials` is
    /// asked only for values it lacks, and always for the MFA code.
    #[instrument(skip(self, credentials))]
    pub async fn refresh(
        &self,
        cloud: &str,
        credentials: &mut dyn CredentialProvider,
    ) -> MfaResult<RefreshOutcome> {
        let (config_dir, static_created) = self.ensure_static_config()?;
        let static_path = config_dir.join(STATIC_CONFIG_FILE);
        let static_config = ConfigStore::load(&static_path)?;

        let entry = static_config
            .cloud(cloud)
            .ok_or_else(|| MfaError::CloudNotFound {
                cloud: cloud.to_string(),
                path: static_path.clone(),
            })?;
        let endpoint = entry.endpoint(cloud)?;

        let username = match entry.auth.username {
            Some(ref username) => username.clone(),
            None => credentials.username()?,
        };
        let password = match entry.auth.password {
            Some(ref password) => password.clone(),
            None => credentials.password(&username)?,
        };
        let mfa_code = credentials.mfa_code()?;
        let password_credentials = PasswordCredentials::with_mfa(
            username,
            &password,
            &mfa_code,
            entry.user_domain_name(),
        );

        info!("Getting token...");
        let token = self
            .issuer
            .issue_token(&endpoint, &password_credentials)
            .await?;
        let token_present = token.is_some();

        let live_config = rewrite_live_config(&config_dir, cloud, token, &static_config)?;

        Ok(RefreshOutcome {
            cloud: cloud.to_string(),
            config_dir,
            static_config: static_path,
            live_config,
            static_created,
            token_present,
        })
    }

    /// Find `static-clouds.yaml`, deriving it from `clouds.yaml` the first
    /// time.
    ///
    /// Returns the directory holding it and whether it was just created.
    /// An existing static config is never regenerated.
    pub fn ensure_static_config(&self) -> MfaResult<(PathBuf, bool)> {
        match self.locator.locate(STATIC_CONFIG_FILE) {
            Ok(dir) => Ok((dir, false)),
            Err(err) if err.is_not_found() => {
                info!("{STATIC_CONFIG_FILE} not found");
                let (dir, live_name) = self.locator.locate_any(&LIVE_CONFIG_FILES)?;
                let live = ConfigStore::load(dir.join(live_name))?;

                let static_path = dir.join(STATIC_CONFIG_FILE);
                info!("Creating {}", static_path.display());
                ConfigStore::save(&static_path, &live.to_static())?;
                Ok((dir, true))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CloudsConfig, IdentityEndpoint, TOKEN_AUTH_TYPE};
    use crate::infrastructure::config::LIVE_CONFIG_FILE;
    use crate::infrastructure::credentials::SuppliedCredentials;
    use async_trait::async_trait;
    use serde_yaml::Value;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Issuer that records requests and returns a fixed token
    struct FakeIssuer {
        token: Option<String>,
        requests: Mutex<Vec<(IdentityEndpoint, PasswordCredentials)>>,
    }

    impl FakeIssuer {
        fn returning(token: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                token: token.map(str::to_string),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(IdentityEndpoint, PasswordCredentials)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenIssuer for FakeIssuer {
        async fn issue_token(
            &self,
            endpoint: &IdentityEndpoint,
            credentials: &PasswordCredentials,
        ) -> MfaResult<Option<String>> {
            self.requests
                .lock()
                .unwrap()
                .push((endpoint.clone(), credentials.clone()));
            Ok(self.token.clone())
        }
    }

    const DEV_CLOUDS: &str = r"
clouds:
  dev:
    auth:
      username: a
      password: b
      auth_url: U
      project_id: P
";

    fn service(dirs: &[&Path], issuer: Arc<FakeIssuer>) -> TokenRefreshService<FakeIssuer> {
        let locator = ConfigLocator::new(dirs.iter().map(|d| d.to_path_buf()).collect());
        TokenRefreshService::new(locator, issuer)
    }

    fn mfa(code: &str) -> SuppliedCredentials {
        SuppliedCredentials::new(None, None, Some(code.to_string()))
    }

    fn raw_yaml(path: &Path) -> Value {
        serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_bootstraps_static_and_rewrites_live() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIVE_CONFIG_FILE), DEV_CLOUDS).unwrap();
        let issuer = FakeIssuer::returning(Some("T0K3N"));
        let svc = service(&[dir.path()], issuer.clone());

        let outcome = svc.refresh("dev", &mut mfa("123456")).await.unwrap();

        assert!(outcome.static_created);
        assert!(outcome.token_present);
        assert_eq!(outcome.config_dir, dir.path());

        // Static config keeps the long-lived credentials
        let static_yaml = raw_yaml(&dir.path().join(STATIC_CONFIG_FILE));
        assert_eq!(static_yaml["clouds"]["dev"]["auth"]["username"], "a");
        assert_eq!(static_yaml["clouds"]["dev"]["auth"]["password"], "b");

        // One request with the MFA code appended to the password
        let requests = issuer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, IdentityEndpoint::new("U", "P"));
        assert_eq!(requests[0].1.username, "a");
        assert_eq!(requests[0].1.password, "b123456");
        assert_eq!(requests[0].1.user_domain_name, "Default");

        // Live config holds exactly the token form of the entry
        let live = raw_yaml(&dir.path().join(LIVE_CONFIG_FILE));
        let expected: Value = serde_yaml::from_str(
            "clouds:\n  dev:\n    auth_type: token\n    auth:\n      auth_url: U\n      project_id: P\n      token: T0K3N\n",
        )
        .unwrap();
        assert_eq!(live, expected);
    }

    #[tokio::test]
    async fn test_existing_static_is_never_rederived() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIVE_CONFIG_FILE), DEV_CLOUDS).unwrap();
        let svc = service(&[dir.path()], FakeIssuer::returning(Some("first")));
        svc.refresh("dev", &mut mfa("")).await.unwrap();
        let static_path = dir.path().join(STATIC_CONFIG_FILE);
        let static_before = fs::read_to_string(&static_path).unwrap();

        // clouds.yaml now only holds token auth; a second run must still work
        let svc = service(&[dir.path()], FakeIssuer::returning(Some("second")));
        let outcome = svc.refresh("dev", &mut mfa("")).await.unwrap();

        assert!(!outcome.static_created);
        assert_eq!(fs::read_to_string(&static_path).unwrap(), static_before);
        let live = ConfigStore::load(dir.path().join(LIVE_CONFIG_FILE)).unwrap();
        assert_eq!(
            live.cloud("dev").unwrap().auth.token,
            Some(Some("second".to_string()))
        );
    }

    #[tokio::test]
    async fn test_static_never_contains_token_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(LIVE_CONFIG_FILE),
            r"
clouds:
  dev:
    auth_type: token
    auth:
      auth_url: U
      project_id: P
      username: a
      password: b
      token: stale
  prod:
    auth_type: v3password
    auth:
      auth_url: V
      token: stale-too
",
        )
        .unwrap();
        let svc = service(&[dir.path()], FakeIssuer::returning(Some("t")));

        svc.refresh("dev", &mut mfa("")).await.unwrap();

        let static_config = ConfigStore::load(dir.path().join(STATIC_CONFIG_FILE)).unwrap();
        for entry in static_config.clouds.values() {
            assert!(entry.auth_type.is_none());
            assert!(entry.auth.token.is_none());
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_written_as_null() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIVE_CONFIG_FILE), DEV_CLOUDS).unwrap();
        let svc = service(&[dir.path()], FakeIssuer::returning(None));

        let outcome = svc.refresh("dev", &mut mfa("")).await.unwrap();

        assert!(!outcome.token_present);
        let live = raw_yaml(&dir.path().join(LIVE_CONFIG_FILE));
        assert_eq!(live["clouds"]["dev"]["auth"]["token"], Value::Null);
        assert_eq!(live["clouds"]["dev"]["auth_type"], TOKEN_AUTH_TYPE);
    }

    #[tokio::test]
    async fn test_prompts_only_for_missing_credentials() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(STATIC_CONFIG_FILE),
            "clouds:\n  dev:\n    auth:\n      auth_url: U\n      project_id: P\n      user_domain_name: Corp\n",
        )
        .unwrap();
        let issuer = FakeIssuer::returning(Some("t"));
        let svc = service(&[dir.path()], issuer.clone());
        let mut creds = SuppliedCredentials::new(
            Some("carol".to_string()),
            Some("pw".to_string()),
            Some("42".to_string()),
        );

        let outcome = svc.refresh("dev", &mut creds).await.unwrap();

        assert!(!outcome.static_created);
        let request = &issuer.requests()[0].1;
        assert_eq!(request.username, "carol");
        assert_eq!(request.password, "pw42");
        assert_eq!(request.user_domain_name, "Corp");
        // No clouds.yaml existed, so it is created from the static config
        assert!(dir.path().join(LIVE_CONFIG_FILE).is_file());
    }

    #[tokio::test]
    async fn test_headless_without_password_fails_before_request() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(STATIC_CONFIG_FILE),
            "clouds:\n  dev:\n    auth:\n      auth_url: U\n      project_id: P\n      username: a\n",
        )
        .unwrap();
        let issuer = FakeIssuer::returning(Some("t"));
        let svc = service(&[dir.path()], issuer.clone());

        let err = svc.refresh("dev", &mut mfa("")).await.unwrap_err();

        assert!(matches!(err, MfaError::MissingCredential("password")));
        assert!(issuer.requests().is_empty());
        assert!(!dir.path().join(LIVE_CONFIG_FILE).exists());
    }

    #[tokio::test]
    async fn test_unknown_cloud() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIVE_CONFIG_FILE), DEV_CLOUDS).unwrap();
        let svc = service(&[dir.path()], FakeIssuer::returning(Some("t")));

        match svc.refresh("staging", &mut mfa("")).await {
            Err(MfaError::CloudNotFound { cloud, .. }) => assert_eq!(cloud, "staging"),
            other => panic!("Expected CloudNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_config_anywhere() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let svc = service(&[first.path(), second.path()], FakeIssuer::returning(Some("t")));

        match svc.refresh("dev", &mut mfa("")).await {
            Err(MfaError::ConfigNotFound { name, searched }) => {
                assert_eq!(name, "clouds.yaml or clouds.yml");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("Expected ConfigNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_live_config_follows_static_directory() {
        let user_dir = TempDir::new().unwrap();
        let system_dir = TempDir::new().unwrap();
        fs::write(system_dir.path().join(STATIC_CONFIG_FILE), DEV_CLOUDS).unwrap();
        fs::write(user_dir.path().join(LIVE_CONFIG_FILE), "clouds: {}\n").unwrap();
        let svc = service(
            &[user_dir.path(), system_dir.path()],
            FakeIssuer::returning(Some("t")),
        );

        let outcome = svc.refresh("dev", &mut mfa("")).await.unwrap();

        assert_eq!(outcome.config_dir, system_dir.path());
        assert_eq!(outcome.live_config, system_dir.path().join(LIVE_CONFIG_FILE));
        // The clouds.yaml in the other directory is not touched
        let untouched: CloudsConfig =
            ConfigStore::load(user_dir.path().join(LIVE_CONFIG_FILE)).unwrap();
        assert!(untouched.clouds.is_empty());
    }

    #[tokio::test]
    async fn test_bootstraps_from_clouds_yml() {
        let dir = TempDir::new().unwrap();
        let yml = dir.path().join("clouds.yml");
        fs::write(&yml, DEV_CLOUDS).unwrap();
        let svc = service(&[dir.path()], FakeIssuer::returning(Some("T0K3N")));

        let outcome = svc.refresh("dev", &mut mfa("")).await.unwrap();

        assert!(outcome.static_created);
        assert_eq!(outcome.live_config, yml);
        assert!(!dir.path().join(LIVE_CONFIG_FILE).exists());
        let static_config = ConfigStore::load(dir.path().join(STATIC_CONFIG_FILE)).unwrap();
        assert_eq!(
            static_config.cloud("dev").unwrap().auth.password.as_deref(),
            Some("b")
        );
        let live = raw_yaml(&yml);
        assert_eq!(live["clouds"]["dev"]["auth"]["token"], "T0K3N");
    }
}
