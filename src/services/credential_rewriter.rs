//! Writes a freshly issued token into the live `clouds.yaml`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::MfaResult;
use crate::domain::models::CloudsConfig;
use crate::infrastructure::config::{live_config_path, ConfigStore};

/// Switch `cloud` in `<config_dir>/clouds.yaml` (or an existing
/// `clouds.yml`) to token auth.
///
/// The live file starts from `static_config` when it does not exist, and a
/// live file without the cloud gets the static entry. Other clouds are left
/// as they are. Returns the path written.
pub fn rewrite_live_config(
    config_dir: &Path,
    cloud: &str,
    token: Option<String>,
    static_config: &CloudsConfig,
) -> MfaResult<PathBuf> {
    let live_path = live_config_path(config_dir);
    let mut live = if live_path.is_file() {
        ConfigStore::load(&live_path)?
    } else {
        static_config.clone()
    };

    let seed = static_config.cloud(cloud).cloned().unwrap_or_default();
    live.apply_token(cloud, token, &seed);

    info!("Updating {}", live_path.display());
    ConfigStore::save(&live_path, &live)?;
    Ok(live_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TOKEN_AUTH_TYPE;
    use crate::infrastructure::config::LIVE_CONFIG_FILE;
    use std::fs;
    use tempfile::TempDir;

    const STATIC: &str = r"
clouds:
  dev:
    interface: public
    auth:
      auth_url: https://keystone.example.com:5000
      project_id: p1
      username: alice
      password: hunter2
      user_domain_name: Default
";

    fn static_config() -> CloudsConfig {
        serde_yaml::from_str(STATIC).unwrap()
    }

    #[test]
    fn test_creates_live_config_from_static() {
        let dir = TempDir::new().unwrap();

        let path =
            rewrite_live_config(dir.path(), "dev", Some("tok-1".to_string()), &static_config())
                .unwrap();

        assert_eq!(path, dir.path().join(LIVE_CONFIG_FILE));
        let live = ConfigStore::load(&path).unwrap();
        let dev = live.cloud("dev").unwrap();
        assert_eq!(dev.auth_type.as_deref(), Some(TOKEN_AUTH_TYPE));
        assert_eq!(dev.auth.token, Some(Some("tok-1".to_string())));
        assert!(dev.auth.username.is_none());
        assert!(dev.auth.password.is_none());
        assert!(dev.auth.user_domain_name.is_none());
        assert!(dev.extra.contains_key("interface"));
    }

    #[test]
    fn test_updates_existing_live_config_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(LIVE_CONFIG_FILE),
            r"
clouds:
  dev:
    auth_type: token
    auth:
      auth_url: https://keystone.example.com:5000
      project_id: p1
      token: old
  other:
    auth:
      auth_url: https://elsewhere:5000
      username: carol
",
        )
        .unwrap();

        let path =
            rewrite_live_config(dir.path(), "dev", Some("new".to_string()), &static_config())
                .unwrap();

        let live = ConfigStore::load(path).unwrap();
        assert_eq!(
            live.cloud("dev").unwrap().auth.token,
            Some(Some("new".to_string()))
        );
        // Untouched neighbour keeps its password-style fields
        assert_eq!(
            live.cloud("other").unwrap().auth.username.as_deref(),
            Some("carol")
        );
    }

    #[test]
    fn test_rewrites_existing_yml_spelling() {
        let dir = TempDir::new().unwrap();
        let yml = dir.path().join("clouds.yml");
        fs::write(&yml, "clouds: {}\n").unwrap();

        let path =
            rewrite_live_config(dir.path(), "dev", Some("tok".to_string()), &static_config())
                .unwrap();

        assert_eq!(path, yml);
        assert!(!dir.path().join(LIVE_CONFIG_FILE).exists());
        let live = ConfigStore::load(path).unwrap();
        assert_eq!(live.cloud("dev").unwrap().auth.token, Some(Some("tok".to_string())));
    }

    #[test]
    fn test_seeds_missing_cloud_from_static() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LIVE_CONFIG_FILE), "clouds: {}\n").unwrap();

        let path = rewrite_live_config(dir.path(), "dev", None, &static_config()).unwrap();

        let live = ConfigStore::load(path).unwrap();
        let dev = live.cloud("dev").unwrap();
        assert_eq!(dev.auth.project_id.as_deref(), Some("p1"));
        assert_eq!(dev.auth.token, Some(None));
    }
}
