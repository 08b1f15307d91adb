//! Loading and atomically saving `clouds.yaml`-shaped documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::errors::{MfaError, MfaResult};
use crate::domain::models::CloudsConfig;

/// Reads and writes `clouds.yaml`-shaped documents
pub struct ConfigStore;

impl ConfigStore {
    /// Parse the YAML file at `path`. An empty file is an empty document.
    pub fn load(path: impl AsRef<Path>) -> MfaResult<CloudsConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MfaError::io(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "loaded config");

        if content.trim().is_empty() {
            return Ok(CloudsConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|source| MfaError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize `config` and replace the file at `path`.
    ///
    /// The document is written to a temporary file in the same directory
    /// and renamed over `path`, so readers see either the old or the new
    /// contents. The temporary file is removed if anything fails.
    pub fn save(path: impl AsRef<Path>, config: &CloudsConfig) -> MfaResult<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(config)?;

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| MfaError::io(dir, e))?;
        temp.write_all(yaml.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| MfaError::io(temp.path(), e))?;
        temp.persist(path).map_err(|e| MfaError::io(path, e.error))?;

        debug!(path = %path.display(), bytes = yaml.len(), "saved config");
        Ok(())
    }
}
