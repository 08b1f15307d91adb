//! Search path for `clouds.yaml` and `static-clouds.yaml`.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::domain::errors::{MfaError, MfaResult};

/// Durable copy holding usernames and passwords.
pub const STATIC_CONFIG_FILE: &str = "static-clouds.yaml";

/// Token-bearing config read by the OpenStack tooling.
pub const LIVE_CONFIG_FILE: &str = "clouds.yaml";

/// Accepted spellings of the live config, in the order they are tried.
pub const LIVE_CONFIG_FILES: [&str; 2] = [LIVE_CONFIG_FILE, "clouds.yml"];

/// Extra location searched before the defaults when set.
pub const CLIENT_CONFIG_ENV: &str = "OS_CLIENT_CONFIG_FILE";

/// Finds which directory on an ordered search path holds a config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocator {
    search_dirs: Vec<PathBuf>,
}

impl ConfigLocator {
    /// Search exactly `search_dirs`, in order.
    pub const fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Standard OpenStack search path, preceded by `$OS_CLIENT_CONFIG_FILE`
    /// when it is set.
    ///
    /// Order: `.`, `~/.config/openstack`, the system directory.
    pub fn from_env() -> Self {
        let mut search_dirs = Vec::with_capacity(4);
        if let Some(value) = std::env::var_os(CLIENT_CONFIG_ENV) {
            search_dirs.push(client_config_dir(Path::new(&value)));
        }
        search_dirs.push(PathBuf::from("."));
        if let Some(home) = dirs::home_dir() {
            search_dirs.push(home.join(".config").join("openstack"));
        }
        search_dirs.push(system_config_dir());
        Self::new(search_dirs)
    }

    /// Put `dir` ahead of every other search location.
    #[must_use]
    pub fn with_priority_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.insert(0, dir.into());
        self
    }

    /// Directories searched, highest priority first.
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Return the first search directory that contains `name`.
    pub fn locate(&self, name: &str) -> MfaResult<PathBuf> {
        for dir in &self.search_dirs {
            let candidate = dir.join(name);
            trace!(path = %candidate.display(), "checking search path");
            if candidate.is_file() {
                return Ok(dir.clone());
            }
        }
        Err(MfaError::ConfigNotFound {
            name: name.to_string(),
            searched: self.search_dirs.clone(),
        })
    }

    /// Return the first directory holding any of `names`, with the name
    /// found there. Every name is tried in a directory before the next
    /// directory is searched.
    pub fn locate_any<'a>(&self, names: &[&'a str]) -> MfaResult<(PathBuf, &'a str)> {
        for dir in &self.search_dirs {
            if let Some(name) = names.iter().copied().find(|name| dir.join(name).is_file()) {
                return Ok((dir.clone(), name));
            }
        }
        Err(MfaError::ConfigNotFound {
            name: names.join(" or "),
            searched: self.search_dirs.clone(),
        })
    }
}

/// Path of the live config in `dir`: the first accepted spelling that
/// exists, or `clouds.yaml` when there is none yet.
pub fn live_config_path(dir: &Path) -> PathBuf {
    LIVE_CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(LIVE_CONFIG_FILE))
}

/// `$OS_CLIENT_CONFIG_FILE` may name a directory or a file inside one.
fn client_config_dir(value: &Path) -> PathBuf {
    if value.is_dir() {
        return value.to_path_buf();
    }
    value
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(windows)]
fn system_config_dir() -> PathBuf {
    PathBuf::from(r"C:\ProgramData\openstack")
}

#[cfg(not(windows))]
fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc/openstack")
}
