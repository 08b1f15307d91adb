//! Configuration management infrastructure
//!
//! - Locating `clouds.yaml` / `static-clouds.yaml` on the OpenStack search path
//! - Loading and atomically saving those documents
//! - Hierarchical settings for the tool itself using figment

pub mod loader;
pub mod locator;
pub mod store;

pub use loader::{ConfigError, ConfigLoader};
pub use locator::{
    live_config_path, ConfigLocator, LIVE_CONFIG_FILE, LIVE_CONFIG_FILES, STATIC_CONFIG_FILE,
};
pub use store::ConfigStore;
