//! Infrastructure layer module
//!
//! Adapters for everything outside the process:
//! - Config file discovery, loading and atomic saving
//! - Keystone HTTP client
//! - Terminal / supplied credential providers
//! - Logging infrastructure
//!
//! Implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod identity;
pub mod logging;
