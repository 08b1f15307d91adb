//! CLI command implementations.

pub mod refresh;
