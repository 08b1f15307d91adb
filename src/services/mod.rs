//! Service layer
//!
//! Coordinates the domain models and infrastructure adapters into the
//! token exchange.

pub mod credential_rewriter;
pub mod token_refresh;

pub use credential_rewriter::rewrite_live_config;
pub use token_refresh::{RefreshOutcome, TokenRefreshService};
