//! Domain layer for the os-mfa token exchange
//!
//! Pure models of `clouds.yaml`, the identity request, the tool's own
//! settings, and the ports the infrastructure layer implements.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{MfaError, MfaResult};
