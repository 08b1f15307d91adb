//! Keystone identity service client
//!
//! Builds the v3 password-auth request and reads the issued token from
//! the `x-subject-token` response header.

pub mod client;
pub mod types;

pub use client::{KeystoneClient, KeystoneClientConfig, SUBJECT_TOKEN_HEADER};
pub use types::AuthRequest;
