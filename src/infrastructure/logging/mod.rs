//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Compact, pretty or JSON output on stderr
//! - Optional JSON log file
//! - Secret scrubbing for request bodies

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::LogFormat;
pub use logger::LoggerImpl;
pub use secret_scrubbing::SecretScrubber;
