//! Redaction of secrets in logged text.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A quoted JSON string (escapes included) or a bare token.
const SECRET_VALUE: &str = r#"("(?:[^"\\]|\\.)*"|[^"'\s,{}\[\]]+)"#;

static PASSWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r#"(?i)("?password"?\s*[:=]\s*){SECRET_VALUE}"#))
        .expect("password pattern is valid")
});

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?i)("?(?:x-subject-token|token|secret)"?\s*[:=]\s*){SECRET_VALUE}"#
    ))
    .expect("token pattern is valid")
});

/// Scrubs passwords and tokens out of text before it is logged
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    /// Create a scrubber.
    pub const fn new() -> Self {
        Self
    }

    /// Replace secret values with `[REDACTED]`, keeping the field names.
    ///
    /// A quoted value is replaced whole, so separators and escaped quotes
    /// inside it are never left behind; the quotes themselves are kept.
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = PASSWORD_PATTERN.replace_all(message, redact);
        TOKEN_PATTERN.replace_all(&scrubbed, redact).into_owned()
    }
}

fn redact(caps: &Captures<'_>) -> String {
    if caps[2].starts_with('"') {
        format!("{}\"[REDACTED]\"", &caps[1])
    } else {
        format!("{}[REDACTED]", &caps[1])
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
