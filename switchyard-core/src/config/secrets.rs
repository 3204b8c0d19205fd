//! API key handling
//!
//! Provider keys travel inside [`ProviderConfig`](super::ProviderConfig) but
//! must never reach a log line. [`SecretString`] redacts itself when
//! formatted, and [`SafeLogging`] gives configuration types a redacted summary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key prefixes providers use by convention; kept visible in diagnostics
const KNOWN_KEY_PREFIXES: &[&str] = &["sk-", "AIza"];

const REDACTED: &str = "[REDACTED]";

/// An API key. Serializes as a plain string, formats as `[REDACTED]`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for building request headers
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Enough of the key to tell which account or convention it belongs to.
    ///
    /// Short or non-ASCII keys are fully hidden.
    pub fn partial_redact(&self) -> String {
        let key = self.0.as_str();
        if key.is_empty() {
            return "[EMPTY]".to_string();
        }
        if key.len() <= 8 || !key.is_ascii() {
            return REDACTED.to_string();
        }

        let (head, tail) = match KNOWN_KEY_PREFIXES.iter().find(|p| key.starts_with(**p)) {
            Some(prefix) => (prefix.len(), 4),
            None => (2, 2),
        };
        format!("{}...{}", &key[..head], &key[key.len() - tail..])
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Types that can describe themselves for a log line without leaking keys
pub trait SafeLogging {
    fn safe_for_logging(&self) -> String;
}
