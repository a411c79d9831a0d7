//! Notification severity levels.

use serde::{Deserialize, Serialize};

/// Severity of a toast or stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A completed action (e.g. a new submission).
    Success,
    /// An informational update.
    Info,
    /// Something was withdrawn or removed.
    Warn,
    /// A failure the user should know about.
    Error,
}

impl Severity {
    /// Convert to the wire/display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
