//! User roles as assigned by the backend session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role of the logged-in user.
///
/// Roles are fixed at login and drive the authoritative allow-list that
/// decides which event types a session may surface at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// A student enrolled in one or more courses.
    Student,
    /// A therapist running one or more courses.
    Therapist,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "STUDENT"),
            Self::Therapist => write!(f, "THERAPIST"),
        }
    }
}
