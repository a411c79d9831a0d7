//! Shared type definitions: identifiers, roles, and severities.

pub mod id;
pub mod role;
pub mod severity;

pub use id::{CourseId, ExerciseId, SubmissionId, UserId};
pub use role::UserRole;
pub use severity::Severity;
