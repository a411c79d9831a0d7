//! Channel authentication parameters.

use speakhub_core::types::CourseId;

/// What a caller must supply to open a course channel.
#[derive(Debug, Clone)]
pub struct ChannelAuth {
    /// The course to follow.
    pub course_id: CourseId,
    /// Bearer credential for the backend session.
    pub token: String,
}

impl ChannelAuth {
    /// Bundle a course id with a credential.
    pub fn new(course_id: CourseId, token: impl Into<String>) -> Self {
        Self {
            course_id,
            token: token.into(),
        }
    }
}
