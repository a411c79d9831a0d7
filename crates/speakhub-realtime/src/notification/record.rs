//! Persisted notification record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use speakhub_core::events::EventType;
use speakhub_core::types::{CourseId, ExerciseId, Severity, SubmissionId};

/// One past event as shown in the notification tray.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Locally generated identifier, unique within the store.
    pub id: Uuid,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Display severity.
    pub severity: Severity,
    /// Short headline.
    pub summary: String,
    /// Longer body text.
    #[serde(default)]
    pub detail: Option<String>,
    /// The event type that produced this record.
    pub event_type: EventType,
    /// The course involved.
    #[serde(default)]
    pub course_id: Option<CourseId>,
    /// The exercise involved, if any.
    #[serde(default)]
    pub exercise_id: Option<ExerciseId>,
    /// The submission involved, if any.
    #[serde(default)]
    pub submission_id: Option<SubmissionId>,
}

impl NotificationRecord {
    /// Create a record with a fresh id and the current time.
    pub fn new(severity: Severity, summary: impl Into<String>, event_type: EventType) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            severity,
            summary: summary.into(),
            detail: None,
            event_type,
            course_id: None,
            exercise_id: None,
            submission_id: None,
        }
    }

    /// Attach body text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach correlation identifiers.
    pub fn with_correlation(
        mut self,
        course_id: Option<CourseId>,
        exercise_id: Option<ExerciseId>,
        submission_id: Option<SubmissionId>,
    ) -> Self {
        self.course_id = course_id;
        self.exercise_id = exercise_id;
        self.submission_id = submission_id;
        self
    }
}
