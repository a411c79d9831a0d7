//! Domain events delivered over a course channel.
//!
//! The backend pushes one JSON object per logical occurrence, shaped as
//! `{ "type": "...", "data": { ... } }`. The payload is modeled as a tagged
//! union so filter and dedup logic can match exhaustively on the closed
//! enumeration instead of probing loosely typed maps.

pub mod envelope;

use serde::{Deserialize, Serialize};

use crate::types::{CourseId, ExerciseId, SubmissionId};

pub use envelope::EventEnvelope;

/// Fieldless mirror of the event enumeration.
///
/// Used by the filter sets, the dedup key, and the persisted record, where
/// only the discriminant matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An exercise was published to a course.
    ExercisePublished,
    /// An exercise was removed from a course.
    ExerciseDeleted,
    /// A student submitted work.
    SubmissionCreated,
    /// A student replaced an earlier submission.
    SubmissionUpdated,
    /// A student withdrew a submission.
    SubmissionDeleted,
    /// A therapist evaluated a submission.
    EvaluationCreated,
    /// A therapist revised an evaluation.
    EvaluationUpdated,
    /// A therapist left an observation on a submission.
    ObservationCreated,
}

impl EventType {
    /// All event types, in wire order.
    pub const ALL: [EventType; 8] = [
        EventType::ExercisePublished,
        EventType::ExerciseDeleted,
        EventType::SubmissionCreated,
        EventType::SubmissionUpdated,
        EventType::SubmissionDeleted,
        EventType::EvaluationCreated,
        EventType::EvaluationUpdated,
        EventType::ObservationCreated,
    ];

    /// The snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExercisePublished => "exercise_published",
            Self::ExerciseDeleted => "exercise_deleted",
            Self::SubmissionCreated => "submission_created",
            Self::SubmissionUpdated => "submission_updated",
            Self::SubmissionDeleted => "submission_deleted",
            Self::EvaluationCreated => "evaluation_created",
            Self::EvaluationUpdated => "evaluation_updated",
            Self::ObservationCreated => "observation_created",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Union of all course events with their correlation fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    /// An exercise became visible to students of a course.
    ExercisePublished {
        /// The course the exercise belongs to.
        course_id: CourseId,
        /// The published exercise.
        #[serde(alias = "id", alias = "course_exercise_id")]
        exercise_id: ExerciseId,
        /// The exercise display name.
        #[serde(alias = "name", default)]
        exercise_name: Option<String>,
        /// The course display name.
        #[serde(default)]
        course_name: Option<String>,
        /// Who published it.
        #[serde(default)]
        therapist_name: Option<String>,
    },
    /// An exercise was removed from a course.
    ExerciseDeleted {
        /// The course the exercise belonged to.
        course_id: CourseId,
        /// The removed exercise.
        #[serde(alias = "id", alias = "course_exercise_id")]
        exercise_id: ExerciseId,
        /// The exercise display name.
        #[serde(alias = "name", default)]
        exercise_name: Option<String>,
        /// The course display name.
        #[serde(default)]
        course_name: Option<String>,
        /// Who removed it.
        #[serde(default)]
        therapist_name: Option<String>,
    },
    /// A student handed in work for a course exercise.
    SubmissionCreated {
        /// The course the submission belongs to.
        course_id: CourseId,
        /// The course exercise that was answered.
        course_exercise_id: ExerciseId,
        /// The submission, when the backend includes it.
        #[serde(default)]
        submission_id: Option<SubmissionId>,
        /// The submitting student's display name.
        #[serde(default)]
        student_name: Option<String>,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
        /// Whether the submission carries a recording.
        #[serde(default)]
        has_audio: bool,
    },
    /// A student replaced an earlier submission.
    SubmissionUpdated {
        /// The course the submission belongs to.
        course_id: CourseId,
        /// The course exercise that was answered.
        course_exercise_id: ExerciseId,
        /// The submission, when the backend includes it.
        #[serde(default)]
        submission_id: Option<SubmissionId>,
        /// The submitting student's display name.
        #[serde(default)]
        student_name: Option<String>,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
        /// Whether the submission carries a recording.
        #[serde(default)]
        has_audio: bool,
    },
    /// A student withdrew a submission.
    SubmissionDeleted {
        /// The course the submission belonged to.
        course_id: CourseId,
        /// The course exercise that was answered.
        course_exercise_id: ExerciseId,
        /// The withdrawn submission, when the backend includes it.
        #[serde(default)]
        submission_id: Option<SubmissionId>,
        /// The student's display name.
        #[serde(default)]
        student_name: Option<String>,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
    },
    /// A therapist scored a submission.
    EvaluationCreated {
        /// The course the submission belongs to.
        course_id: CourseId,
        /// The evaluated submission.
        submission_id: SubmissionId,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
        /// Who evaluated it.
        #[serde(default)]
        therapist_name: Option<String>,
    },
    /// A therapist revised a score.
    EvaluationUpdated {
        /// The course the submission belongs to.
        course_id: CourseId,
        /// The re-evaluated submission.
        submission_id: SubmissionId,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
        /// Who revised it.
        #[serde(default)]
        therapist_name: Option<String>,
    },
    /// A therapist left a free-form observation.
    ObservationCreated {
        /// The course the submission belongs to.
        course_id: CourseId,
        /// The annotated submission.
        submission_id: SubmissionId,
        /// The exercise display name.
        #[serde(default)]
        exercise_name: Option<String>,
        /// Who wrote it.
        #[serde(default)]
        therapist_name: Option<String>,
    },
}

impl EventPayload {
    /// The discriminant of this payload.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::ExercisePublished { .. } => EventType::ExercisePublished,
            Self::ExerciseDeleted { .. } => EventType::ExerciseDeleted,
            Self::SubmissionCreated { .. } => EventType::SubmissionCreated,
            Self::SubmissionUpdated { .. } => EventType::SubmissionUpdated,
            Self::SubmissionDeleted { .. } => EventType::SubmissionDeleted,
            Self::EvaluationCreated { .. } => EventType::EvaluationCreated,
            Self::EvaluationUpdated { .. } => EventType::EvaluationUpdated,
            Self::ObservationCreated { .. } => EventType::ObservationCreated,
        }
    }

    /// The course this event belongs to.
    pub fn course_id(&self) -> CourseId {
        match self {
            Self::ExercisePublished { course_id, .. }
            | Self::ExerciseDeleted { course_id, .. }
            | Self::SubmissionCreated { course_id, .. }
            | Self::SubmissionUpdated { course_id, .. }
            | Self::SubmissionDeleted { course_id, .. }
            | Self::EvaluationCreated { course_id, .. }
            | Self::EvaluationUpdated { course_id, .. }
            | Self::ObservationCreated { course_id, .. } => *course_id,
        }
    }

    /// The exercise referenced by this event, if any.
    pub fn exercise_id(&self) -> Option<ExerciseId> {
        match self {
            Self::ExercisePublished { exercise_id, .. }
            | Self::ExerciseDeleted { exercise_id, .. } => Some(*exercise_id),
            Self::SubmissionCreated {
                course_exercise_id, ..
            }
            | Self::SubmissionUpdated {
                course_exercise_id, ..
            }
            | Self::SubmissionDeleted {
                course_exercise_id, ..
            } => Some(*course_exercise_id),
            Self::EvaluationCreated { .. }
            | Self::EvaluationUpdated { .. }
            | Self::ObservationCreated { .. } => None,
        }
    }

    /// The submission referenced by this event, if any.
    pub fn submission_id(&self) -> Option<SubmissionId> {
        match self {
            Self::ExercisePublished { .. } | Self::ExerciseDeleted { .. } => None,
            Self::SubmissionCreated { submission_id, .. }
            | Self::SubmissionUpdated { submission_id, .. }
            | Self::SubmissionDeleted { submission_id, .. } => *submission_id,
            Self::EvaluationCreated { submission_id, .. }
            | Self::EvaluationUpdated { submission_id, .. }
            | Self::ObservationCreated { submission_id, .. } => Some(*submission_id),
        }
    }

    /// The identifier that makes this event semantically unique, as used in
    /// the dedup key. Falls back to the course exercise when the backend
    /// omits a submission id.
    pub fn primary_correlation_id(&self) -> i64 {
        match self {
            Self::ExercisePublished { exercise_id, .. }
            | Self::ExerciseDeleted { exercise_id, .. } => exercise_id.into_inner(),
            Self::SubmissionCreated {
                submission_id,
                course_exercise_id,
                ..
            }
            | Self::SubmissionUpdated {
                submission_id,
                course_exercise_id,
                ..
            }
            | Self::SubmissionDeleted {
                submission_id,
                course_exercise_id,
                ..
            } => submission_id
                .map(SubmissionId::into_inner)
                .unwrap_or_else(|| course_exercise_id.into_inner()),
            Self::EvaluationCreated { submission_id, .. }
            | Self::EvaluationUpdated { submission_id, .. }
            | Self::ObservationCreated { submission_id, .. } => submission_id.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tag_and_content() {
        let json = r#"{"type":"exercise_published","data":{"course_id":3,"exercise_id":42,"exercise_name":"Vowels"}}"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.event_type(), EventType::ExercisePublished);
        assert_eq!(payload.course_id(), CourseId::new(3));
        assert_eq!(payload.exercise_id(), Some(ExerciseId::new(42)));
    }

    #[test]
    fn test_exercise_id_alias() {
        // Some backend emitters send `id` or `course_exercise_id` instead
        // of `exercise_id`.
        let json = r#"{"type":"exercise_deleted","data":{"course_id":3,"id":9}}"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.primary_correlation_id(), 9);

        let json = r#"{"type":"exercise_published","data":{"course_id":3,"course_exercise_id":42}}"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.primary_correlation_id(), 42);
    }

    #[test]
    fn test_submission_correlation_falls_back_to_exercise() {
        let json = r#"{"type":"submission_created","data":{"course_id":1,"course_exercise_id":5,"student_name":"Ana"}}"#;
        let payload: EventPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.submission_id(), None);
        assert_eq!(payload.primary_correlation_id(), 5);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"type":"student_danced","data":{}}"#;
        assert!(serde_json::from_str::<EventPayload>(json).is_err());
    }
}
