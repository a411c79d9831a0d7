//! Human-readable rendering of course events.
//!
//! Maps each event payload to a severity, a headline, and body text; the
//! same rendering feeds both the toast and the persisted record.

use speakhub_core::events::{EventPayload, EventType};
use speakhub_core::types::Severity;

use super::record::NotificationRecord;

/// Rendered notification text for one event.
#[derive(Debug, Clone)]
pub struct FormattedNotification {
    /// Display severity.
    pub severity: Severity,
    /// Short headline.
    pub summary: String,
    /// Longer body text.
    pub detail: String,
    /// The originating event type.
    pub event_type: EventType,
}

impl FormattedNotification {
    /// Build a persisted record carrying this rendering and the event's
    /// correlation fields.
    pub fn into_record(self, payload: &EventPayload) -> NotificationRecord {
        NotificationRecord::new(self.severity, self.summary, self.event_type)
            .with_detail(self.detail)
            .with_correlation(
                Some(payload.course_id()),
                payload.exercise_id(),
                payload.submission_id(),
            )
    }
}

fn audio_suffix(has_audio: bool) -> &'static str {
    if has_audio {
        "with audio"
    } else {
        "without audio"
    }
}

fn or_default<'a>(name: &'a Option<String>, fallback: &'a str) -> &'a str {
    name.as_deref().unwrap_or(fallback)
}

/// Render an event into notification text.
pub fn format_event(payload: &EventPayload) -> FormattedNotification {
    let event_type = payload.event_type();
    match payload {
        EventPayload::ExercisePublished {
            exercise_name,
            course_name,
            therapist_name,
            ..
        } => FormattedNotification {
            severity: Severity::Info,
            summary: "New exercise".to_string(),
            detail: format!(
                "{} published \"{}\" in the course \"{}\"",
                or_default(therapist_name, "The therapist"),
                or_default(exercise_name, "New exercise"),
                or_default(course_name, "your course"),
            ),
            event_type,
        },
        EventPayload::ExerciseDeleted {
            exercise_name,
            course_name,
            therapist_name,
            ..
        } => FormattedNotification {
            severity: Severity::Warn,
            summary: "Exercise removed".to_string(),
            detail: format!(
                "{} removed \"{}\" from the course \"{}\"",
                or_default(therapist_name, "The therapist"),
                or_default(exercise_name, "Exercise"),
                or_default(course_name, "your course"),
            ),
            event_type,
        },
        EventPayload::SubmissionCreated {
            student_name,
            exercise_name,
            has_audio,
            ..
        } => FormattedNotification {
            severity: Severity::Success,
            summary: "New submission".to_string(),
            detail: format!(
                "{} submitted work for \"{}\" ({})",
                or_default(student_name, "A student"),
                or_default(exercise_name, "an exercise"),
                audio_suffix(*has_audio),
            ),
            event_type,
        },
        EventPayload::SubmissionUpdated {
            student_name,
            exercise_name,
            has_audio,
            ..
        } => FormattedNotification {
            severity: Severity::Info,
            summary: "Submission updated".to_string(),
            detail: format!(
                "{} updated their submission for \"{}\" ({})",
                or_default(student_name, "A student"),
                or_default(exercise_name, "an exercise"),
                audio_suffix(*has_audio),
            ),
            event_type,
        },
        EventPayload::SubmissionDeleted {
            student_name,
            exercise_name,
            ..
        } => FormattedNotification {
            severity: Severity::Warn,
            summary: "Submission withdrawn".to_string(),
            detail: format!(
                "{} withdrew their submission for \"{}\"",
                or_default(student_name, "A student"),
                or_default(exercise_name, "an exercise"),
            ),
            event_type,
        },
        EventPayload::EvaluationCreated {
            exercise_name,
            therapist_name,
            ..
        } => FormattedNotification {
            severity: Severity::Success,
            summary: "Submission evaluated".to_string(),
            detail: format!(
                "{} evaluated your submission for \"{}\"",
                or_default(therapist_name, "The therapist"),
                or_default(exercise_name, "an exercise"),
            ),
            event_type,
        },
        EventPayload::EvaluationUpdated {
            exercise_name,
            therapist_name,
            ..
        } => FormattedNotification {
            severity: Severity::Info,
            summary: "Evaluation updated".to_string(),
            detail: format!(
                "{} revised the evaluation of your submission for \"{}\"",
                or_default(therapist_name, "The therapist"),
                or_default(exercise_name, "an exercise"),
            ),
            event_type,
        },
        EventPayload::ObservationCreated {
            exercise_name,
            therapist_name,
            ..
        } => FormattedNotification {
            severity: Severity::Info,
            summary: "New observation".to_string(),
            detail: format!(
                "{} commented on your submission for \"{}\"",
                or_default(therapist_name, "The therapist"),
                or_default(exercise_name, "an exercise"),
            ),
            event_type,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakhub_core::types::{CourseId, ExerciseId};

    #[test]
    fn test_submission_created_mentions_audio() {
        let payload = EventPayload::SubmissionCreated {
            course_id: CourseId::new(1),
            course_exercise_id: ExerciseId::new(2),
            submission_id: None,
            student_name: Some("Ana".to_string()),
            exercise_name: Some("Vowels".to_string()),
            has_audio: true,
        };
        let rendered = format_event(&payload);
        assert_eq!(rendered.severity, Severity::Success);
        assert_eq!(rendered.summary, "New submission");
        assert!(rendered.detail.contains("with audio"));
        assert!(rendered.detail.contains("Ana"));
    }

    #[test]
    fn test_missing_names_fall_back() {
        let payload = EventPayload::ExerciseDeleted {
            course_id: CourseId::new(1),
            exercise_id: ExerciseId::new(4),
            exercise_name: None,
            course_name: None,
            therapist_name: None,
        };
        let rendered = format_event(&payload);
        assert_eq!(rendered.severity, Severity::Warn);
        assert!(rendered.detail.starts_with("The therapist removed"));
    }

    #[test]
    fn test_record_carries_correlation_fields() {
        let payload = EventPayload::ExercisePublished {
            course_id: CourseId::new(7),
            exercise_id: ExerciseId::new(42),
            exercise_name: None,
            course_name: None,
            therapist_name: None,
        };
        let record = format_event(&payload).into_record(&payload);
        assert_eq!(record.course_id, Some(CourseId::new(7)));
        assert_eq!(record.exercise_id, Some(ExerciseId::new(42)));
        assert_eq!(record.submission_id, None);
    }
}
