//! Shared helpers for the realtime engine integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use speakhub_core::config::RealtimeConfig;
use speakhub_core::events::EventPayload;
use speakhub_core::result::AppResult;
use speakhub_core::types::{CourseId, ExerciseId, SubmissionId};
use speakhub_realtime::notification::persistence::MemoryRepository;
use speakhub_realtime::{SessionEngine, Toast, ToastSurface};

/// Test surface that records every toast it is asked to show.
pub struct RecordingSurface {
    shown: Mutex<Vec<Toast>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shown: Mutex::new(Vec::new()),
        })
    }

    pub fn summaries(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.summary.clone())
            .collect()
    }

    pub fn shown_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl ToastSurface for RecordingSurface {
    fn show(&self, toast: &Toast) -> AppResult<()> {
        self.shown.lock().unwrap().push(toast.clone());
        Ok(())
    }
}

/// Config with a short dedup window and fast drain so tests stay quick.
pub fn fast_config() -> RealtimeConfig {
    let mut config = RealtimeConfig::default();
    config.notifications.dedup_window_ms = 120;
    config.notifications.toast_drain_delay_ms = 5;
    config
}

/// Engine over an in-memory repository.
pub fn engine() -> SessionEngine {
    SessionEngine::new(&fast_config(), Arc::new(MemoryRepository::new()))
}

/// Poll until `cond` holds or the timeout elapses.
pub async fn wait_for(mut cond: impl FnMut() -> bool, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

pub fn exercise_published(course: i64, exercise: i64) -> EventPayload {
    EventPayload::ExercisePublished {
        course_id: CourseId::new(course),
        exercise_id: ExerciseId::new(exercise),
        exercise_name: Some("Vowel warmup".to_string()),
        course_name: Some("Articulation".to_string()),
        therapist_name: Some("Dr. Reyes".to_string()),
    }
}

pub fn submission_created(course: i64, exercise: i64, submission: i64) -> EventPayload {
    EventPayload::SubmissionCreated {
        course_id: CourseId::new(course),
        course_exercise_id: ExerciseId::new(exercise),
        submission_id: Some(SubmissionId::new(submission)),
        student_name: Some("Ana".to_string()),
        exercise_name: Some("Vowel warmup".to_string()),
        has_audio: true,
    }
}

pub fn submission_deleted(course: i64, exercise: i64, submission: i64) -> EventPayload {
    EventPayload::SubmissionDeleted {
        course_id: CourseId::new(course),
        course_exercise_id: ExerciseId::new(exercise),
        submission_id: Some(SubmissionId::new(submission)),
        student_name: Some("Ana".to_string()),
        exercise_name: Some("Vowel warmup".to_string()),
    }
}
