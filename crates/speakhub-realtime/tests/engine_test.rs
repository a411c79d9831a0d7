//! Integration tests for event routing, deduplication, and surfacing.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use speakhub_core::events::{EventEnvelope, EventType};
use speakhub_core::types::{CourseId, UserId, UserRole};
use speakhub_realtime::MemoryChannel;
use speakhub_realtime::channel::ChannelAuth;

use helpers::{
    RecordingSurface, engine, exercise_published, submission_created, submission_deleted, wait_for,
};

#[tokio::test]
async fn test_duplicate_envelopes_surface_exactly_once() {
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    // The same logical occurrence observed three times within the window.
    for _ in 0..3 {
        let envelope = EventEnvelope::new(exercise_published(3, 42));
        engine.router().ingest(&envelope);
    }

    assert!(wait_for(|| surface.shown_count() == 1, 500).await);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(surface.shown_count(), 1, "exactly one toast");
    assert_eq!(engine.store().records().len(), 1, "exactly one record");
}

#[tokio::test]
async fn test_identical_envelope_after_window_is_new() {
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));
    assert!(wait_for(|| surface.shown_count() == 1, 500).await);

    // Let the dedup window (120 ms in the test config) elapse; a replay
    // is then a new occurrence.
    tokio::time::sleep(Duration::from_millis(150)).await;
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));

    assert!(wait_for(|| surface.shown_count() == 2, 500).await);
    assert_eq!(engine.store().records().len(), 2);
}

#[tokio::test]
async fn test_role_disallowed_event_reaches_nothing() {
    let engine = engine();
    engine
        .login(UserId::new(9), UserRole::Therapist)
        .await
        .unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    // Therapists never see exercise lifecycle events, switches or not.
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(surface.shown_count(), 0);
    assert!(engine.store().records().is_empty());
}

#[tokio::test]
async fn test_toast_disabled_still_persists() {
    let engine = engine();
    engine
        .login(UserId::new(2), UserRole::Therapist)
        .await
        .unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    engine.filters().toggle_toast(EventType::SubmissionCreated);
    engine
        .router()
        .ingest(&EventEnvelope::new(submission_created(3, 5, 17)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(surface.shown_count(), 0, "toast disabled for the type");
    assert_eq!(engine.store().records().len(), 1, "record still persisted");
}

#[tokio::test]
async fn test_per_user_isolation_across_logins() {
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 1)));
    assert_eq!(engine.store().records().len(), 1);
    engine.logout().await.unwrap();

    engine.login(UserId::new(2), UserRole::Student).await.unwrap();
    assert!(
        engine.store().records().is_empty(),
        "user B starts from their own (empty) list"
    );
    engine.logout().await.unwrap();

    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    assert_eq!(
        engine.store().records().len(),
        1,
        "user A's list survives the other session"
    );
}

#[tokio::test]
async fn test_readiness_replay_preserves_order() {
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    // Readiness deliberately not signaled yet.

    for exercise in [10, 11, 12] {
        engine
            .router()
            .ingest(&EventEnvelope::new(exercise_published(3, exercise)));
    }
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(surface.shown_count(), 0);
    assert_eq!(engine.store().records().len(), 3, "persistence is not gated");

    engine.toasts().mark_ready();
    assert!(wait_for(|| surface.shown_count() == 3, 500).await);
}

#[tokio::test]
async fn test_student_publish_scenario() {
    // role=STUDENT, exercise_published for course exercise 42 twice within
    // one second: one record, one toast.
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));

    assert!(wait_for(|| surface.shown_count() == 1, 500).await);
    let records = engine.store().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event_type, EventType::ExercisePublished);
    assert_eq!(surface.summaries(), vec!["New exercise"]);
}

#[tokio::test]
async fn test_clear_by_type_then_readd_after_window() {
    let engine = engine();
    engine
        .login(UserId::new(2), UserRole::Therapist)
        .await
        .unwrap();

    engine
        .router()
        .ingest(&EventEnvelope::new(submission_created(3, 5, 17)));
    engine
        .router()
        .ingest(&EventEnvelope::new(submission_deleted(3, 5, 17)));
    assert_eq!(engine.store().records().len(), 2);

    engine.store().clear_by_type(EventType::SubmissionDeleted);
    let remaining = engine.store().records();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].event_type, EventType::SubmissionCreated);

    // After the window the same withdrawal may be surfaced again.
    tokio::time::sleep(Duration::from_millis(150)).await;
    engine
        .router()
        .ingest(&EventEnvelope::new(submission_deleted(3, 5, 17)));
    assert_eq!(engine.store().records().len(), 2);
}

#[tokio::test]
async fn test_channel_feeds_router_end_to_end() {
    let engine = engine();
    engine
        .login(UserId::new(2), UserRole::Therapist)
        .await
        .unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    let channel = MemoryChannel::new(16);
    let auth = ChannelAuth::new(CourseId::new(3), "bearer-token");
    engine.follow_course(&channel, &auth).await.unwrap();

    channel.publish(CourseId::new(3), submission_created(3, 5, 17)).await;

    assert!(wait_for(|| surface.shown_count() == 1, 500).await);
    assert_eq!(engine.store().records().len(), 1);
    assert!(surface.summaries()[0].contains("New submission"));
}

#[tokio::test]
async fn test_two_subscribers_one_occurrence_surfaces_once() {
    // Two independent UI regions follow the same course; both observe the
    // same delivery, the boundaries still converge to exactly once.
    let engine = engine();
    engine
        .login(UserId::new(2), UserRole::Therapist)
        .await
        .unwrap();
    let surface = RecordingSurface::new();
    engine.toasts().attach_surface(surface.clone());
    engine.toasts().mark_ready();

    let channel = MemoryChannel::new(16);
    let auth = ChannelAuth::new(CourseId::new(3), "bearer-token");
    engine.follow_course(&channel, &auth).await.unwrap();
    engine.follow_course(&channel, &auth).await.unwrap();

    channel.publish(CourseId::new(3), submission_created(3, 5, 17)).await;

    assert!(wait_for(|| surface.shown_count() == 1, 500).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(surface.shown_count(), 1);
    assert_eq!(engine.store().records().len(), 1);
}

#[tokio::test]
async fn test_reconcilers_see_raw_undeduped_envelopes() {
    let engine = engine();
    engine.login(UserId::new(1), UserRole::Student).await.unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = Arc::clone(&hits);
    engine.reconcilers().register(Some(CourseId::new(3)), move |_| {
        hits_clone.fetch_add(1, Ordering::Relaxed);
    });

    // Duplicates are suppressed at the surfacing boundaries but the
    // reconciler sees every delivery.
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));
    engine
        .router()
        .ingest(&EventEnvelope::new(exercise_published(3, 42)));

    assert_eq!(hits.load(Ordering::Relaxed), 2);
    assert_eq!(engine.store().records().len(), 1);
}
