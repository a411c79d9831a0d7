//! Type and role filtering.
//!
//! The role allow-list is a fixed table applied before any user-configured
//! switch: a type disallowed for a role can never be forced into
//! visibility. The per-type toast and tray switches are session state held
//! in [`FilterState`] and only affect future routing and current
//! visibility, never stored records.

use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use speakhub_core::events::EventType;
use speakhub_core::types::UserRole;

/// Whether a role may see events of the given type at all.
///
/// Therapists follow submission lifecycle events; students follow exercise
/// lifecycle and feedback events.
pub fn role_allows(role: UserRole, event_type: EventType) -> bool {
    match role {
        UserRole::Therapist => matches!(
            event_type,
            EventType::SubmissionCreated
                | EventType::SubmissionUpdated
                | EventType::SubmissionDeleted
        ),
        UserRole::Student => matches!(
            event_type,
            EventType::ExercisePublished
                | EventType::ExerciseDeleted
                | EventType::EvaluationCreated
                | EventType::EvaluationUpdated
                | EventType::ObservationCreated
        ),
    }
}

/// Per-session filter state shared by the store and the toast queue.
#[derive(Debug)]
pub struct FilterState {
    /// Current role; `None` until login.
    role: RwLock<Option<UserRole>>,
    /// Types allowed to produce a toast. Defaults to all.
    toast_enabled: RwLock<HashSet<EventType>>,
    /// Types visible in the tray. Defaults to all.
    tray_visible: RwLock<HashSet<EventType>>,
    /// Global toast mute.
    muted: AtomicBool,
}

impl FilterState {
    /// Create filter state with every type enabled for toast and tray.
    pub fn new() -> Self {
        Self {
            role: RwLock::new(None),
            toast_enabled: RwLock::new(EventType::ALL.into_iter().collect()),
            tray_visible: RwLock::new(EventType::ALL.into_iter().collect()),
            muted: AtomicBool::new(false),
        }
    }

    /// The current role, if logged in.
    pub fn role(&self) -> Option<UserRole> {
        *self.role.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the role at login.
    pub fn set_role(&self, role: Option<UserRole>) {
        *self.role.write().unwrap_or_else(|e| e.into_inner()) = role;
    }

    /// Combined authoritative check: a type passes only when a role is set
    /// and the fixed table allows it.
    pub fn role_allows(&self, event_type: EventType) -> bool {
        self.role().is_some_and(|role| role_allows(role, event_type))
    }

    /// Whether the type may produce a toast (user switch only).
    pub fn toast_enabled(&self, event_type: EventType) -> bool {
        self.toast_enabled
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&event_type)
    }

    /// Whether the type is visible in the tray (user switch only).
    pub fn tray_visible(&self, event_type: EventType) -> bool {
        self.tray_visible
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&event_type)
    }

    /// Flip the per-type toast switch.
    pub fn toggle_toast(&self, event_type: EventType) {
        let mut set = self.toast_enabled.write().unwrap_or_else(|e| e.into_inner());
        if !set.remove(&event_type) {
            set.insert(event_type);
        }
    }

    /// Flip the per-type tray switch.
    pub fn toggle_tray(&self, event_type: EventType) {
        let mut set = self.tray_visible.write().unwrap_or_else(|e| e.into_inner());
        if !set.remove(&event_type) {
            set.insert(event_type);
        }
    }

    /// Snapshot of the toast-enabled set.
    pub fn toast_enabled_types(&self) -> HashSet<EventType> {
        self.toast_enabled
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Snapshot of the tray-visible set.
    pub fn tray_visible_types(&self) -> HashSet<EventType> {
        self.tray_visible
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Whether toasts are globally muted.
    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    /// Set the global mute flag.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    /// Restore login-time defaults: no role, all switches on, unmuted.
    pub fn reset(&self) {
        self.set_role(None);
        *self.toast_enabled.write().unwrap_or_else(|e| e.into_inner()) =
            EventType::ALL.into_iter().collect();
        *self.tray_visible.write().unwrap_or_else(|e| e.into_inner()) =
            EventType::ALL.into_iter().collect();
        self.set_muted(false);
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_therapist_sees_only_submission_events() {
        assert!(role_allows(UserRole::Therapist, EventType::SubmissionCreated));
        assert!(role_allows(UserRole::Therapist, EventType::SubmissionDeleted));
        assert!(!role_allows(UserRole::Therapist, EventType::ExercisePublished));
        assert!(!role_allows(UserRole::Therapist, EventType::EvaluationCreated));
    }

    #[test]
    fn test_student_sees_exercise_and_feedback_events() {
        assert!(role_allows(UserRole::Student, EventType::ExercisePublished));
        assert!(role_allows(UserRole::Student, EventType::ObservationCreated));
        assert!(!role_allows(UserRole::Student, EventType::SubmissionCreated));
    }

    #[test]
    fn test_role_table_beats_user_switches() {
        let filters = FilterState::new();
        filters.set_role(Some(UserRole::Therapist));
        // Toast switch on, but the role table still denies the type.
        assert!(filters.toast_enabled(EventType::ExercisePublished));
        assert!(!filters.role_allows(EventType::ExercisePublished));
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let filters = FilterState::new();
        assert!(filters.toast_enabled(EventType::SubmissionCreated));
        filters.toggle_toast(EventType::SubmissionCreated);
        assert!(!filters.toast_enabled(EventType::SubmissionCreated));
        filters.toggle_toast(EventType::SubmissionCreated);
        assert!(filters.toast_enabled(EventType::SubmissionCreated));
    }

    #[test]
    fn test_no_role_denies_everything() {
        let filters = FilterState::new();
        assert!(!filters.role_allows(EventType::SubmissionCreated));
        assert!(!filters.role_allows(EventType::ExercisePublished));
    }
}
