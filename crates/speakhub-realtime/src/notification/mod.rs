//! Notification routing: deduplication, readiness gating, filtering,
//! formatting, the toast queue, and the persisted store.

pub mod dedup;
pub mod filter;
pub mod formatter;
pub mod persistence;
pub mod readiness;
pub mod record;
pub mod store;
pub mod toast;

pub use dedup::DedupGate;
pub use filter::FilterState;
pub use readiness::ReadinessBuffer;
pub use record::NotificationRecord;
pub use store::NotificationStore;
