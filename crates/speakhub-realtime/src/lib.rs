//! # speakhub-realtime
//!
//! Client-side real-time engine for SpeakHub. Provides:
//!
//! - Course channel subscription contract with an in-memory implementation
//! - Event routing with per-boundary deduplication
//! - Toast presentation queue with readiness gating and single-flight drain
//! - Persisted per-user notification store with type and role filters
//! - View-reconciler registry for page-level refresh signals
//! - Session lifecycle (`login`/`logout`) wiring for the above singletons

pub mod channel;
pub mod engine;
pub mod notification;
pub mod reconciler;
pub mod router;

pub use channel::memory::MemoryChannel;
pub use channel::{ChannelAuth, CourseChannel, Subscription};
pub use engine::SessionEngine;
pub use notification::store::NotificationStore;
pub use notification::toast::{Toast, ToastQueue, ToastSurface};
pub use router::EventRouter;
