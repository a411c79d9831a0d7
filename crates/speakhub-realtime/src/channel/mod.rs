//! Course channel: the transport boundary.
//!
//! One logical connection per active course context, authenticated with a
//! bearer credential. The channel owns its own reconnect policy; the
//! engine only consumes parsed envelopes, one callback invocation per
//! message, and a dropped connection simply means no envelope arrives.

pub mod channel;
pub mod memory;
pub mod types;

pub use channel::{CourseChannel, Subscription, spawn_forwarder};
pub use memory::MemoryChannel;
pub use types::ChannelAuth;
