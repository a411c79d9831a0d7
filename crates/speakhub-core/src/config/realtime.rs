//! Real-time channel and notification configuration.

use serde::{Deserialize, Serialize};

/// Course channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal buffer size for channel subscriptions.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Delay before a channel implementation retries a dropped connection,
    /// in seconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_seconds: u64,
    /// Keepalive ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Notification-specific settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            reconnect_delay_seconds: default_reconnect_delay(),
            ping_interval_seconds: default_ping_interval(),
            notifications: NotificationsConfig::default(),
        }
    }
}

/// Notification routing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Deduplication window in milliseconds.
    ///
    /// Best-effort: an identical event re-sent after the window elapses is
    /// surfaced again. Tunable, not a timing contract.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_ms: u64,
    /// Delay between consecutive toast displays in milliseconds.
    #[serde(default = "default_drain_delay")]
    pub toast_drain_delay_ms: u64,
    /// Default visible duration of a toast in milliseconds.
    #[serde(default = "default_toast_life")]
    pub toast_life_ms: u64,
    /// Maximum stored notification records per user; the oldest records
    /// are trimmed when the cap is exceeded.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: default_dedup_window(),
            toast_drain_delay_ms: default_drain_delay(),
            toast_life_ms: default_toast_life(),
            max_stored_per_user: default_max_stored(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_reconnect_delay() -> u64 {
    3
}

fn default_ping_interval() -> u64 {
    30
}

fn default_dedup_window() -> u64 {
    5000
}

fn default_drain_delay() -> u64 {
    300
}

fn default_toast_life() -> u64 {
    4000
}

fn default_max_stored() -> usize {
    1000
}
