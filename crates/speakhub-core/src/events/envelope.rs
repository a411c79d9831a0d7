//! Envelope wrapping a course event with its receipt timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

use super::EventPayload;

/// One event as received from the course channel.
///
/// The envelope is transient: it is created on receipt, routed, and
/// discarded. `received_at` is assigned locally and never trusted from the
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// The typed event payload.
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Wall-clock receipt time, assigned by the receiving side.
    #[serde(skip, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Wrap a payload, stamping the receipt time now.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            payload,
            received_at: Utc::now(),
        }
    }

    /// Parse a wire frame into an envelope.
    ///
    /// Malformed frames are a [`crate::error::ErrorKind::Serialization`]
    /// error; the channel logs and drops them.
    pub fn parse(frame: &str) -> AppResult<Self> {
        let payload: EventPayload = serde_json::from_str(frame)
            .map_err(|e| AppError::with_source(
                crate::error::ErrorKind::Serialization,
                "malformed event frame",
                e,
            ))?;
        Ok(Self::new(payload))
    }
}
