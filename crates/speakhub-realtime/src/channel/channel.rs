//! The course channel contract and subscription handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use speakhub_core::events::EventEnvelope;
use speakhub_core::result::AppResult;
use speakhub_core::types::CourseId;

use crate::router::EventRouter;

use super::types::ChannelAuth;

/// A transport capable of delivering course events.
///
/// Implementations parse wire frames, drop malformed ones after logging,
/// and handle reconnects internally. Opening requires a credential.
#[async_trait]
pub trait CourseChannel: Send + Sync {
    /// Open a subscription to one course's events.
    async fn open(&self, auth: &ChannelAuth) -> AppResult<Subscription>;
}

/// One open subscription yielding parsed envelopes in arrival order.
#[derive(Debug)]
pub struct Subscription {
    course_id: CourseId,
    rx: broadcast::Receiver<EventEnvelope>,
}

impl Subscription {
    /// Wrap a broadcast receiver for a course.
    pub fn new(course_id: CourseId, rx: broadcast::Receiver<EventEnvelope>) -> Self {
        Self { course_id, rx }
    }

    /// The course this subscription follows.
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// Receive the next envelope, or `None` once the channel is gone.
    ///
    /// A lagged receiver skips what it missed — no delivery guarantees
    /// beyond "while connected".
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(course_id = %self.course_id, missed, "subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Drive a subscription into the router until the channel closes.
pub fn spawn_forwarder(mut subscription: Subscription, router: Arc<EventRouter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let course_id = subscription.course_id();
        while let Some(envelope) = subscription.next().await {
            router.ingest(&envelope);
        }
        tracing::debug!(course_id = %course_id, "subscription closed");
    })
}
