//! Authentication events.
//!
//! Events are facts about successful state changes. Failures go in
//! `Result::Err`, not in events.

use async_trait::async_trait;
use fieldgate_core::{TokenId, UserId};
use tokio::sync::broadcast;

use crate::user::User;

/// Default capacity of a [`BroadcastEventSink`] channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Authentication state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// An access token was issued.
    TokenIssued { user_id: UserId, token_id: TokenId },
    /// A user logged out and the request's token was revoked.
    UserLoggedOut { user: User },
}

/// Destination for authentication events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes an event.
    async fn publish(&self, event: AuthEvent);
}

/// [`EventSink`] that fans events out to in-process subscribers.
///
/// Events published while nobody is subscribed are dropped. Slow
/// subscribers that fall more than the channel capacity behind miss events
/// (see [`broadcast::error::RecvError::Lagged`]).
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<AuthEvent>,
}

impl BroadcastEventSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[async_trait]
impl EventSink for BroadcastEventSink {
    async fn publish(&self, event: AuthEvent) {
        // Err only means there are no subscribers.
        let _ = self.sender.send(event);
    }
}
