//! # Dispatch Channel
//!
//! One-directional, fire-and-forget publication of bridge events to the
//! external consumer. Delivery guarantees live in the correlation layer,
//! not here: the consumer signals completion by delivering a reply, never
//! by acknowledging the event itself.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::trace;

/// Sink for events crossing the bridge boundary.
///
/// Implementations must not block: `emit` is called on caller threads that
/// are about to suspend on their reply slot.
pub trait EventSink: Send + Sync {
    fn emit(&self, event_name: &str, body: Value);
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub body: Value,
    pub published_at: DateTime<Utc>,
}

/// Broadcast-backed event publisher for the external consumer
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to published events. The consumer side holds the receiver
    /// and feeds replies back through the bridge's reply sink.
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventPublisher {
    fn emit(&self, event_name: &str, body: Value) {
        let event = PublishedEvent {
            name: event_name.to_string(),
            body,
            published_at: Utc::now(),
        };

        // A send error only means there are no subscribers yet; events are
        // published regardless of whether anyone is listening.
        if self.sender.send(event).is_err() {
            trace!(event = event_name, "published with no subscribers");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(crate::constants::defaults::CHANNEL_CAPACITY)
    }
}

/// Sink that discards everything; useful in tests and as a stand-in before
/// a consumer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event_name: &str, _body: Value) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn publish_without_subscribers_is_fine() {
        let publisher = EventPublisher::new(8);
        publisher.emit("callAction", json!({"id": 1}));
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_receives_published_event() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();
        publisher.emit("webRequest", json!({"id": 3, "url": "https://example.com"}));

        let event = rx.blocking_recv().unwrap();
        assert_eq!(event.name, "webRequest");
        assert_eq!(event.body["id"], 3);
    }
}
