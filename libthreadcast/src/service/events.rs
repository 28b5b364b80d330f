//! Thread lifecycle events
//!
//! In-process broadcast of what the service layer did, for progress output
//! or UI updates. Uses `tokio::sync::broadcast`, so emitting never blocks and
//! events are dropped when nobody is subscribed.
//!
//! # Example
//!
//! ```no_run
//! use libthreadcast::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::ThreadCancelled {
//!     thread_id: "abc123".to_string(),
//!     post_id: "def456".to_string(),
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast channel for service events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// `capacity` is the per-subscriber buffer; lagging subscribers lose the
    /// oldest events first.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: Event) {
        // Err only means there are no receivers
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Posts were split and stored
    ThreadCreated {
        thread_id: String,
        post_count: usize,
        /// Posts the text needed before the thread cap was applied
        uncapped_count: usize,
    },

    /// A publish run was queued
    ThreadScheduled {
        thread_id: String,
        run_handle: String,
        scheduled_at: i64,
    },

    /// A scheduled post was cancelled
    ThreadCancelled { thread_id: String, post_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_delivers_to_subscriber() {
        let bus = EventBus::new(10);
        let mut receiver = bus.subscribe();

        let event = Event::ThreadCreated {
            thread_id: "t".to_string(),
            post_count: 3,
            uncapped_count: 3,
        };
        bus.emit(event.clone());

        assert_eq!(receiver.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(Event::ThreadCancelled {
            thread_id: "t".to_string(),
            post_id: "p".to_string(),
        });

        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let bus = EventBus::new(10);
        bus.emit(Event::ThreadCancelled {
            thread_id: "t".to_string(),
            post_id: "p".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::ThreadScheduled {
            thread_id: "t".to_string(),
            run_handle: "r".to_string(),
            scheduled_at: 1_700_000_000,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "thread_scheduled");
        assert_eq!(json["run_handle"], "r");
    }
}
