//! # Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the context and its shutdown listener.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_publish_without_receivers_is_noop() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::RunCompleted));
    }

    #[test]
    fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::ShutdownRequested));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ServiceStarting).with_service("a"));

        let ev = rx.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::ServiceStarting);
        assert_eq!(ev.service.as_deref(), Some("a"));
        assert!(rx.try_recv().is_err());
    }
}
