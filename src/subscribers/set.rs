//! # SubscriberSet: per-subscriber queues drained by worker tasks
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber's bounded queue
//! and returns without waiting. One worker per subscriber pops its queue and
//! calls [`Subscribe::on_event`].
//!
//! ```text
//! emit(ev) ──► queue "audit"  ──► worker ──► audit.on_event(ev)
//!          └─► queue "metrics" ──► worker ──► metrics.on_event(ev)
//!
//! drain(): close every queue, then await every worker (queued events still run)
//! ```
//!
//! A full queue drops the event for that subscriber only. A panicking
//! subscriber is logged and keeps receiving later events.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::events::Event;

use super::Subscribe;

struct Queue {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
}

impl Queue {
    fn spawn(sub: Arc<dyn Subscribe>) -> Self {
        let name = sub.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
        let worker = tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let delivery = std::panic::AssertUnwindSafe(sub.on_event(&ev)).catch_unwind();
                if let Err(panic) = delivery.await {
                    warn!(subscriber = name, ?panic, "subscriber panicked");
                }
            }
        });
        Self { name, tx, worker }
    }
}

/// Fan-out to user subscribers, one bounded queue and worker each.
pub struct SubscriberSet {
    queues: Vec<Queue>,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber.
    ///
    /// Must be called from within a Tokio runtime when `subs` is non-empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            queues: subs.into_iter().map(Queue::spawn).collect(),
        }
    }

    /// Queues `event` for every subscriber without waiting on delivery.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for queue in &self.queues {
            if let Err(err) = queue.tx.try_send(Arc::clone(&ev)) {
                let cause = match err {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "worker gone",
                };
                warn!(subscriber = queue.name, kind = ?event.kind, cause, "event dropped");
            }
        }
    }

    /// Closes every queue and waits until each worker has delivered what was
    /// already queued.
    pub async fn drain(self) {
        for Queue { name, tx, worker } in self.queues {
            drop(tx);
            if let Err(err) = worker.await {
                warn!(subscriber = name, error = %err, "subscriber worker failed");
            } else {
                debug!(subscriber = name, "subscriber drained");
            }
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.len()
    }
}
