//! # Lifecycle events emitted by the context.
//!
//! The [`EventKind`] enum classifies event types across three groups:
//! - **Startup events**: per-service configure/start transitions and the run outcome
//! - **Shutdown events**: request, per-service teardown, completion
//! - **Failure events**: a service failed to configure or start
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use svcctx::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ServiceFailed)
//!     .with_service("db")
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::ServiceFailed);
//! assert_eq!(ev.service.as_deref(), Some("db"));
//! assert_eq!(ev.reason.as_deref(), Some("connection refused"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Startup ===
    /// About to call `configure` on a service.
    ///
    /// Sets: `service`
    ServiceConfiguring,
    /// `configure` returned `Ok`.
    ///
    /// Sets: `service`
    ServiceConfigured,
    /// About to call `start` on a service.
    ///
    /// Sets: `service`
    ServiceStarting,
    /// `start` returned `Ok`.
    ///
    /// Sets: `service`
    ServiceStarted,
    /// `configure` or `start` failed; the run is aborted.
    ///
    /// Sets: `service`, `reason`
    ServiceFailed,
    /// Every service configured and started.
    RunCompleted,
    /// The run stopped at the first failure.
    ///
    /// Sets: `service`, `reason`
    RunAborted,

    // === Shutdown ===
    /// Termination signal observed or shutdown requested programmatically.
    ///
    /// Sets: `reason` (signal name or `"requested"`)
    ShutdownRequested,
    /// About to call `shutdown` on a service.
    ///
    /// Sets: `service`
    ServiceStopping,
    /// `shutdown` returned.
    ///
    /// Sets: `service`
    ServiceStopped,
    /// `shutdown` exceeded the configured timeout and was abandoned.
    ///
    /// Sets: `service`, `reason`
    ShutdownTimedOut,
    /// The shutdown walk finished; waiters are released.
    ShutdownCompleted,
}

/// Lifecycle event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Id of the service, if applicable.
    pub service: Option<Arc<str>>,
    /// Human-readable reason (errors, signal name, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
        }
    }

    /// Attaches a service id.
    #[inline]
    pub fn with_service(mut self, id: impl Into<Arc<str>>) -> Self {
        self.service = Some(id.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ServiceConfiguring);
        let b = Event::new(EventKind::ServiceStarting);
        assert!(b.seq > a.seq);
    }
}
