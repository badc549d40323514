//! # Event subscriber trait.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the context)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (panics are caught and logged)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use svcctx::{Event, EventKind, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::ServiceFailed) {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of lifecycle events.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this subscriber's queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event, in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber (clamped to ≥ 1).
    ///
    /// On overflow the event is dropped for this subscriber only.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
