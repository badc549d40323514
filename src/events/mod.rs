//! Lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle transitions emitted by the [`Context`](crate::Context).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: `Context` (configure/start path and the shutdown listener).
//! - **Consumers**: `Context::subscribe()` receivers and the subscriber listener
//!   that fans out to [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
