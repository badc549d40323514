//! # Event subscribers.
//!
//! Provides the [`Subscribe`] extension point and the [`SubscriberSet`] that
//! fans lifecycle events out to every subscriber.
//!
//! ## Architecture
//! ```text
//! Context ── publish(Event) ──► Bus ──► subscriber listener ──► SubscriberSet::emit(&Event)
//!                                                                ┌─────────┼─────────┐
//!                                                                ▼         ▼         ▼
//!                                                           [queue S1] [queue S2] [queue SN]
//!                                                                │         │         │
//!                                                           sub.on_event() per subscriber
//! ```

mod set;
mod subscriber;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;
