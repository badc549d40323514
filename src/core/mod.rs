//! Runtime core: registry, ordered startup and shutdown.
//!
//! The only public entry point is [`Context`] (plus its builder, configuration
//! and state enums).
//!
//! Internal modules:
//! - [`context`]: the orchestrator; configure/start/run and the shutdown listener;
//! - [`registry`]: id → service map plus the start order;
//! - [`state`]: per-service states and the run phase;
//! - [`shutdown`]: cross-platform termination signal handling;
//! - [`builder`]: assembles a context from config, subscribers and services.

mod builder;
mod config;
mod context;
mod registry;
mod shutdown;
mod state;

pub use builder::ContextBuilder;
pub use config::{ContextConfig, ShutdownOrder};
pub use context::Context;
pub use state::{Phase, ServiceState};
