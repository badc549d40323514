//! # svcctx
//!
//! **svcctx** is a minimal application runtime container for async Rust.
//!
//! It registers named services, configures them against a shared [`Context`],
//! starts them in registration order, and shuts them down when the process
//! receives a termination signal.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Service "a" │   │  Service "b" │   │  Service "c" │
//!     │ (position 0) │   │ (position 1) │   │ (position 2) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Context (orchestrator)                                           │
//! │  - Registry (id → service, start order)                           │
//! │  - StateTracker (Registered → Configured → Started → Stopped)     │
//! │  - Bus (broadcast lifecycle events)                               │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        ▼                                                  ▼
//!   run(): configure a, b, c                        shutdown listener
//!          start     a, b, c                        SIGINT | SIGTERM | request_shutdown()
//!                                                     └─► shutdown a, b, c
//! ```
//!
//! ## Lifecycle
//! ```text
//! Context::new / builder ──► register_service ──► Arc<Context> ──► run()
//!
//! run():
//!   ├─► install signal handlers (optional)
//!   ├─► for each service in start order: configure(ctx)   ── Err ─► abort, return Err
//!   ├─► for each service in start order: start()          ── Err ─► abort, return Err
//!   └─► Ok(())
//!
//! shutdown listener:
//!   ├─► wait for signal / request_shutdown()
//!   ├─► wait for startup to complete or abort
//!   ├─► shutdown() every started service (forward or reverse order)
//!   └─► drain subscriber queues, release wait()
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Services**      | Capability contract and a no-op base to compose.             | [`Service`], [`DefaultService`]          |
//! | **Orchestration** | Registry, ordered configure/start, signal-driven shutdown.   | [`Context`], [`ContextBuilder`]          |
//! | **Errors**        | Typed errors for registration, configure and start failures. | [`ContextError`], [`ServiceError`]       |
//! | **Events**        | Lifecycle event stream and pluggable subscribers.            | [`Event`], [`EventKind`], [`Subscribe`]  |
//! | **Configuration** | Signal handling, shutdown order and timeout, bus capacity.   | [`ContextConfig`], [`ShutdownOrder`]     |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use svcctx::{Context, ContextConfig, DefaultService, Service, ServiceError};
//!
//! struct Api {
//!     base: DefaultService,
//! }
//!
//! #[async_trait]
//! impl Service for Api {
//!     fn id(&self) -> &str { self.base.id() }
//!
//!     async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError> {
//!         if ctx.service("db").is_none() {
//!             return Err(ServiceError::MissingDependency { id: "db".into() });
//!         }
//!         self.base.configure(ctx).await
//!     }
//!
//!     async fn start(&self) -> Result<(), ServiceError> {
//!         Ok(())
//!     }
//!
//!     async fn shutdown(&self) {
//!         println!("api: bye");
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = ContextConfig { handle_signals: false, ..ContextConfig::default() };
//!     let ctx = Context::builder(cfg)
//!         .with_service(DefaultService::arc("db"))
//!         .with_service(Arc::new(Api { base: DefaultService::new("api") }))
//!         .build()?;
//!
//!     let ctx = Arc::new(ctx);
//!     ctx.run().await?;
//!
//!     ctx.request_shutdown();
//!     ctx.wait().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod logging;
mod services;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Context, ContextBuilder, ContextConfig, Phase, ServiceState, ShutdownOrder};
pub use error::{ContextError, ServiceError};
pub use events::{Bus, Event, EventKind};
pub use logging::init_tracing;
pub use services::{DefaultService, Service, ServiceRef};
pub use subscribers::{Subscribe, SubscriberSet};
