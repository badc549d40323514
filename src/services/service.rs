//! # Service capability contract.
//!
//! A [`Service`] has a stable [`id`](Service::id), a [`configure`](Service::configure)
//! step that receives the owning [`Context`], a [`start`](Service::start) step, and an
//! optional [`shutdown`](Service::shutdown) hook.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use svcctx::{Context, Service, ServiceError};
//!
//! struct Cache;
//!
//! #[async_trait]
//! impl Service for Cache {
//!     fn id(&self) -> &str { "cache" }
//!
//!     async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError> {
//!         ctx.service("db")
//!             .map(|_| ())
//!             .ok_or_else(|| ServiceError::MissingDependency { id: "db".into() })
//!     }
//!
//!     async fn start(&self) -> Result<(), ServiceError> {
//!         Ok(())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Context;
use crate::error::ServiceError;

/// Shared handle to a service.
pub type ServiceRef = Arc<dyn Service>;

/// A unit of work the [`Context`] configures, starts and shuts down.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Returns the unique, non-empty service id.
    ///
    /// Must stay stable for the lifetime of the service: it is the registry key.
    fn id(&self) -> &str;

    /// Prepares the service against the shared context.
    ///
    /// Sibling services are reachable through [`Context::service`]. Keep at most a
    /// [`Weak`](std::sync::Weak) reference to `ctx`; the context owns the service.
    async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError>;

    /// Activates the service.
    ///
    /// Must return once the service is up; long-running work belongs in tasks
    /// the service spawns itself.
    async fn start(&self) -> Result<(), ServiceError>;

    /// Best-effort teardown. Failures are the service's to log.
    ///
    /// Default: no-op.
    async fn shutdown(&self) {}
}
