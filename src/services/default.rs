//! # No-op base service.
//!
//! [`DefaultService`] implements every [`Service`] step as a no-op and keeps a
//! non-owning back-reference to the [`Context`] once configured. Concrete services
//! embed it and delegate the steps they do not customize.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use svcctx::{Context, DefaultService, Service, ServiceError};
//!
//! struct Worker {
//!     base: DefaultService,
//! }
//!
//! #[async_trait]
//! impl Service for Worker {
//!     fn id(&self) -> &str { self.base.id() }
//!
//!     async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError> {
//!         self.base.configure(ctx).await
//!     }
//!
//!     async fn start(&self) -> Result<(), ServiceError> {
//!         let _queue = self.base.sibling("queue");
//!         Ok(())
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::sync::{Arc, OnceLock, Weak};

use async_trait::async_trait;

use crate::core::Context;
use crate::error::ServiceError;
use crate::services::{Service, ServiceRef};

/// No-op service holding an id and a weak back-reference to its context.
#[derive(Debug)]
pub struct DefaultService {
    id: Cow<'static, str>,
    ctx: OnceLock<Weak<Context>>,
}

impl DefaultService {
    /// Creates an unbound service with the given id.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            ctx: OnceLock::new(),
        }
    }

    /// Creates the service and returns it as a [`ServiceRef`].
    pub fn arc(id: impl Into<Cow<'static, str>>) -> ServiceRef {
        Arc::new(Self::new(id))
    }

    /// Returns the service id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stores a weak reference to `ctx`. The first binding wins.
    pub fn bind(&self, ctx: &Arc<Context>) {
        let _ = self.ctx.set(Arc::downgrade(ctx));
    }

    /// Returns the context this service was configured with, if it is still alive.
    pub fn context(&self) -> Option<Arc<Context>> {
        self.ctx.get().and_then(Weak::upgrade)
    }

    /// Looks up a sibling service through the bound context.
    pub fn sibling(&self, id: &str) -> Option<ServiceRef> {
        self.context().and_then(|ctx| ctx.service(id))
    }
}

#[async_trait]
impl Service for DefaultService {
    fn id(&self) -> &str {
        &self.id
    }

    async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError> {
        self.bind(ctx);
        Ok(())
    }

    async fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_has_no_context() {
        let svc = DefaultService::new("a");
        assert_eq!(svc.id(), "a");
        assert!(svc.context().is_none());
        assert!(svc.sibling("b").is_none());
    }

    #[tokio::test]
    async fn test_configure_binds_weak_context() {
        let a = Arc::new(DefaultService::new("a"));
        let b = DefaultService::arc("b");
        let ctx = Arc::new(Context::new([a.clone() as ServiceRef, b]).expect("context"));

        ctx.configure(&(a.clone() as ServiceRef))
            .await
            .expect("configure");

        let bound = a.context().expect("bound");
        assert!(Arc::ptr_eq(&bound, &ctx));
        assert_eq!(a.sibling("b").map(|s| s.id().to_string()).as_deref(), Some("b"));
        assert!(a.sibling("missing").is_none());
        drop(bound);

        assert_eq!(Arc::strong_count(&ctx), 1);
        drop(ctx);
        assert!(a.context().is_none());
    }
}
