use std::sync::Arc;

use crate::core::{Context, ContextConfig, registry::Registry};
use crate::error::ContextError;
use crate::services::ServiceRef;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for a [`Context`] with subscribers and an initial set of services.
pub struct ContextBuilder {
    cfg: ContextConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    services: Vec<ServiceRef>,
}

impl ContextBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ContextConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue, so
    /// [`build`](Self::build) must then run inside a Tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends a service; its position follows the services added before it.
    pub fn with_service(mut self, service: ServiceRef) -> Self {
        self.services.push(service);
        self
    }

    /// Appends services in iteration order.
    pub fn with_services(mut self, services: impl IntoIterator<Item = ServiceRef>) -> Self {
        self.services.extend(services);
        self
    }

    /// Registers every service and builds the context.
    ///
    /// All-or-nothing: the first registration error is returned and no
    /// subscriber worker is spawned.
    pub fn build(self) -> Result<Context, ContextError> {
        let mut registry = Registry::new();
        for service in self.services {
            registry.register(service)?;
        }

        let subs = SubscriberSet::new(self.subscribers);
        Ok(Context::new_internal(self.cfg, registry, subs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DefaultService;

    #[test]
    fn test_build_registers_in_order() {
        let ctx = ContextBuilder::new(ContextConfig::default())
            .with_service(DefaultService::arc("a"))
            .with_services([DefaultService::arc("b"), DefaultService::arc("c")])
            .build()
            .unwrap();
        assert_eq!(ctx.start_order(), ["a", "b", "c"]);
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_build_is_all_or_nothing() {
        let err = ContextBuilder::new(ContextConfig::default())
            .with_service(DefaultService::arc("a"))
            .with_service(DefaultService::arc("a"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, ContextError::DuplicateService { ref id } if id == "a"));
    }
}
