//! # Service registry.
//!
//! Maps service ids to instances and records the position each id was registered at.
//!
//! ## Rules
//! - An id is registered at most once; a rejected registration leaves the registry untouched.
//! - Positions are zero-based, contiguous, and assigned from the current size.
//! - `order` and `services` always hold the same ids.

use std::collections::HashMap;

use crate::error::ContextError;
use crate::services::ServiceRef;

#[derive(Default)]
pub(crate) struct Registry {
    services: HashMap<String, ServiceRef>,
    order: Vec<String>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts `service` and returns its position in the start order.
    pub(crate) fn register(&mut self, service: ServiceRef) -> Result<usize, ContextError> {
        let id = service.id();
        if id.is_empty() {
            return Err(ContextError::EmptyServiceId);
        }
        if self.services.contains_key(id) {
            return Err(ContextError::DuplicateService { id: id.to_string() });
        }

        let id = id.to_string();
        let position = self.order.len();
        self.order.push(id.clone());
        self.services.insert(id, service);
        Ok(position)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&ServiceRef> {
        self.services.get(id)
    }

    /// Registered ids in map order (unspecified).
    pub(crate) fn ids(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    pub(crate) fn order(&self) -> &[String] {
        &self.order
    }

    /// Services in start order.
    pub(crate) fn ordered(&self) -> impl DoubleEndedIterator<Item = &ServiceRef> {
        self.order.iter().filter_map(|id| self.services.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DefaultService;
    use std::sync::Arc;

    #[test]
    fn test_positions_follow_insertion() {
        let mut reg = Registry::new();
        for (i, id) in ["c", "a", "b"].into_iter().enumerate() {
            assert_eq!(reg.register(DefaultService::arc(id)).unwrap(), i);
        }
        assert_eq!(reg.order(), ["c", "a", "b"]);

        let ids: Vec<&str> = reg.ordered().map(|s| s.id()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
        let rev: Vec<&str> = reg.ordered().rev().map(|s| s.id()).collect();
        assert_eq!(rev, ["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_leaves_registry_unchanged() {
        let mut reg = Registry::new();
        let first = DefaultService::arc("db");
        reg.register(first.clone()).unwrap();

        let err = reg.register(DefaultService::arc("db")).unwrap_err();
        assert!(matches!(err, ContextError::DuplicateService { ref id } if id == "db"));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.order(), ["db"]);
        assert!(Arc::ptr_eq(reg.get("db").unwrap(), &first));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut reg = Registry::new();
        let err = reg.register(DefaultService::arc("")).unwrap_err();
        assert!(matches!(err, ContextError::EmptyServiceId));
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let reg = Registry::new();
        assert!(reg.get("unknown-id").is_none());
        assert!(reg.ids().is_empty());
    }

    #[test]
    fn test_ids_match_order() {
        let mut reg = Registry::new();
        for id in ["x", "y", "z"] {
            reg.register(DefaultService::arc(id)).unwrap();
        }
        let mut ids = reg.ids();
        ids.sort_unstable();
        let mut order = reg.order().to_vec();
        order.sort_unstable();
        assert_eq!(ids, order);
    }
}
