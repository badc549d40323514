//! # Lifecycle state: per-service states and the run phase.
//!
//! ```text
//! ServiceState:  Registered ──► Configured ──► Started ──► Stopped
//!
//! Phase:         Idle ──► Configuring ──► Starting ──► Running ──► ShuttingDown ──► Stopped
//!                              │              │                         ▲
//!                              └──────────────┴──► Aborted ─────────────┘
//! ```
//!
//! ## Rules
//! - Only the context writes states; reads are consistent with the last completed step.
//! - Shutdown applies to services in `Started` only, and moves each to `Stopped` once.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Lifecycle state of a single registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Registered, not yet configured.
    Registered,
    /// `configure` succeeded.
    Configured,
    /// `start` succeeded.
    Started,
    /// `shutdown` was invoked (returned or timed out).
    Stopped,
}

/// Phase of a context run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `run` not called yet.
    Idle,
    /// Configuring services in start order.
    Configuring,
    /// Starting services in start order.
    Starting,
    /// Every service started.
    Running,
    /// A configure or start step failed.
    Aborted,
    /// Shutdown walk in progress.
    ShuttingDown,
    /// Shutdown walk finished.
    Stopped,
}

impl Phase {
    /// True once startup can no longer make progress (completed or aborted).
    #[inline]
    pub fn is_settled(self) -> bool {
        !matches!(self, Phase::Idle | Phase::Configuring | Phase::Starting)
    }
}

/// Per-service state table.
pub(crate) struct StateTracker {
    states: RwLock<HashMap<String, ServiceState>>,
}

impl StateTracker {
    pub(crate) fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the recorded state, or `Registered` if the service has not moved yet.
    pub(crate) async fn get(&self, id: &str) -> ServiceState {
        self.states
            .read()
            .await
            .get(id)
            .copied()
            .unwrap_or(ServiceState::Registered)
    }

    pub(crate) async fn set(&self, id: &str, state: ServiceState) {
        self.states.write().await.insert(id.to_string(), state);
    }

    /// Moves `id` from `Started` to `Stopped`.
    ///
    /// Returns `false` if the service was not started or was already stopped.
    pub(crate) async fn begin_stop(&self, id: &str) -> bool {
        let mut states = self.states.write().await;
        match states.get_mut(id) {
            Some(state) if *state == ServiceState::Started => {
                *state = ServiceState::Stopped;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_defaults_to_registered() {
        let tracker = StateTracker::new();
        assert_eq!(tracker.get("a").await, ServiceState::Registered);
    }

    #[tokio::test]
    async fn test_begin_stop_only_once_and_only_started() {
        let tracker = StateTracker::new();
        tracker.set("a", ServiceState::Started).await;
        tracker.set("b", ServiceState::Configured).await;

        assert!(tracker.begin_stop("a").await);
        assert!(!tracker.begin_stop("a").await);
        assert!(!tracker.begin_stop("b").await);
        assert!(!tracker.begin_stop("c").await);

        assert_eq!(tracker.get("a").await, ServiceState::Stopped);
        assert_eq!(tracker.get("b").await, ServiceState::Configured);
    }

    #[test]
    fn test_phase_settled() {
        assert!(!Phase::Configuring.is_settled());
        assert!(!Phase::Starting.is_settled());
        assert!(Phase::Running.is_settled());
        assert!(Phase::Aborted.is_settled());
    }
}
