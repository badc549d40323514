//! # Context configuration.
//!
//! Provides [`ContextConfig`] centralized settings for a [`Context`](crate::Context).
//!
//! ## Sentinel values
//! - `shutdown_timeout = 0s` → each `shutdown` may take as long as it needs
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Order in which started services are shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownOrder {
    /// Same order as startup: position 0, 1, 2, ...
    #[default]
    Forward,
    /// Reverse of startup: last started service first.
    Reverse,
}

/// Settings for a [`Context`](crate::Context).
///
/// ## Field semantics
/// - `handle_signals`: install SIGINT/SIGTERM (Ctrl-C on Windows) handlers in `run`
/// - `shutdown_order`: walk direction for the shutdown sequence
/// - `shutdown_timeout`: per-service bound on `shutdown` (`0s` = unbounded)
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct ContextConfig {
    /// Install termination signal handlers when `run` starts.
    ///
    /// With `false`, shutdown only happens through
    /// [`Context::request_shutdown`](crate::Context::request_shutdown).
    pub handle_signals: bool,

    /// Direction of the shutdown walk.
    pub shutdown_order: ShutdownOrder,

    /// Maximum time a single service's `shutdown` may take.
    ///
    /// When exceeded, the service is abandoned and the walk moves on.
    pub shutdown_timeout: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
}

impl ContextConfig {
    /// Returns the per-service shutdown timeout as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(d)` → each `shutdown` call is cut off after `d`
    #[inline]
    pub fn shutdown_timeout(&self) -> Option<Duration> {
        if self.shutdown_timeout == Duration::ZERO {
            None
        } else {
            Some(self.shutdown_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for ContextConfig {
    /// Default configuration:
    ///
    /// - `handle_signals = true`
    /// - `shutdown_order = Forward`
    /// - `shutdown_timeout = 0s` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            handle_signals: true,
            shutdown_order: ShutdownOrder::Forward,
            shutdown_timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ContextConfig::default();
        assert!(cfg.handle_signals);
        assert_eq!(cfg.shutdown_order, ShutdownOrder::Forward);
        assert_eq!(cfg.shutdown_timeout(), None);
        assert_eq!(cfg.bus_capacity_clamped(), 1024);
    }

    #[test]
    fn test_sentinels() {
        let cfg = ContextConfig {
            shutdown_timeout: Duration::from_millis(250),
            bus_capacity: 0,
            ..ContextConfig::default()
        };
        assert_eq!(cfg.shutdown_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
