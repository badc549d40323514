//! Error types used by the context and by services.
//!
//! This module defines two main error enums:
//!
//! - [`ContextError`] — errors raised by the orchestrator itself (registration, run).
//! - [`ServiceError`] — errors raised by individual services while configuring or starting.
//!
//! Both types provide `as_label` for logging/metrics.

use thiserror::Error;

/// # Errors produced by the [`Context`](crate::Context).
///
/// Registration errors are recoverable: the registry is left untouched.
/// `Configure` and `Start` are fatal to the run that produced them.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ContextError {
    /// A service with the same id is already registered.
    #[error("service {id} already registered")]
    DuplicateService {
        /// The conflicting service id.
        id: String,
    },

    /// A service reported an empty id.
    #[error("service id must not be empty")]
    EmptyServiceId,

    /// A service failed to configure; the run was aborted.
    #[error("configure {id}: {source}")]
    Configure {
        /// Id of the offending service.
        id: String,
        /// The error returned by the service, unchanged.
        #[source]
        source: ServiceError,
    },

    /// A service failed to start; the run was aborted.
    #[error("start {id}: {source}")]
    Start {
        /// Id of the offending service.
        id: String,
        /// The error returned by the service, unchanged.
        #[source]
        source: ServiceError,
    },

    /// `run` was called on a context that already ran.
    #[error("context is already running")]
    AlreadyRunning,

    /// Installing the termination signal handlers failed.
    #[error("failed to install signal handlers: {0}")]
    Signal(#[from] std::io::Error),
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use svcctx::ContextError;
    ///
    /// let err = ContextError::DuplicateService { id: "db".into() };
    /// assert_eq!(err.as_label(), "context_duplicate_service");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::DuplicateService { .. } => "context_duplicate_service",
            ContextError::EmptyServiceId => "context_empty_service_id",
            ContextError::Configure { .. } => "context_configure_failed",
            ContextError::Start { .. } => "context_start_failed",
            ContextError::AlreadyRunning => "context_already_running",
            ContextError::Signal(_) => "context_signal_install_failed",
        }
    }

    /// Returns the id of the service this error is about, if any.
    pub fn service_id(&self) -> Option<&str> {
        match self {
            ContextError::DuplicateService { id }
            | ContextError::Configure { id, .. }
            | ContextError::Start { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// # Errors produced by services.
///
/// Returned from [`Service::configure`](crate::Service::configure) and
/// [`Service::start`](crate::Service::start). The context wraps them with the
/// offending service id without altering them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A sibling service this one depends on is not registered.
    #[error("missing dependency: {id}")]
    MissingDependency {
        /// Id of the missing sibling.
        id: String,
    },

    /// Configuration preconditions were not met.
    #[error("configuration failed: {error}")]
    Config {
        /// The underlying error message.
        error: String,
    },

    /// Activation failed.
    #[error("start failed: {error}")]
    Start {
        /// The underlying error message.
        error: String,
    },
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::MissingDependency { .. } => "service_missing_dependency",
            ServiceError::Config { .. } => "service_config_failed",
            ServiceError::Start { .. } => "service_start_failed",
        }
    }

    /// Shorthand for [`ServiceError::Config`].
    pub fn config(error: impl Into<String>) -> Self {
        ServiceError::Config {
            error: error.into(),
        }
    }

    /// Shorthand for [`ServiceError::Start`].
    pub fn start(error: impl Into<String>) -> Self {
        ServiceError::Start {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(
            ContextError::EmptyServiceId.as_label(),
            "context_empty_service_id"
        );
        assert_eq!(
            ContextError::AlreadyRunning.as_label(),
            "context_already_running"
        );
        assert_eq!(
            ServiceError::MissingDependency { id: "db".into() }.as_label(),
            "service_missing_dependency"
        );
    }

    #[test]
    fn test_wrapped_service_error_is_source() {
        let err = ContextError::Start {
            id: "http".into(),
            source: ServiceError::start("address in use"),
        };
        assert_eq!(err.to_string(), "start http: start failed: address in use");
        assert_eq!(err.service_id(), Some("http"));

        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("start failed: address in use"));
    }

    #[test]
    fn test_service_id_absent_for_runtime_errors() {
        assert_eq!(ContextError::AlreadyRunning.service_id(), None);
    }
}
