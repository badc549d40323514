//! # Service abstraction and the no-op base implementation.
//!
//! - [`Service`] - the capability contract the context drives
//! - [`ServiceRef`] - shared handle (`Arc<dyn Service>`)
//! - [`DefaultService`] - no-op base that concrete services compose and delegate to

mod default;
mod service;

pub use default::DefaultService;
pub use service::{Service, ServiceRef};
