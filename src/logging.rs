//! Default `tracing` sink for hosting programs.
//!
//! The context logs every configure/start/shutdown transition through `tracing`.
//! Programs that do not install their own subscriber can call [`init_tracing`].
//!
//! ```bash
//! RUST_LOG=info cargo run --example basic
//! RUST_LOG=svcctx=debug cargo run --example basic
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Fails if a global subscriber is already set.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
}
