//! Runs three services until Ctrl-C / SIGTERM.
//!
//! ```bash
//! RUST_LOG=info cargo run --example basic
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use svcctx::{
    Context, ContextConfig, DefaultService, Service, ServiceError, ServiceRef, ShutdownOrder,
};

/// Ticks once a second until shut down; needs the "store" sibling.
struct Ticker {
    base: DefaultService,
    stop: CancellationToken,
}

#[async_trait]
impl Service for Ticker {
    fn id(&self) -> &str {
        self.base.id()
    }

    async fn configure(&self, ctx: &Arc<Context>) -> Result<(), ServiceError> {
        if ctx.service("store").is_none() {
            return Err(ServiceError::MissingDependency { id: "store".into() });
        }
        self.base.configure(ctx).await
    }

    async fn start(&self) -> Result<(), ServiceError> {
        let stop = self.stop.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = interval.tick() => tracing::info!("tick"),
                }
            }
        });
        Ok(())
    }

    async fn shutdown(&self) {
        self.stop.cancel();
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    svcctx::init_tracing().map_err(anyhow::Error::msg)?;

    let cfg = ContextConfig {
        shutdown_order: ShutdownOrder::Reverse,
        shutdown_timeout: Duration::from_secs(5),
        ..ContextConfig::default()
    };

    let ticker: ServiceRef = Arc::new(Ticker {
        base: DefaultService::new("ticker"),
        stop: CancellationToken::new(),
    });

    let ctx = Arc::new(
        Context::builder(cfg)
            .with_service(DefaultService::arc("store"))
            .with_service(ticker)
            .with_service(DefaultService::arc("http"))
            .build()?,
    );

    match ctx.serve().await {
        Ok(()) => tracing::info!("stopped gracefully"),
        Err(e) => tracing::error!(error = %e, label = e.as_label(), "startup failed"),
    }
    Ok(())
}
