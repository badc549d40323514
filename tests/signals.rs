//! Delivers real termination signals to this test process. Kept in its own
//! binary so no other test shares the process while a signal is in flight.
#![cfg(unix)]

use std::process::Command;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use svcctx::{Context, ContextConfig, Phase, Service, ServiceError, ServiceRef};

/// Records each shutdown call into a shared journal.
struct Recorder {
    id: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Service for Recorder {
    fn id(&self) -> &str {
        self.id
    }

    async fn configure(&self, _ctx: &Arc<Context>) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn shutdown(&self) {
        self.journal.lock().unwrap().push(format!("shutdown {}", self.id));
    }
}

fn kill_self(signal: &str) {
    let status = Command::new("kill")
        .args([signal, &std::process::id().to_string()])
        .status()
        .expect("spawn kill");
    assert!(status.success(), "kill {signal} failed: {status}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sigterm_after_run_shuts_services_down_in_order_once() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let services: Vec<ServiceRef> = ["s1", "s2", "s3"]
        .into_iter()
        .map(|id| {
            Arc::new(Recorder {
                id,
                journal: journal.clone(),
            }) as ServiceRef
        })
        .collect();

    let cfg = ContextConfig {
        handle_signals: true,
        ..ContextConfig::default()
    };
    let ctx = Arc::new(
        Context::builder(cfg)
            .with_services(services)
            .build()
            .expect("context"),
    );
    ctx.run().await.expect("run");

    kill_self("-TERM");
    tokio::time::timeout(Duration::from_secs(5), ctx.wait())
        .await
        .expect("shutdown after SIGTERM");

    assert_eq!(ctx.phase(), Phase::Stopped);
    assert_eq!(
        *journal.lock().unwrap(),
        vec!["shutdown s1", "shutdown s2", "shutdown s3"]
    );
}
