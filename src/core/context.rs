//! # Context: service registry, ordered startup, and signal-driven shutdown.
//!
//! The [`Context`] owns every registered service and the single start order derived
//! from registration. [`Context::run`] configures all services, then starts all
//! services, in that order. A background listener waits for a termination signal
//! (or [`Context::request_shutdown`]) and walks the same order calling `shutdown`.
//!
//! ## High-level flow
//! ```text
//! run():
//!   ShutdownSignal::install()            (before any work; handle_signals only)
//!   spawn shutdown listener ─────────────────────────────┐
//!   Phase::Configuring                                    │
//!     for svc in start order: configure(svc)  ── Err ──► Phase::Aborted, return Err
//!   Phase::Starting                                       │
//!     for svc in start order: start(svc)      ── Err ──► Phase::Aborted, return Err
//!   Phase::Running, return Ok                             │
//!                                                         ▼
//! shutdown listener:
//!   signal (SIGINT/SIGTERM) | request_shutdown()
//!     └─► wait until phase is Running or Aborted   (requests during startup are deferred)
//!     └─► Phase::ShuttingDown
//!     └─► for svc in start order (or reversed): shutdown(svc) if Started, optional timeout
//!     └─► Phase::Stopped, drain subscriber queues, release wait()
//! ```
//!
//! ## Rules
//! - Registration needs `&mut Context`; `run` needs `Arc<Context>`. Nothing can be
//!   registered once the context is shared.
//! - `run` may be called once.
//! - Each started service is shut down at most once.
//! - A configure/start error aborts the run; nothing is rolled back.
//! - `wait` returns only after every subscriber has handled `ShutdownCompleted`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use svcctx::{Context, ContextConfig, DefaultService};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), svcctx::ContextError> {
//!     let cfg = ContextConfig { handle_signals: false, ..ContextConfig::default() };
//!     let ctx = Context::builder(cfg)
//!         .with_service(DefaultService::arc("a"))
//!         .with_service(DefaultService::arc("b"))
//!         .build()?;
//!
//!     let ctx = Arc::new(ctx);
//!     ctx.run().await?;
//!
//!     ctx.request_shutdown();
//!     ctx.wait().await;
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::builder::ContextBuilder;
use crate::core::config::{ContextConfig, ShutdownOrder};
use crate::core::registry::Registry;
use crate::core::shutdown::ShutdownSignal;
use crate::core::state::{Phase, ServiceState, StateTracker};
use crate::error::ContextError;
use crate::events::{Bus, Event, EventKind};
use crate::services::ServiceRef;
use crate::subscribers::SubscriberSet;

/// Orchestrator that owns services and drives their lifecycle.
///
/// Calling [`register_service`](Self::register_service) concurrently with
/// [`run`](Self::run) is impossible by construction; see the module docs.
pub struct Context {
    cfg: ContextConfig,
    registry: Registry,
    states: StateTracker,
    bus: Bus,
    /// Moved into the forwarder task by `run`.
    subs: Mutex<Option<SubscriberSet>>,
    /// Forwarder task; finishes after draining the set.
    forwarder: Mutex<Option<JoinHandle<()>>>,
    phase: watch::Sender<Phase>,
    running: AtomicBool,
    /// Cancelled by `request_shutdown`.
    requested: CancellationToken,
    /// Cancelled once the shutdown walk has finished.
    stopped: CancellationToken,
}

impl Context {
    /// Builds a context with the default configuration and registers `services`
    /// in iteration order.
    ///
    /// All-or-nothing: the first registration error is returned and nothing is kept.
    pub fn new(services: impl IntoIterator<Item = ServiceRef>) -> Result<Self, ContextError> {
        ContextBuilder::new(ContextConfig::default())
            .with_services(services)
            .build()
    }

    /// Returns a builder for a context with the given configuration.
    pub fn builder(cfg: ContextConfig) -> ContextBuilder {
        ContextBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: ContextConfig, registry: Registry, subs: SubscriberSet) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            cfg,
            registry,
            states: StateTracker::new(),
            bus,
            subs: Mutex::new(Some(subs)),
            forwarder: Mutex::new(None),
            phase,
            running: AtomicBool::new(false),
            requested: CancellationToken::new(),
            stopped: CancellationToken::new(),
        }
    }

    /// Registers a service and returns its position in the start order.
    ///
    /// Fails with [`ContextError::DuplicateService`] if the id is taken and with
    /// [`ContextError::EmptyServiceId`] for an empty id; the registry is unchanged.
    pub fn register_service(&mut self, service: ServiceRef) -> Result<usize, ContextError> {
        let position = self.registry.register(service)?;
        debug!(service = %self.registry.order()[position], position, "service registered");
        Ok(position)
    }

    /// Looks up a service by id.
    pub fn service(&self, id: &str) -> Option<ServiceRef> {
        self.registry.get(id).cloned()
    }

    /// Returns the registered ids. The order is unspecified; use
    /// [`start_order`](Self::start_order) when order matters.
    pub fn services(&self) -> Vec<String> {
        self.registry.ids()
    }

    /// Returns the ids in start order.
    pub fn start_order(&self) -> &[String] {
        self.registry.order()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if no service is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ContextConfig {
        &self.cfg
    }

    /// Returns the current run phase.
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Returns the lifecycle state of a registered service.
    pub async fn state(&self, id: &str) -> Option<ServiceState> {
        if self.registry.get(id).is_none() {
            return None;
        }
        Some(self.states.get(id).await)
    }

    /// Creates a receiver for lifecycle events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Configures a single service, passing this context as the shared context.
    pub async fn configure(self: &Arc<Self>, service: &ServiceRef) -> Result<(), ContextError> {
        let id = service.id();
        info!(service = id, "configuring");
        self.bus
            .publish(Event::new(EventKind::ServiceConfiguring).with_service(id));

        match service.configure(self).await {
            Ok(()) => {
                self.states.set(id, ServiceState::Configured).await;
                self.bus
                    .publish(Event::new(EventKind::ServiceConfigured).with_service(id));
                Ok(())
            }
            Err(source) => {
                self.publish_failure(id, &source.to_string());
                Err(ContextError::Configure {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Starts a single service.
    pub async fn start(&self, service: &ServiceRef) -> Result<(), ContextError> {
        let id = service.id();
        info!(service = id, "starting");
        self.bus
            .publish(Event::new(EventKind::ServiceStarting).with_service(id));

        match service.start().await {
            Ok(()) => {
                self.states.set(id, ServiceState::Started).await;
                self.bus
                    .publish(Event::new(EventKind::ServiceStarted).with_service(id));
                Ok(())
            }
            Err(source) => {
                self.publish_failure(id, &source.to_string());
                Err(ContextError::Start {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Configures, then starts, every service in start order.
    ///
    /// Returns once every service has started, or with the first error. The
    /// shutdown listener keeps running after `run` returns, success or not.
    pub async fn run(self: &Arc<Self>) -> Result<(), ContextError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ContextError::AlreadyRunning);
        }
        let signal = if self.cfg.handle_signals {
            match ShutdownSignal::install() {
                Ok(signal) => Some(signal),
                Err(err) => {
                    self.running.store(false, Ordering::SeqCst);
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let _settle = SettleGuard(&self.phase);
        self.subscriber_listener();
        self.shutdown_listener(signal);

        self.phase.send_replace(Phase::Configuring);
        for service in self.registry.ordered() {
            if let Err(err) = self.configure(service).await {
                return Err(self.abort(err));
            }
        }

        self.phase.send_replace(Phase::Starting);
        for service in self.registry.ordered() {
            if let Err(err) = self.start(service).await {
                return Err(self.abort(err));
            }
        }

        self.phase.send_replace(Phase::Running);
        info!(services = self.registry.len(), "all services started");
        self.bus.publish(Event::new(EventKind::RunCompleted));
        Ok(())
    }

    /// Runs and then waits until shutdown has completed.
    pub async fn serve(self: &Arc<Self>) -> Result<(), ContextError> {
        self.run().await?;
        self.wait().await;
        Ok(())
    }

    /// Requests shutdown as if a termination signal arrived. Idempotent.
    ///
    /// The request latches: made before [`run`](Self::run), it is acted on as
    /// soon as `run` has started every service (or aborted).
    pub fn request_shutdown(&self) {
        self.requested.cancel();
    }

    /// Waits until the shutdown walk has finished and subscribers have
    /// handled every queued event.
    pub async fn wait(&self) {
        self.stopped.cancelled().await;
    }

    fn abort(&self, err: ContextError) -> ContextError {
        let id = err.service_id().unwrap_or_default();
        error!(service = id, error = %err, "run aborted");
        self.phase.send_replace(Phase::Aborted);
        self.bus.publish(
            Event::new(EventKind::RunAborted)
                .with_service(id)
                .with_reason(err.to_string()),
        );
        err
    }

    fn publish_failure(&self, id: &str, reason: &str) {
        self.bus.publish(
            Event::new(EventKind::ServiceFailed)
                .with_service(id)
                .with_reason(reason),
        );
    }

    /// Forwards bus events to the subscriber set until `ShutdownCompleted`,
    /// then drains the set.
    fn subscriber_listener(&self) {
        let Some(set) = take(&self.subs).filter(|set| !set.is_empty()) else {
            return;
        };
        debug!(subscribers = set.len(), "forwarding events to subscribers");

        let mut rx = self.bus.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.kind == EventKind::ShutdownCompleted {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "subscriber listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.drain().await;
        });
        *self.forwarder.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Spawns the task that waits for a shutdown trigger and walks the services.
    fn shutdown_listener(self: &Arc<Self>, mut signal: Option<ShutdownSignal>) {
        let ctx = Arc::clone(self);
        tokio::spawn(async move {
            let signalled = async {
                match signal.as_mut() {
                    Some(s) => s.recv().await,
                    None => std::future::pending::<&'static str>().await,
                }
            };
            let reason = tokio::select! {
                name = signalled => name,
                _ = ctx.requested.cancelled() => "requested",
            };

            info!(reason, "shutdown requested");
            ctx.bus
                .publish(Event::new(EventKind::ShutdownRequested).with_reason(reason));
            ctx.shutdown_services().await;
        });
    }

    async fn shutdown_services(&self) {
        // Defer until startup has completed or aborted.
        let mut phase = self.phase.subscribe();
        let _ = phase.wait_for(|p| p.is_settled()).await;
        self.phase.send_replace(Phase::ShuttingDown);

        let order: Vec<&ServiceRef> = match self.cfg.shutdown_order {
            ShutdownOrder::Forward => self.registry.ordered().collect(),
            ShutdownOrder::Reverse => self.registry.ordered().rev().collect(),
        };
        for service in order {
            self.shutdown_service(service).await;
        }

        self.phase.send_replace(Phase::Stopped);
        info!("shutdown complete");
        self.bus.publish(Event::new(EventKind::ShutdownCompleted));

        if let Some(forwarder) = take(&self.forwarder) {
            if let Err(err) = forwarder.await {
                warn!(error = %err, "subscriber forwarder failed");
            }
        }
        self.stopped.cancel();
    }

    async fn shutdown_service(&self, service: &ServiceRef) {
        let id = service.id();
        if !self.states.begin_stop(id).await {
            debug!(service = id, "not started; skipping shutdown");
            return;
        }

        info!(service = id, "shutting down");
        self.bus
            .publish(Event::new(EventKind::ServiceStopping).with_service(id));

        if let Some(limit) = self.cfg.shutdown_timeout() {
            if tokio::time::timeout(limit, service.shutdown()).await.is_err() {
                warn!(service = id, ?limit, "shutdown timed out; moving on");
                self.bus.publish(
                    Event::new(EventKind::ShutdownTimedOut)
                        .with_service(id)
                        .with_reason(format!("exceeded {limit:?}")),
                );
                return;
            }
        } else {
            service.shutdown().await;
        }

        self.bus
            .publish(Event::new(EventKind::ServiceStopped).with_service(id));
    }
}

fn take<T>(slot: &Mutex<Option<T>>) -> Option<T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Marks an interrupted startup as aborted so a pending shutdown is not stuck
/// waiting on it (e.g. when the `run` future is dropped mid-way).
struct SettleGuard<'a>(&'a watch::Sender<Phase>);

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|p| {
            if p.is_settled() {
                false
            } else {
                *p = Phase::Aborted;
                true
            }
        });
    }
}
