//! # Cross-platform termination signal handling.
//!
//! [`ShutdownSignal::install`] registers the handlers **synchronously**, so a signal
//! delivered before the first poll of [`ShutdownSignal::recv`] is not lost.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! **Other platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]; the handler is registered on first poll.

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Installed termination signal listeners.
pub(crate) struct ShutdownSignal {
    #[cfg(unix)]
    sigint: Signal,
    #[cfg(unix)]
    sigterm: Signal,
}

impl ShutdownSignal {
    /// Registers the handlers. Fails if the signal driver cannot be set up.
    #[cfg(unix)]
    pub(crate) fn install() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub(crate) fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Waits for the next termination signal and returns its name.
    #[cfg(unix)]
    pub(crate) async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv()  => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub(crate) async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(_) => std::future::pending().await,
        }
    }
}
