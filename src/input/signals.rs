//! Process termination signals.
//!
//! SIGINT and SIGTERM trip a [`ShutdownFlag`]. The flag is the only state
//! shared between the signal task and the session loop, and it only ever goes
//! from "running" to "shutdown requested".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

/// Monotonic, write-once shutdown request flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Cannot be undone.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Spawns a task that trips `flag` on SIGINT or SIGTERM.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be registered.
pub fn install_signal_handlers(flag: ShutdownFlag) -> std::io::Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        let mut interrupt = signal(SignalKind::interrupt())?;
        Ok(tokio::spawn(async move {
            tokio::select! {
                _ = terminate.recv() => info!("Received SIGTERM, stopping"),
                _ = interrupt.recv() => info!("Received SIGINT, stopping"),
            }
            flag.request();
        }))
    }

    #[cfg(not(unix))]
    {
        Ok(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, stopping");
                flag.request();
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_clear() {
        assert!(!ShutdownFlag::new().is_requested());
    }

    #[test]
    fn test_request_is_shared_and_monotonic() {
        let flag = ShutdownFlag::new();
        let observer = flag.clone();

        flag.request();
        assert!(observer.is_requested());

        flag.request();
        assert!(observer.is_requested());
    }

    #[tokio::test]
    async fn test_install_signal_handlers() {
        let flag = ShutdownFlag::new();
        let handle = install_signal_handlers(flag.clone()).unwrap();
        assert!(!flag.is_requested());
        handle.abort();
    }
}
