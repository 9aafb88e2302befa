//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically scans the store
//! for expired keys and removes them. This is "active expiry" as opposed to the
//! "lazy expiry" that `get` performs on every read.
//!
//! Lazy expiry alone never reclaims memory for a key that expires and is never
//! read again. The sweeper runs on a fixed interval (default: 1s) and removes
//! every entry whose deadline has passed.
//!
//! Stopping is a one-shot signal observed at the sweeper's next wake-up;
//! [`ExpirySweeper::stop`] may be called any number of times.

use crate::storage::StorageEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 1s)
    pub interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use linekv::storage::{StorageEngine, ExpirySweeper, ExpiryConfig};
    /// use std::sync::Arc;
    ///
    /// let engine = Arc::new(StorageEngine::new());
    /// let sweeper = ExpirySweeper::start(engine, ExpiryConfig::default());
    ///
    /// // Sweeper runs in the background...
    ///
    /// sweeper.stop();
    /// ```
    pub fn start(engine: Arc<StorageEngine>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(sweeper_loop(engine, config.clone(), shutdown_rx));

        info!(
            interval_ms = config.interval.as_millis() as u64,
            "Background expiry sweeper started"
        );

        Self { shutdown_tx, task }
    }

    /// Stops the expiry sweeper.
    ///
    /// Safe to call more than once; only the first call has an effect.
    pub fn stop(&self) {
        let first = self.shutdown_tx.send_if_modified(|stopped| {
            let changed = !*stopped;
            *stopped = true;
            changed
        });

        if first {
            info!("Background expiry sweeper stopped");
        }
    }

    /// Returns true once the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    engine: Arc<StorageEngine>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let expired = engine.cleanup_expired();

        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = engine.len(),
                "Expired keys cleaned up"
            );
        }
    }
}
