//! Fixed-interval update scheduler
//!
//! The UpdateScheduler is responsible for:
//! - Performing one update per tick via an [`Updater`]
//! - Reporting every outcome to an [`UpdateObserver`]
//! - Sleeping a fixed interval between ticks
//! - Stopping promptly when its [`SchedulerHandle`] asks it to
//!
//! ## Tick Flow
//!
//! ```text
//!        ┌─────────────────────────────────────────────┐
//!        ▼                                             │
//! ┌─────────────┐    ┌──────────────┐    ┌─────────────┴───┐
//! │  Updater    │───▶│  Observer    │───▶│ sleep(interval) │
//! │  (update)   │    │  (outcome)   │    │ or stop         │
//! └─────────────┘    └──────────────┘    └─────────────────┘
//! ```
//!
//! 1. Perform one update (the first one fires immediately)
//! 2. Report the outcome, success or failure
//! 3. If a stop was requested, exit
//! 4. Sleep `interval`, waking early on stop
//!
//! Spacing is measured from the end of one update to the start of the next,
//! so request latency accumulates as drift. Errors never end the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::traits::{LogObserver, SilentObserver, UpdateObserver, UpdateOutcome, Updater};

/// Periodic update loop, configured before it is spawned
pub struct UpdateScheduler {
    updater: Arc<dyn Updater>,
    observer: Arc<dyn UpdateObserver>,
    interval: Duration,
}

impl std::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("hostname", &self.updater.hostname())
            .field("interval", &self.interval)
            .finish()
    }
}

impl UpdateScheduler {
    /// Create a scheduler that updates every `interval_secs` seconds
    ///
    /// Outcomes are discarded until an observer is set.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `interval_secs` is zero. A zero interval
    /// would turn the loop into an unthrottled request storm.
    pub fn new(updater: Arc<dyn Updater>, interval_secs: u64) -> Result<Self> {
        if interval_secs == 0 {
            return Err(Error::invalid_input("Update interval must be > 0 seconds"));
        }

        Ok(Self {
            updater,
            observer: Arc::new(SilentObserver),
            interval: Duration::from_secs(interval_secs),
        })
    }

    /// Log outcomes through `tracing` (`true`) or discard them (`false`)
    pub fn with_logging(self, log: bool) -> Self {
        if log {
            self.with_observer(Arc::new(LogObserver))
        } else {
            self.with_observer(Arc::new(SilentObserver))
        }
    }

    /// Report outcomes to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn UpdateObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the loop on the current tokio runtime and return immediately
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let hostname = self.updater.hostname().to_string();

        let task = tokio::spawn(self.run_loop(stop_rx, Arc::clone(&ticks)));

        SchedulerHandle {
            hostname,
            stop_tx,
            ticks,
            task,
        }
    }

    async fn run_loop(self, mut stop_rx: watch::Receiver<bool>, ticks: Arc<AtomicU64>) {
        info!(
            hostname = %self.updater.hostname(),
            "Starting update scheduler (interval={:?})",
            self.interval
        );

        loop {
            let tick = ticks.load(Ordering::SeqCst) + 1;
            let outcome = self.tick(tick).await;
            ticks.store(tick, Ordering::SeqCst);
            self.observer.on_update(&outcome);

            let stop = *stop_rx.borrow();
            if stop {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = stop_requested(&mut stop_rx) => break,
            }
        }

        info!(
            hostname = %self.updater.hostname(),
            "Update scheduler stopped after {} tick(s)",
            ticks.load(Ordering::SeqCst)
        );
    }

    /// Perform one update and package the result
    async fn tick(&self, tick: u64) -> UpdateOutcome {
        let hostname = self.updater.hostname().to_string();

        match self.updater.update().await {
            Ok(body) => {
                debug!(hostname = %hostname, "Tick {} completed", tick);
                UpdateOutcome::Completed {
                    hostname,
                    tick,
                    at: Utc::now(),
                    body,
                }
            }
            Err(e) => {
                debug!(hostname = %hostname, "Tick {} failed: {}", tick, e);
                UpdateOutcome::Failed {
                    hostname,
                    tick,
                    at: Utc::now(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Resolves once a stop is requested
///
/// Never resolves if every handle is gone: a detached loop runs until the
/// process exits.
async fn stop_requested(stop_rx: &mut watch::Receiver<bool>) {
    let closed = stop_rx.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

/// Control handle for a spawned scheduler
///
/// Dropping the handle does NOT stop the loop; it keeps running detached.
/// Use [`SchedulerHandle::stop`] or [`SchedulerHandle::shutdown`] to end it.
#[derive(Debug)]
pub struct SchedulerHandle {
    hostname: String,
    stop_tx: watch::Sender<bool>,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Ask the loop to exit
    ///
    /// An update already in flight completes and is reported first; a
    /// pending sleep is cut short.
    pub fn stop(&self) {
        debug!(hostname = %self.hostname, "Stop requested");
        // send_replace never fails, even with the receiver gone
        self.stop_tx.send_replace(true);
    }

    /// Wait for the loop to exit
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(hostname = %self.hostname, "Scheduler task ended abnormally: {}", e);
        }
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(self) {
        self.stop();
        self.join().await;
    }

    /// `true` once the loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Number of completed ticks (updates attempted and reported)
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}
