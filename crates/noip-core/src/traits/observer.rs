// # Update Observer
//
// The scheduler reports every tick to an injected observer instead of
// writing to the console itself. The caller decides what an outcome means:
// log it, count it, forward it, or drop it.
//
// ## Implementations
//
// - `LogObserver`: one `tracing` line per outcome (the `log = true` behaviour)
// - `SilentObserver`: discards everything (the `log = false` behaviour)
// - `ChannelObserver`: forwards outcomes to a bounded stream
// - Any `Fn(&UpdateOutcome) + Send + Sync` closure

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};

use crate::response::UpdateResponse;

/// Outcome of one scheduler tick
///
/// Serializes as a tagged object (`"outcome": "completed" | "failed"`) for
/// embedders that export outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The request completed; `body` is the response exactly as received
    Completed {
        hostname: String,
        tick: u64,
        at: DateTime<Utc>,
        body: String,
    },

    /// The request could not be built or executed
    Failed {
        hostname: String,
        tick: u64,
        at: DateTime<Utc>,
        error: String,
    },
}

impl UpdateOutcome {
    /// Hostname the tick was for
    pub fn hostname(&self) -> &str {
        match self {
            Self::Completed { hostname, .. } | Self::Failed { hostname, .. } => hostname,
        }
    }

    /// Tick number, starting at 1
    pub fn tick(&self) -> u64 {
        match self {
            Self::Completed { tick, .. } | Self::Failed { tick, .. } => *tick,
        }
    }

    /// `true` if the request completed (regardless of what the body says)
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Classified response, for completed ticks
    pub fn response(&self) -> Option<UpdateResponse> {
        match self {
            Self::Completed { body, .. } => Some(UpdateResponse::parse(body)),
            Self::Failed { .. } => None,
        }
    }
}

/// Receives the outcome of every scheduler tick
///
/// Called on the scheduler task between the update and the sleep, so
/// implementations should return quickly.
pub trait UpdateObserver: Send + Sync {
    fn on_update(&self, outcome: &UpdateOutcome);
}

impl<F> UpdateObserver for F
where
    F: Fn(&UpdateOutcome) + Send + Sync,
{
    fn on_update(&self, outcome: &UpdateOutcome) {
        self(outcome)
    }
}

/// Logs every outcome through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl UpdateObserver for LogObserver {
    fn on_update(&self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Completed { hostname, body, .. } => {
                info!(hostname = %hostname, "NO-IP is updated: {}", body);

                let status = UpdateResponse::parse(body).status;
                if status.is_fatal() {
                    warn!(
                        hostname = %hostname,
                        "Registrar answered '{}', repeating the request will not fix this",
                        status
                    );
                }
            }
            UpdateOutcome::Failed { hostname, error, .. } => {
                error!(hostname = %hostname, "{}", error);
            }
        }
    }
}

/// Discards every outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl UpdateObserver for SilentObserver {
    fn on_update(&self, _outcome: &UpdateOutcome) {}
}

/// Forwards outcomes to a bounded channel
///
/// When the channel is full the outcome is dropped with a warning, so a slow
/// consumer never stalls the scheduler.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::Sender<UpdateOutcome>,
}

impl ChannelObserver {
    /// Create an observer and the stream its outcomes arrive on
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> (Self, ReceiverStream<UpdateOutcome>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, ReceiverStream::new(rx))
    }
}

impl UpdateObserver for ChannelObserver {
    fn on_update(&self, outcome: &UpdateOutcome) {
        match self.tx.try_send(outcome.clone()) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Outcome channel full, dropping outcome for tick {}", outcome.tick());
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Outcome receiver dropped, discarding tick {}", outcome.tick());
            }
        }
    }
}
