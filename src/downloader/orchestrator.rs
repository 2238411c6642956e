//! Batch download lifecycle

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::DownloadError;
use crate::cache::CacheInvalidator;
use crate::client::{ClientError, DataService};
use crate::date::WireDate;
use crate::metrics::{record_batch, BatchOutcome};
use crate::shutdown::SharedShutdown;

/// Files produced by one successful batch download. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    files: Vec<String>,
}

impl DownloadOutcome {
    /// File identifiers in server order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Number of files produced.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Final path segment of each identifier, for compact listings.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(|file| file.rsplit('/').next().unwrap_or(file))
    }
}

/// Lifecycle of the most recent trigger.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrchestratorState {
    /// Nothing attempted yet, or the last attempt was abandoned
    #[default]
    Idle,
    /// Request in flight
    Pending {
        /// Number of dates in the request
        dates: usize,
    },
    /// Last attempt produced files
    Succeeded(DownloadOutcome),
    /// Last attempt failed
    Failed {
        /// Human-readable cause
        reason: String,
    },
}

impl OrchestratorState {
    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Short lowercase name of the state.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Runs batch downloads one at a time and publishes their state.
pub struct DownloadOrchestrator {
    service: Arc<dyn DataService>,
    invalidator: Arc<dyn CacheInvalidator>,
    state: watch::Sender<OrchestratorState>,
    in_flight: AtomicBool,
    last_outcome: Mutex<Option<DownloadOutcome>>,
    shutdown: Option<SharedShutdown>,
}

impl DownloadOrchestrator {
    /// Create an idle orchestrator.
    ///
    /// # Arguments
    /// * `service` - Remote service that performs the batch download
    /// * `invalidator` - Notified after every successful download
    pub fn new(service: Arc<dyn DataService>, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        let (state, _) = watch::channel(OrchestratorState::Idle);
        Self {
            service,
            invalidator,
            state,
            in_flight: AtomicBool::new(false),
            last_outcome: Mutex::new(None),
            shutdown: None,
        }
    }

    /// Abandon a pending request when `shutdown` is requested.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Current state.
    pub fn state(&self) -> OrchestratorState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.state.subscribe()
    }

    /// Whether a trigger is in flight.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Files from the most recent successful download.
    pub fn last_outcome(&self) -> Option<DownloadOutcome> {
        self.outcome_slot().clone()
    }

    /// Download every date in `snapshot` with a single request.
    ///
    /// Does not touch any selection; clearing it after success is the caller's call.
    ///
    /// # Errors
    /// - [`DownloadError::EmptySelection`] if `snapshot` is empty (no request, state unchanged)
    /// - [`DownloadError::AlreadyInProgress`] if another trigger is pending (no request)
    /// - [`DownloadError::TransportFailure`] if the request fails or yields no files
    /// - [`DownloadError::Cancelled`] if shutdown was requested before or during the request
    pub async fn trigger(&self, snapshot: &[WireDate]) -> Result<DownloadOutcome, DownloadError> {
        if snapshot.is_empty() {
            warn!("Download triggered with no dates selected");
            return Err(DownloadError::EmptySelection);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(dates = snapshot.len(), "Download already in progress, ignoring trigger");
            return Err(DownloadError::AlreadyInProgress);
        }
        let _guard = InFlightGuard {
            in_flight: &self.in_flight,
            state: &self.state,
        };

        let started = Instant::now();
        self.state.send_replace(OrchestratorState::Pending {
            dates: snapshot.len(),
        });
        info!(dates = snapshot.len(), "Batch download started");

        let result = match self.request(snapshot).await {
            Ok(files) if files.is_empty() => Err(DownloadError::TransportFailure(
                ClientError::InvalidResponse("server produced no files".to_string()),
            )),
            Ok(files) => Ok(DownloadOutcome { files }),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                self.invalidator.invalidate();
                *self.outcome_slot() = Some(outcome.clone());
                self.state
                    .send_replace(OrchestratorState::Succeeded(outcome.clone()));

                record_batch(
                    BatchOutcome::Succeeded,
                    snapshot.len(),
                    outcome.file_count(),
                    started.elapsed(),
                );
                info!(
                    dates = snapshot.len(),
                    files = outcome.file_count(),
                    "Successfully downloaded {} files",
                    outcome.file_count()
                );
                Ok(outcome)
            }
            Err(e) => {
                let label = match e {
                    DownloadError::Cancelled => BatchOutcome::Cancelled,
                    _ => BatchOutcome::Failed,
                };
                record_batch(label, snapshot.len(), 0, started.elapsed());
                error!(dates = snapshot.len(), error = %e, "Failed to download files");

                self.state.send_replace(OrchestratorState::Failed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn request(&self, snapshot: &[WireDate]) -> Result<Vec<String>, DownloadError> {
        match &self.shutdown {
            Some(shutdown) if shutdown.is_shutdown_requested() => Err(DownloadError::Cancelled),
            Some(shutdown) => tokio::select! {
                biased;
                _ = shutdown.wait_for_shutdown() => Err(DownloadError::Cancelled),
                result = self.service.download_csvs(snapshot) => {
                    result.map_err(DownloadError::from)
                }
            },
            None => self
                .service
                .download_csvs(snapshot)
                .await
                .map_err(DownloadError::from),
        }
    }

    fn outcome_slot(&self) -> MutexGuard<'_, Option<DownloadOutcome>> {
        self.last_outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the no-overlap flag when a trigger ends, however it ends.
struct InFlightGuard<'a> {
    in_flight: &'a AtomicBool,
    state: &'a watch::Sender<OrchestratorState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // Still pending here means the trigger future was dropped before settling.
        self.state.send_if_modified(|state| {
            if state.is_pending() {
                *state = OrchestratorState::Idle;
                true
            } else {
                false
            }
        });
        self.in_flight.store(false, Ordering::SeqCst);
    }
}
