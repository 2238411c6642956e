//! Batch download orchestration
//!
//! This module drives one batch request over a snapshot of the selected dates and
//! tracks its lifecycle for whoever renders it.
//!
//! # Overview
//!
//! 1. **Snapshot**: the caller hands over the current selection as `&[WireDate]`
//! 2. **Trigger**: [`DownloadOrchestrator::trigger`] moves `Idle → Pending` and sends
//!    exactly one request carrying every date
//! 3. **Settle**: the state becomes `Succeeded` (with the produced file list) or
//!    `Failed`; success also invalidates the cached last-download-date
//! 4. **Observe**: [`DownloadOrchestrator::subscribe`] yields a watch receiver that
//!    sees every state change
//!
//! Only one trigger may be pending at a time; a second call is rejected with
//! [`DownloadError::AlreadyInProgress`] and issues no request.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use nse_batch_downloader::cache::LastDownloadDateCache;
//! use nse_batch_downloader::client::HttpDataService;
//! use nse_batch_downloader::date::to_wire;
//! use nse_batch_downloader::downloader::DownloadOrchestrator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = Arc::new(HttpDataService::new("http://localhost:3000")?);
//! let cache = Arc::new(LastDownloadDateCache::new(service.clone()));
//! let orchestrator = DownloadOrchestrator::new(service, cache);
//!
//! let outcome = orchestrator.trigger(&[to_wire("2024-01-01")?]).await?;
//! println!("downloaded {} files", outcome.file_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod orchestrator;

pub use orchestrator::{DownloadOrchestrator, DownloadOutcome, OrchestratorState};

use crate::client::ClientError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Trigger attempted with nothing selected
    #[error("no dates selected")]
    EmptySelection,

    /// Another batch download is still pending
    #[error("a batch download is already in progress")]
    AlreadyInProgress,

    /// Shutdown requested while the request was pending
    #[error("batch download cancelled")]
    Cancelled,

    /// Request failed or the server reported an error
    #[error("transport failure: {0}")]
    TransportFailure(#[from] ClientError),
}
