//! # NSE Batch Downloader Library
//!
//! Pick trading dates, then ask the NSE data service to produce every categorized
//! data file (stocks, indices, market analysis, broad market) for those dates in a
//! single batch request.
//!
//! ## Features
//!
//! - **Strict date handling**: `YYYY-MM-DD` input, `DDMMYYYY` on the wire, no
//!   impossible calendar dates in between
//! - **Range selection**: inclusive day-by-day expansion, merged into or replacing
//!   the current selection
//! - **Single-flight downloads**: one batch request at a time, with observable
//!   `Idle → Pending → Succeeded | Failed` state
//! - **Cache invalidation**: a successful batch marks the "last download date" stale
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use nse_batch_downloader::cache::LastDownloadDateCache;
//! use nse_batch_downloader::client::HttpDataService;
//! use nse_batch_downloader::downloader::DownloadOrchestrator;
//! use nse_batch_downloader::selection::RangePolicy;
//! use nse_batch_downloader::session::DownloadSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = Arc::new(HttpDataService::new("http://localhost:3000")?);
//! let cache = Arc::new(LastDownloadDateCache::new(service.clone()));
//! let orchestrator = Arc::new(DownloadOrchestrator::new(service, cache.clone()));
//!
//! let mut session = DownloadSession::new(orchestrator, RangePolicy::Merge);
//! session.on_add_single_date("2024-01-01")?;
//! session.on_add_range("2024-01-03", "2024-01-05")?;
//!
//! let outcome = session.on_trigger_download().await?;
//! println!("{} files, last download {:?}", outcome.file_count(), cache.get().await?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`date`] - DisplayDate ⇄ WireDate codec and range expansion
//! - [`selection`] - Unique, insertion-ordered set of selected dates
//! - [`downloader`] - Batch download orchestration and its state
//! - [`client`] - Remote service trait and HTTP implementation
//! - [`cache`] - Last-download-date cache and invalidation
//! - [`session`] - Event-style façade tying the above together

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Last-download-date cache
pub mod cache;

/// CLI command implementations
pub mod cli;

/// Remote service client
pub mod client;

/// Date codec and range expansion
pub mod date;

/// Download orchestration
pub mod downloader;

/// Download metrics
pub mod metrics;

/// Date selection
pub mod selection;

/// Selection session façade
pub mod session;

/// Graceful shutdown coordination
pub mod shutdown;

// Re-export commonly used types
pub use date::WireDate;
pub use downloader::{DownloadOrchestrator, DownloadOutcome, OrchestratorState};
pub use selection::{RangePolicy, SelectionSet};
pub use session::DownloadSession;
