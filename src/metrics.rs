//! Batch download metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless
//! [`init_metrics`] installs the Prometheus recorder; until then every
//! recording call is a no-op.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, info};

static METRICS_INITIALIZED: OnceCell<SocketAddr> = OnceCell::new();

/// Install the Prometheus exporter and describe the download metrics.
///
/// Idempotent: a second call returns `Ok` without rebinding.
///
/// # Arguments
/// * `addr` - Socket address for the scrape endpoint (e.g., "0.0.0.0:9090")
pub fn init_metrics(addr: SocketAddr) -> Result<(), anyhow::Error> {
    if let Some(existing) = METRICS_INITIALIZED.get() {
        debug!(%existing, "Metrics already initialized, skipping");
        return Ok(());
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "batch_downloads_total",
        Unit::Count,
        "Batch download attempts by outcome"
    );
    describe_counter!(
        "batch_files_total",
        Unit::Count,
        "Files reported by successful batch downloads"
    );
    describe_histogram!(
        "batch_download_duration_seconds",
        Unit::Seconds,
        "Time from trigger to settled batch download"
    );

    let _ = METRICS_INITIALIZED.set(addr);
    info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// Outcome label for [`record_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Server produced files
    Succeeded,
    /// Transport or server failure
    Failed,
    /// Local wait abandoned on shutdown
    Cancelled,
}

impl BatchOutcome {
    fn as_label(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Record one settled batch download.
pub fn record_batch(outcome: BatchOutcome, dates: usize, files: usize, elapsed: Duration) {
    counter!("batch_downloads_total", "outcome" => outcome.as_label()).increment(1);
    histogram!("batch_download_duration_seconds").record(elapsed.as_secs_f64());
    if outcome == BatchOutcome::Succeeded {
        counter!("batch_files_total").increment(files as u64);
    }
    debug!(
        outcome = outcome.as_label(),
        dates,
        files,
        elapsed_ms = elapsed.as_millis() as u64,
        "Batch download recorded"
    );
}
