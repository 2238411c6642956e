//! Download command implementation

use crate::cache::LastDownloadDateCache;
use crate::client::HttpDataService;
use crate::date;
use crate::downloader::config::{DEFAULT_API_URL, HTTP_REQUEST_TIMEOUT_SECS};
use crate::downloader::{DownloadOrchestrator, DownloadOutcome};
use crate::selection::{RangePolicy, SelectionError};
use crate::session::{DownloadSession, SessionError};
use crate::shutdown::SharedShutdown;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::CliError;

/// Spinner refresh rate while a batch is pending
const SPINNER_TICK: Duration = Duration::from_millis(120);

/// Files listed in human output before summarising the rest
const MAX_LISTED_FILES: usize = 5;

/// NSE batch downloader CLI
#[derive(Parser, Debug)]
#[command(name = "nse-batch-downloader")]
#[command(about = "Select trading dates and download their NSE data files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the NSE data service
    #[arg(long, global = true, env = "NSE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Overall request timeout in seconds (1-600)
    #[arg(
        long,
        global = true,
        default_value_t = HTTP_REQUEST_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=600)
    )]
    pub timeout_secs: u64,

    /// Output format (json or human)
    #[arg(long, global = true, default_value = "human")]
    pub output_format: OutputFormat,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,
}

impl Cli {
    /// HTTP service configured from the global options.
    pub fn service(&self) -> Result<HttpDataService, CliError> {
        Ok(HttpDataService::with_timeout(
            &self.api_url,
            Duration::from_secs(self.timeout_secs),
        )?)
    }
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download data files for the selected dates
    Download(DownloadArgs),

    /// Show the date of the most recent download
    LastDate,

    /// Show the service's current date
    Today,

    /// Convert a date between YYYY-MM-DD and DDMMYYYY
    Convert(super::ConvertCommand),
}

/// Inclusive date range argument, `START:END` in `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeArg {
    /// First day
    pub start: String,
    /// Last day
    pub end: String,
}

impl FromStr for RangeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| format!("Invalid range: {s}. Expected START:END"))?;
        if start.is_empty() || end.is_empty() {
            return Err("Please select both start and end dates".to_string());
        }
        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Download command arguments
///
/// Selections are applied in order: single dates, then ranges, then exclusions.
#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Single date to select (YYYY-MM-DD), repeatable
    #[arg(long = "date")]
    pub dates: Vec<String>,

    /// Inclusive range to select (YYYY-MM-DD:YYYY-MM-DD), repeatable
    #[arg(long = "range")]
    pub ranges: Vec<RangeArg>,

    /// Date to drop from the selection (YYYY-MM-DD), repeatable
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// How a range combines with dates already selected (merge or replace)
    #[arg(long, default_value = "merge")]
    pub range_policy: RangePolicy,
}

impl DownloadArgs {
    /// Build the selection, run the batch download and report the files.
    pub async fn execute(&self, cli: &Cli, shutdown: SharedShutdown) -> Result<(), CliError> {
        let service = Arc::new(cli.service()?);
        let cache = Arc::new(LastDownloadDateCache::new(service.clone()));
        let orchestrator = Arc::new(
            DownloadOrchestrator::new(service, cache.clone()).with_shutdown(shutdown),
        );

        let mut session = DownloadSession::new(orchestrator, self.range_policy);
        self.apply(&mut session)?;

        info!(
            dates = session.selection().len(),
            api_url = %cli.api_url,
            "Requesting batch download"
        );

        let spinner = match cli.output_format {
            OutputFormat::Human => Some(pending_spinner(session.selection().len())?),
            OutputFormat::Json => None,
        };
        let requested = session.selected_display_dates();
        let result = session.on_trigger_download().await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let outcome = result?;

        let last_date = match cache.get().await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Could not refresh last download date");
                None
            }
        };

        print_outcome(cli.output_format, &requested, &outcome, last_date.as_deref());
        Ok(())
    }

    /// Apply dates, ranges and exclusions to `session`.
    pub fn apply(&self, session: &mut DownloadSession) -> Result<(), CliError> {
        for display in &self.dates {
            match session.on_add_single_date(display) {
                Ok(_) => {}
                Err(SessionError::Selection(SelectionError::DuplicateDate(wire))) => {
                    warn!(date = %wire.to_display(), "Date already selected, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        for range in &self.ranges {
            session.on_add_range(&range.start, &range.end)?;
        }

        for excluded in &self.excludes {
            let wire = date::to_wire(excluded.trim())?;
            if !session.on_remove_date(&wire) {
                warn!(date = %excluded, "Excluded date was not selected");
            }
        }

        Ok(())
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable output
    Human,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

fn pending_spinner(dates: usize) -> Result<ProgressBar, CliError> {
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg} [{elapsed}]")
        .map_err(|e| CliError::ConfigurationError(format!("invalid spinner template: {e}")))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(format!("Downloading files for {dates} date(s)..."));
    spinner.enable_steady_tick(SPINNER_TICK);
    Ok(spinner)
}

fn print_outcome(
    format: OutputFormat,
    requested: &[String],
    outcome: &DownloadOutcome,
    last_date: Option<&str>,
) {
    match format {
        OutputFormat::Json => {
            let output = json!({
                "status": "succeeded",
                "dates": requested,
                "file_count": outcome.file_count(),
                "files": outcome.files(),
                "last_download_date": last_date,
            });
            println!("{output}");
        }
        OutputFormat::Human => {
            println!("Successfully downloaded {} files", outcome.file_count());
            println!("  Dates: {}", requested.join(", "));
            for name in outcome.file_names().take(MAX_LISTED_FILES) {
                println!("  - {name}");
            }
            if outcome.file_count() > MAX_LISTED_FILES {
                println!("  ... and {} more", outcome.file_count() - MAX_LISTED_FILES);
            }
            if let Some(last) = last_date {
                println!("  Last download date: {last}");
            }
        }
    }
}
