//! User-facing selection session
//!
//! [`DownloadSession`] owns a [`SelectionSet`] and a handle to the
//! [`DownloadOrchestrator`], and turns presentation events into validated
//! mutations. Every error is recoverable and leaves the selection untouched.

use std::sync::Arc;
use tracing::{debug, info};

use crate::date::{self, DateError, WireDate};
use crate::downloader::{DownloadError, DownloadOrchestrator, DownloadOutcome, OrchestratorState};
use crate::selection::{RangePolicy, SelectionError, SelectionSet};

/// Session errors surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Date input error
    #[error(transparent)]
    Date(#[from] DateError),

    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Selection state plus the orchestrator that downloads it
pub struct DownloadSession {
    selection: SelectionSet,
    range_policy: RangePolicy,
    orchestrator: Arc<DownloadOrchestrator>,
}

impl DownloadSession {
    /// Start with an empty selection.
    pub fn new(orchestrator: Arc<DownloadOrchestrator>, range_policy: RangePolicy) -> Self {
        Self {
            selection: SelectionSet::new(),
            range_policy,
            orchestrator,
        }
    }

    /// Add one `YYYY-MM-DD` date.
    ///
    /// # Errors
    /// `InvalidDate` for empty or malformed input, `DuplicateDate` if already selected
    pub fn on_add_single_date(&mut self, display: &str) -> Result<WireDate, SessionError> {
        let wire = date::to_wire(display.trim())?;
        self.selection.add_one(wire)?;
        debug!(date = %wire, "Date added");
        Ok(wire)
    }

    /// Add every date from `start` to `end` inclusive, according to the range policy.
    ///
    /// Returns the number of dates newly selected.
    ///
    /// # Errors
    /// `InvalidRange` if either endpoint is not a date or `start` is after `end`
    pub fn on_add_range(&mut self, start: &str, end: &str) -> Result<usize, SessionError> {
        let dates = date::expand_display(start.trim(), end.trim())?;
        let count = dates.len();

        let added = match self.range_policy {
            RangePolicy::Merge => self.selection.add_many(dates),
            RangePolicy::Replace => {
                self.selection.replace_all(dates);
                self.selection.len()
            }
        };

        info!(
            start,
            end,
            days = count,
            added,
            policy = ?self.range_policy,
            "Date range added"
        );
        Ok(added)
    }

    /// Remove one date. Returns whether it was selected.
    pub fn on_remove_date(&mut self, wire: &WireDate) -> bool {
        let removed = self.selection.remove_one(wire);
        debug!(date = %wire, removed, "Date removed");
        removed
    }

    /// Drop every selected date.
    pub fn on_clear(&mut self) {
        self.selection.clear();
        debug!("All dates cleared");
    }

    /// Download the current selection; clears it on success.
    ///
    /// # Errors
    /// Any [`DownloadError`]; the selection is kept on failure
    pub async fn on_trigger_download(&mut self) -> Result<DownloadOutcome, SessionError> {
        let snapshot = self.selection.snapshot();
        let outcome = self.orchestrator.trigger(&snapshot).await?;
        self.selection.clear();
        Ok(outcome)
    }

    /// Selected dates as `YYYY-MM-DD`, in insertion order.
    pub fn selected_display_dates(&self) -> Vec<String> {
        self.selection.display_dates()
    }

    /// Read access to the selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Active range policy.
    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Change how later range adds combine with the selection.
    pub fn set_range_policy(&mut self, policy: RangePolicy) {
        self.range_policy = policy;
    }

    /// Orchestrator state, for loading and error indicators.
    pub fn state(&self) -> OrchestratorState {
        self.orchestrator.state()
    }

    /// Files from the most recent successful download.
    pub fn last_outcome(&self) -> Option<DownloadOutcome> {
        self.orchestrator.last_outcome()
    }
}
