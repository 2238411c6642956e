//! Integration tests for the selection session façade

use nse_batch_downloader::date::DateError;
use nse_batch_downloader::downloader::{DownloadError, DownloadOrchestrator, OrchestratorState};
use nse_batch_downloader::selection::SelectionError;
use nse_batch_downloader::session::{DownloadSession, SessionError};
use nse_batch_downloader::RangePolicy;
use std::sync::Arc;

use crate::support::{four_files_per_date, wires, CountingInvalidator, FakeService};

struct Harness {
    service: Arc<FakeService>,
    invalidator: Arc<CountingInvalidator>,
    session: DownloadSession,
}

fn harness(service: FakeService, policy: RangePolicy) -> Harness {
    let service = Arc::new(service);
    let invalidator = Arc::new(CountingInvalidator::default());
    let orchestrator = Arc::new(DownloadOrchestrator::new(
        service.clone(),
        invalidator.clone(),
    ));
    Harness {
        service,
        invalidator,
        session: DownloadSession::new(orchestrator, policy),
    }
}

fn idle(policy: RangePolicy) -> Harness {
    harness(FakeService::returning(vec!["file.csv".to_string()]), policy)
}

#[test]
fn test_add_single_date_and_duplicate() {
    let mut h = idle(RangePolicy::Merge);

    let wire = h.session.on_add_single_date("2024-01-01").unwrap();
    assert_eq!(wire.to_string(), "01012024");

    let err = h.session.on_add_single_date("2024-01-01").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Selection(SelectionError::DuplicateDate(d)) if d == wire
    ));
    assert_eq!(h.session.selected_display_dates(), vec!["2024-01-01"]);
}

#[test]
fn test_invalid_and_empty_input_rejected() {
    let mut h = idle(RangePolicy::Merge);
    h.session.on_add_single_date("2024-03-01").unwrap();

    for input in ["2024-02-30", "", "   ", "01/03/2024"] {
        let err = h.session.on_add_single_date(input).unwrap_err();
        assert!(
            matches!(err, SessionError::Date(DateError::InvalidDate(_))),
            "{input:?} gave {err:?}"
        );
    }
    assert_eq!(h.session.selected_display_dates(), vec!["2024-03-01"]);
}

#[test]
fn test_range_merge_appends_missing_days() {
    let mut h = idle(RangePolicy::Merge);
    h.session.on_add_single_date("2024-01-02").unwrap();

    let added = h.session.on_add_range("2024-01-01", "2024-01-03").unwrap();

    assert_eq!(added, 2);
    assert_eq!(
        h.session.selected_display_dates(),
        vec!["2024-01-02", "2024-01-01", "2024-01-03"]
    );
}

#[test]
fn test_range_replace_discards_previous_selection() {
    let mut h = idle(RangePolicy::Replace);
    h.session.on_add_single_date("2023-12-25").unwrap();

    let selected = h.session.on_add_range("2024-01-01", "2024-01-03").unwrap();

    assert_eq!(selected, 3);
    assert_eq!(
        h.session.selection().as_slice(),
        wires(&["01012024", "02012024", "03012024"]).as_slice()
    );
}

#[test]
fn test_policy_can_change_between_ranges() {
    let mut h = idle(RangePolicy::Merge);
    h.session.on_add_range("2024-01-01", "2024-01-02").unwrap();

    h.session.set_range_policy(RangePolicy::Replace);
    h.session.on_add_range("2024-02-01", "2024-02-01").unwrap();

    assert_eq!(h.session.range_policy(), RangePolicy::Replace);
    assert_eq!(h.session.selected_display_dates(), vec!["2024-02-01"]);
}

#[test]
fn test_bad_ranges_leave_selection_untouched() {
    let mut h = idle(RangePolicy::Replace);
    h.session.on_add_single_date("2024-01-10").unwrap();

    for (start, end) in [
        ("2024-01-05", "2024-01-01"),
        ("2024-02-30", "2024-03-01"),
        ("2024-01-01", ""),
    ] {
        let err = h.session.on_add_range(start, end).unwrap_err();
        assert!(
            matches!(err, SessionError::Date(DateError::InvalidRange(_))),
            "{start:?}..{end:?} gave {err:?}"
        );
    }
    assert_eq!(h.session.selected_display_dates(), vec!["2024-01-10"]);
}

#[test]
fn test_remove_and_clear() {
    let mut h = idle(RangePolicy::Merge);
    h.session.on_add_range("2024-01-01", "2024-01-03").unwrap();

    assert!(h.session.on_remove_date(&wires(&["02012024"])[0]));
    assert!(!h.session.on_remove_date(&wires(&["02012024"])[0]));
    assert_eq!(
        h.session.selected_display_dates(),
        vec!["2024-01-01", "2024-01-03"]
    );

    h.session.on_clear();
    assert!(h.session.selection().is_empty());
}

#[tokio::test]
async fn test_trigger_success_clears_selection() {
    let dates = wires(&["01012024", "02012024"]);
    let mut h = harness(
        FakeService::returning(four_files_per_date(&dates)),
        RangePolicy::Merge,
    );
    h.session.on_add_range("2024-01-01", "2024-01-02").unwrap();

    let outcome = h.session.on_trigger_download().await.unwrap();

    assert_eq!(outcome.file_count(), 8);
    assert!(h.session.selection().is_empty());
    assert_eq!(h.session.last_outcome(), Some(outcome.clone()));
    assert_eq!(h.session.state(), OrchestratorState::Succeeded(outcome));
    assert_eq!(h.service.requests(), vec![dates]);
    assert_eq!(h.invalidator.count(), 1);
}

#[tokio::test]
async fn test_trigger_failure_keeps_selection() {
    let mut h = harness(FakeService::failing(500), RangePolicy::Merge);
    h.session.on_add_single_date("2024-01-01").unwrap();

    let err = h.session.on_trigger_download().await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Download(DownloadError::TransportFailure(_))
    ));
    assert_eq!(h.session.selected_display_dates(), vec!["2024-01-01"]);
    assert_eq!(h.session.state().label(), "failed");
    assert_eq!(h.invalidator.count(), 0);
}

#[tokio::test]
async fn test_trigger_with_nothing_selected() {
    let mut h = idle(RangePolicy::Merge);

    let err = h.session.on_trigger_download().await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Download(DownloadError::EmptySelection)
    ));
    assert_eq!(h.service.download_calls(), 0);
    assert_eq!(h.session.state(), OrchestratorState::Idle);
}
