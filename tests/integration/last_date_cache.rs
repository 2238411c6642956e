//! Integration tests for last-download-date invalidation through the orchestrator

use nse_batch_downloader::cache::{CacheInvalidator, LastDownloadDateCache};
use nse_batch_downloader::downloader::DownloadOrchestrator;
use std::sync::Arc;

use crate::support::{four_files_per_date, wires, FakeService};

fn wired(service: &Arc<FakeService>) -> (Arc<LastDownloadDateCache>, DownloadOrchestrator) {
    let cache = Arc::new(LastDownloadDateCache::new(service.clone()));
    let orchestrator = DownloadOrchestrator::new(service.clone(), cache.clone());
    (cache, orchestrator)
}

#[tokio::test]
async fn test_success_invalidates_exactly_once() {
    let dates = wires(&["01012024", "02012024"]);
    let service = Arc::new(FakeService::returning(four_files_per_date(&dates)));
    service.set_last_date(Some("29122023"));
    let (cache, orchestrator) = wired(&service);

    assert_eq!(cache.get().await.unwrap(), Some("29122023".to_string()));
    assert!(!cache.is_stale());

    service.set_last_date(Some("02012024"));
    orchestrator.trigger(&dates).await.unwrap();

    assert_eq!(cache.invalidation_count(), 1);
    assert!(cache.is_stale());
    assert_eq!(cache.peek(), Some(Some("29122023".to_string())));

    assert_eq!(cache.get().await.unwrap(), Some("02012024".to_string()));
    assert_eq!(service.last_date_calls(), 2);
}

#[tokio::test]
async fn test_failure_leaves_cache_fresh() {
    let service = Arc::new(FakeService::failing(502));
    service.set_last_date(Some("29122023"));
    let (cache, orchestrator) = wired(&service);

    cache.get().await.unwrap();
    assert!(orchestrator.trigger(&wires(&["01012024"])).await.is_err());

    assert_eq!(cache.invalidation_count(), 0);
    assert!(!cache.is_stale());
    cache.get().await.unwrap();
    assert_eq!(service.last_date_calls(), 1);
}

#[tokio::test]
async fn test_invalidate_before_first_read_is_harmless() {
    let service = Arc::new(FakeService::returning(Vec::new()));
    let cache = LastDownloadDateCache::new(service.clone());

    cache.invalidate();
    assert_eq!(cache.peek(), None);
    assert_eq!(cache.get().await.unwrap(), None);
    assert_eq!(service.last_date_calls(), 1);
}
