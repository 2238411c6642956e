//! Integration tests for HttpDataService against a mock server

use mockito::Matcher;
use nse_batch_downloader::cache::LastDownloadDateCache;
use nse_batch_downloader::client::{ClientError, DataService, HttpDataService};
use nse_batch_downloader::downloader::DownloadOrchestrator;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::support::{four_files_per_date, wires};

#[tokio::test]
async fn test_download_posts_dates_and_decodes_files() {
    let mut server = mockito::Server::new_async().await;
    let dates = wires(&["01012024", "02012024"]);
    let files = four_files_per_date(&dates);

    let mock = server
        .mock("POST", "/nse/download")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "dates": ["01012024", "02012024"] })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!(files).to_string())
        .expect(1)
        .create_async()
        .await;

    let service = HttpDataService::new(server.url()).unwrap();
    let got = service.download_csvs(&dates).await.unwrap();

    assert_eq!(got, files);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/nse/download")
        .with_status(500)
        .with_body("archive unavailable")
        .create_async()
        .await;

    let service = HttpDataService::new(server.url()).unwrap();
    let err = service
        .download_csvs(&wires(&["01012024"]))
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "archive unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/nse/download")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"files": "not a list"}"#)
        .create_async()
        .await;

    let service = HttpDataService::new(server.url()).unwrap();
    let err = service
        .download_csvs(&wires(&["01012024"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let service =
        HttpDataService::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = service.last_download_date().await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)), "{err:?}");
}

#[tokio::test]
async fn test_last_download_date_null_and_value() {
    let mut empty_server = mockito::Server::new_async().await;
    let _null = empty_server
        .mock("GET", "/nse/last-date")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;
    let service = HttpDataService::new(empty_server.url()).unwrap();
    assert_eq!(service.last_download_date().await.unwrap(), None);

    let mut server = mockito::Server::new_async().await;
    let _value = server
        .mock("GET", "/nse/last-date")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#""05012024""#)
        .create_async()
        .await;
    let service = HttpDataService::new(server.url()).unwrap();
    assert_eq!(
        service.last_download_date().await.unwrap(),
        Some("05012024".to_string())
    );
}

#[tokio::test]
async fn test_current_date_details() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/date/details")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"date":"2024-01-05","dayOfWeek":"Friday"}"#)
        .create_async()
        .await;

    let service = HttpDataService::new(server.url()).unwrap();
    let details = service.current_date().await.unwrap();

    assert_eq!(details.date, "2024-01-05");
    assert_eq!(details.day_of_week, "Friday");
}

/// A successful batch over HTTP makes the next last-date read hit the server again
#[tokio::test]
async fn test_batch_over_http_refreshes_last_date() {
    let mut server = mockito::Server::new_async().await;
    let dates = wires(&["01012024", "02012024"]);

    let download = server
        .mock("POST", "/nse/download")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!(four_files_per_date(&dates)).to_string())
        .expect(1)
        .create_async()
        .await;
    let last_date = server
        .mock("GET", "/nse/last-date")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#""02012024""#)
        .expect(2)
        .create_async()
        .await;

    let service = Arc::new(HttpDataService::new(server.url()).unwrap());
    let cache = Arc::new(LastDownloadDateCache::new(service.clone()));
    let orchestrator = DownloadOrchestrator::new(service, cache.clone());

    cache.get().await.unwrap();
    cache.get().await.unwrap();

    let outcome = orchestrator.trigger(&dates).await.unwrap();
    assert_eq!(outcome.file_count(), 8);

    assert_eq!(cache.get().await.unwrap(), Some("02012024".to_string()));
    download.assert_async().await;
    last_date.assert_async().await;
}
