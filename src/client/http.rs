//! reqwest-backed [`DataService`]
//!
//! One request per call. Retry policy belongs to the transport layer the caller
//! configures, so a failure is surfaced immediately.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ClientError, ClientResult, DataService, DateDetails};
use crate::date::WireDate;
use crate::downloader::config::{
    DEFAULT_API_URL, HTTP_CONNECT_TIMEOUT_SECS, HTTP_REQUEST_TIMEOUT_SECS,
};

const DOWNLOAD_ENDPOINT: &str = "/nse/download";
const LAST_DATE_ENDPOINT: &str = "/nse/last-date";
const DATE_DETAILS_ENDPOINT: &str = "/date/details";

#[derive(Serialize)]
struct DownloadRequest<'a> {
    dates: &'a [WireDate],
}

/// HTTP client for the NSE data service
#[derive(Debug, Clone)]
pub struct HttpDataService {
    client: Client,
    base_url: String,
}

impl HttpDataService {
    /// Create a client with the default timeouts.
    ///
    /// # Arguments
    /// * `base_url` - Service root, e.g. "http://localhost:3000"
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
    }

    /// Create a client with an explicit overall request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::from_client(client, base_url))
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Service root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode a JSON body, mapping every failure to [`ClientError`].
    async fn send_json<T>(&self, request: RequestBuilder, endpoint: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(endpoint, status = status.as_u16(), "Non-success response");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint, status = status.as_u16(), "Response received");

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(format!("failed to deserialize response: {e}")))
    }
}

impl Default for HttpDataService {
    fn default() -> Self {
        Self::from_client(Client::new(), DEFAULT_API_URL)
    }
}

#[async_trait]
impl DataService for HttpDataService {
    async fn download_csvs(&self, dates: &[WireDate]) -> ClientResult<Vec<String>> {
        debug!(dates = dates.len(), "POST {}", DOWNLOAD_ENDPOINT);
        let request = self
            .client
            .post(self.url(DOWNLOAD_ENDPOINT))
            .json(&DownloadRequest { dates });
        self.send_json(request, DOWNLOAD_ENDPOINT).await
    }

    async fn last_download_date(&self) -> ClientResult<Option<String>> {
        let request = self.client.get(self.url(LAST_DATE_ENDPOINT));
        self.send_json(request, LAST_DATE_ENDPOINT).await
    }

    async fn current_date(&self) -> ClientResult<DateDetails> {
        let request = self.client.get(self.url(DATE_DETAILS_ENDPOINT));
        self.send_json(request, DATE_DETAILS_ENDPOINT).await
    }
}
