//! Remote data service access

use crate::date::WireDate;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpDataService;

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Request could not be sent or the connection failed
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, if readable
        body: String,
    },

    /// Response body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Response decoded but is not usable
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Server-side calendar information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDetails {
    /// Date as reported by the server
    pub date: String,
    /// Weekday name, e.g. "Monday"
    pub day_of_week: String,
}

impl DateDetails {
    /// Today's date from the local clock, used when the server cannot be reached.
    pub fn local_today() -> Self {
        let now = Local::now();
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            day_of_week: now.format("%A").to_string(),
        }
    }
}

/// Operations offered by the remote data service.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Request one batch download covering every date in `dates`.
    ///
    /// # Returns
    /// Identifiers of the files the server produced, in server order
    async fn download_csvs(&self, dates: &[WireDate]) -> ClientResult<Vec<String>>;

    /// Date of the most recent completed download, if any.
    async fn last_download_date(&self) -> ClientResult<Option<String>>;

    /// The server's notion of today.
    async fn current_date(&self) -> ClientResult<DateDetails>;
}
