//! Download configuration constants

use std::time::Duration;

/// Service root used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// HTTP connect timeout (seconds) - time to establish TCP connection
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP request timeout (seconds) - overall time for the entire request.
/// A batch covers several files per date, so this is generous.
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How long a fetched last-download-date stays fresh (seconds)
pub const LAST_DATE_STALE_SECS: u64 = 60;

/// Freshness window for the cached last-download-date
pub fn last_date_stale_after() -> Duration {
    Duration::from_secs(LAST_DATE_STALE_SECS)
}
