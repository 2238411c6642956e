//! Cached "last download date" indicator
//!
//! The value is read by status displays and written only indirectly: a successful
//! batch download calls [`CacheInvalidator::invalidate`], and the next
//! [`LastDownloadDateCache::get`] refetches from the service.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::client::{ClientResult, DataService};
use crate::downloader::config::last_date_stale_after;

/// Receiver of the "invalidate last download date" signal.
pub trait CacheInvalidator: Send + Sync {
    /// Mark the cached value stale so the next read refetches it.
    fn invalidate(&self);
}

#[derive(Debug, Clone)]
struct CachedValue {
    value: Option<String>,
    fetched_at: Instant,
}

/// Last-download-date value with a freshness window
pub struct LastDownloadDateCache {
    service: Arc<dyn DataService>,
    stale_after: Duration,
    entry: Mutex<Option<CachedValue>>,
    invalidated: AtomicBool,
    invalidations: AtomicU64,
}

impl LastDownloadDateCache {
    /// Create a cache with the default freshness window.
    pub fn new(service: Arc<dyn DataService>) -> Self {
        Self::with_stale_after(service, last_date_stale_after())
    }

    /// Create a cache with a custom freshness window.
    pub fn with_stale_after(service: Arc<dyn DataService>, stale_after: Duration) -> Self {
        Self {
            service,
            stale_after,
            entry: Mutex::new(None),
            invalidated: AtomicBool::new(false),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Current value, refetched when missing, stale or invalidated.
    ///
    /// A failed refetch leaves the previous entry untouched.
    pub async fn get(&self) -> ClientResult<Option<String>> {
        if !self.invalidated.load(Ordering::SeqCst) {
            if let Some(cached) = self.fresh_entry() {
                debug!("Serving cached last download date");
                return Ok(cached.value);
            }
        }

        // Clear before fetching so an invalidation racing the fetch is not lost.
        self.invalidated.store(false, Ordering::SeqCst);
        let value = match self.service.last_download_date().await {
            Ok(value) => value,
            Err(e) => {
                self.invalidated.store(true, Ordering::SeqCst);
                warn!(error = %e, "Failed to refresh last download date");
                return Err(e);
            }
        };

        *self.lock() = Some(CachedValue {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        debug!(value = ?value, "Last download date refreshed");
        Ok(value)
    }

    /// Cached value without touching the network.
    pub fn peek(&self) -> Option<Option<String>> {
        self.lock().as_ref().map(|cached| cached.value.clone())
    }

    /// Whether the next [`get`](Self::get) will refetch.
    pub fn is_stale(&self) -> bool {
        self.invalidated.load(Ordering::SeqCst) || self.fresh_entry().is_none()
    }

    /// Number of invalidation signals received.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations.load(Ordering::SeqCst)
    }

    fn fresh_entry(&self) -> Option<CachedValue> {
        self.lock()
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.stale_after)
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CachedValue>> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheInvalidator for LastDownloadDateCache {
    fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        debug!("Last download date invalidated");
    }
}
