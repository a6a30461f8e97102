//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by concurrent requests.
///
/// Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Requests answered with a response body
    requests_served: AtomicU64,
    /// Requests failed with a protocol status
    requests_rejected: AtomicU64,
    /// Filters dropped by the lenient policy
    filters_ignored: AtomicU64,
    /// Failed search calls
    search_failures: AtomicU64,
    /// Hits returned across all searches
    hits_returned: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests_served(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filters_ignored(&self) {
        self.filters_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_search_failures(&self) {
        self.search_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_hits(&self, hits: u64) {
        self.hits_returned.fetch_add(hits, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_served: self.requests_served.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            filters_ignored: self.filters_ignored.load(Ordering::Relaxed),
            search_failures: self.search_failures.load(Ordering::Relaxed),
            hits_returned: self.hits_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_served: u64,
    pub requests_rejected: u64,
    pub filters_ignored: u64,
    pub search_failures: u64,
    pub hits_returned: u64,
}
