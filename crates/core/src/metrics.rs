//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (by endpoint and result)
//! - Counter store operations
//! - Search responses discarded as stale

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Catalog requests total by endpoint and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_catalog_requests_total", "Total catalog requests"),
        &["endpoint", "result"], // endpoint: "discover", "search"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_catalog_request_duration_seconds",
            "Duration of catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Counter Store
// =============================================================================

/// Counter store operations total by operation and result.
pub static COUNTER_STORE_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_counter_store_operations_total",
            "Total counter store operations",
        ),
        &["operation", "result"], // operation: "record_search", "list_trending"
    )
    .unwrap()
});

// =============================================================================
// View
// =============================================================================

/// Catalog responses dropped because a newer search was issued.
pub static STALE_RESPONSES_DISCARDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_stale_responses_discarded_total",
        "Catalog responses discarded because a newer search superseded them",
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(COUNTER_STORE_OPERATIONS.clone()),
        Box::new(STALE_RESPONSES_DISCARDED.clone()),
    ]
}
