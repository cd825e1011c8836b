//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Source adapters (searches, candidates returned)
//! - Availability checks per debrid provider
//! - Link resolution (outcomes, polls)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Source Metrics
// =============================================================================

/// Source searches total by result.
pub static SOURCE_SEARCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cachescout_source_searches_total",
            "Total searches issued to torrent sources",
        ),
        &["source", "result"], // result: "success", "error"
    )
    .unwrap()
});

/// Candidates returned per source search.
pub static SOURCE_CANDIDATES: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cachescout_source_candidates",
            "Number of candidates returned per source search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Debrid Metrics
// =============================================================================

/// Availability checks total by provider and result.
pub static AVAILABILITY_CHECKS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cachescout_availability_checks_total",
            "Total instant-availability checks",
        ),
        &["provider", "result"], // result: "success", "error"
    )
    .unwrap()
});

/// Link resolutions total by outcome.
pub static LINK_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cachescout_link_resolutions_total",
            "Total link resolution attempts",
        ),
        &["outcome"], // "resolved" or the reason no link was produced
    )
    .unwrap()
});

/// Status polls per link resolution.
pub static RESOLVE_POLLS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cachescout_resolve_polls",
            "Number of status polls per link resolution",
        )
        .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SOURCE_SEARCHES.clone()),
        Box::new(SOURCE_CANDIDATES.clone()),
        Box::new(AVAILABILITY_CHECKS.clone()),
        Box::new(LINK_RESOLUTIONS.clone()),
        Box::new(RESOLVE_POLLS.clone()),
    ]
}
