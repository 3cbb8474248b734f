//! Prometheus metrics for core components.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Resolution calls by mode and outcome.
pub static RESOLUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tunefeed_resolutions_total", "Total resolution calls"),
        &["mode", "outcome"], // outcome: "local", "fallback", "empty", "invalid_credential"
    )
    .unwrap()
});

/// Which round the local tier succeeded on.
pub static RESOLUTION_ROUNDS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tunefeed_resolution_rounds",
            "Round on which the local tier produced matches",
        )
        .buckets(vec![1.0, 2.0, 3.0]),
        &["mode"],
    )
    .unwrap()
});

/// End-to-end resolution duration.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tunefeed_resolution_duration_seconds",
            "Duration of resolution calls",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["mode"],
    )
    .unwrap()
});

/// Per-candidate catalog lookups by operation and status.
pub static CATALOG_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tunefeed_catalog_lookups_total", "Total catalog lookups"),
        &["operation", "status"], // status: "resolved", "no_match", "error"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RESOLUTIONS_TOTAL.clone()),
        Box::new(RESOLUTION_ROUNDS.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
        Box::new(CATALOG_LOOKUPS.clone()),
    ]
}
