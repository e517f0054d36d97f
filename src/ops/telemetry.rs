// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging setup and pipeline counters for the review dashboard

use crate::refinery::extractor::ExtractionStats;
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Result pages by outcome (ok / malformed)
    pub static ref PAGES_TOTAL: CounterVec = register_counter_vec!(
        "review_lens_pages_total",
        "Scraped result pages by outcome",
        &["outcome"]
    ).unwrap();

    // * Per-record projections by field and outcome
    pub static ref RECORDS_TOTAL: CounterVec = register_counter_vec!(
        "review_lens_records_total",
        "Record projections by field and outcome",
        &["field", "outcome"]
    ).unwrap();

    // * Outbound requests by service and status
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "review_lens_requests_total",
        "Outbound requests by service and status",
        &["service", "status"]
    ).unwrap();

    // * Outbound request duration
    pub static ref REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "review_lens_request_duration_seconds",
        "Outbound request duration in seconds",
        &["service"],
        vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]
    ).unwrap();

    // * Classification runs by backend and status
    pub static ref CLASSIFICATIONS_TOTAL: CounterVec = register_counter_vec!(
        "review_lens_classifications_total",
        "Classification runs by backend and status",
        &["backend", "status"]
    ).unwrap();

    // * Most recent weighted sentiment mean per scheme
    pub static ref SENTIMENT_MEAN: GaugeVec = register_gauge_vec!(
        "review_lens_sentiment_mean",
        "Most recent weighted sentiment mean by label scheme",
        &["scheme"]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// `RUST_LOG` takes precedence over the default `info` filter.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes JSON tracing with a custom default level
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}

/// Returns the current metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records the counters of one extracted batch
pub fn record_extraction(stats: &ExtractionStats, descriptions: usize, ratings: usize) {
    let ok_pages = stats.pages - stats.malformed_pages;
    PAGES_TOTAL.with_label_values(&["ok"]).inc_by(ok_pages as f64);
    PAGES_TOTAL
        .with_label_values(&["malformed"])
        .inc_by(stats.malformed_pages as f64);

    RECORDS_TOTAL
        .with_label_values(&["description", "kept"])
        .inc_by(descriptions as f64);
    RECORDS_TOTAL
        .with_label_values(&["description", "skipped"])
        .inc_by(stats.descriptions_skipped as f64);
    RECORDS_TOTAL
        .with_label_values(&["rating", "kept"])
        .inc_by(ratings as f64);
    RECORDS_TOTAL
        .with_label_values(&["rating", "skipped"])
        .inc_by(stats.ratings_skipped as f64);
}

/// Records one outbound request and its duration
pub fn record_request(service: &str, success: bool, seconds: f64) {
    let status = if success { "success" } else { "failure" };
    REQUESTS_TOTAL.with_label_values(&[service, status]).inc();
    REQUEST_DURATION_SECONDS
        .with_label_values(&[service])
        .observe(seconds);
}

/// Records one classification run
pub fn record_classification(backend: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    CLASSIFICATIONS_TOTAL
        .with_label_values(&[backend, status])
        .inc();
}

/// Publishes the latest weighted mean for a label scheme
pub fn set_sentiment_mean(scheme: &str, mean: f64) {
    SENTIMENT_MEAN.with_label_values(&[scheme]).set(mean);
}
