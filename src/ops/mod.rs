// * Operations: logging setup and Prometheus metrics

pub mod telemetry;

pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_classification, record_extraction, record_request, set_sentiment_mean,
};
