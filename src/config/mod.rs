pub mod constants;
pub mod settings;

pub use settings::{clamp_query_count, ConfigError, InferenceSettings, ScraperSettings, Settings};
