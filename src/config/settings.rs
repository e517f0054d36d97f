// * Runtime settings loaded from the environment
// * Passed explicitly into clients; nothing here is global

use crate::config::constants::{
    APIFY_BASE_URL, HF_INFERENCE_URL, MAX_QUERIES, MIN_QUERIES, QUERY_STEP, REQUEST_TIMEOUT_SECS,
};
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Settings for the scraping service client
#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub api_token: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: APIFY_BASE_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ScraperSettings {
    /// Returns the API token or a config error naming the variable
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .ok_or(ConfigError::MissingVar("APIFY_TOKEN"))
    }
}

/// Settings for the hosted inference endpoint
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    /// Without a token the offline lexicon classifier is used
    pub api_token: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: HF_INFERENCE_URL.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub scraper: ScraperSettings,
    pub inference: InferenceSettings,
}

impl Settings {
    /// Loads settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match non_empty("REVIEW_LENS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "REVIEW_LENS_TIMEOUT_SECS",
                value: raw,
            })?,
            None => REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            scraper: ScraperSettings {
                api_token: non_empty("APIFY_TOKEN"),
                base_url: non_empty("APIFY_BASE_URL").unwrap_or_else(|| APIFY_BASE_URL.to_string()),
                timeout_secs,
            },
            inference: InferenceSettings {
                api_token: non_empty("HF_TOKEN"),
                base_url: non_empty("HF_INFERENCE_URL")
                    .unwrap_or_else(|| HF_INFERENCE_URL.to_string()),
                timeout_secs,
            },
        })
    }
}

/// Snaps a requested result count onto the allowed 100..=1000 grid (step 100)
pub fn clamp_query_count(requested: u32) -> u32 {
    let clamped = requested.clamp(MIN_QUERIES, MAX_QUERIES);
    (clamped / QUERY_STEP) * QUERY_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.scraper.base_url, APIFY_BASE_URL);
        assert_eq!(settings.inference.base_url, HF_INFERENCE_URL);
        assert!(settings.scraper.api_token.is_none());
        assert_eq!(settings.scraper.timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_tokens_and_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("APIFY_TOKEN", "apify-123"),
            ("HF_TOKEN", "hf-456"),
            ("APIFY_BASE_URL", "http://localhost:8080"),
            ("REVIEW_LENS_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(settings.scraper.require_token().unwrap(), "apify-123");
        assert_eq!(settings.inference.api_token.as_deref(), Some("hf-456"));
        assert_eq!(settings.scraper.base_url, "http://localhost:8080");
        assert_eq!(settings.inference.timeout_secs, 15);
    }

    #[test]
    fn test_blank_token_is_missing() {
        let settings = Settings::from_lookup(lookup_from(&[("APIFY_TOKEN", "  ")])).unwrap();
        assert_eq!(
            settings.scraper.require_token(),
            Err(ConfigError::MissingVar("APIFY_TOKEN"))
        );
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Settings::from_lookup(lookup_from(&[("REVIEW_LENS_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_clamp_query_count() {
        assert_eq!(clamp_query_count(0), 100);
        assert_eq!(clamp_query_count(250), 200);
        assert_eq!(clamp_query_count(1000), 1000);
        assert_eq!(clamp_query_count(5000), 1000);
    }
}
