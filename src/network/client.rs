// * Scraping service client
// * Runs the Google Search Scraper actor synchronously and reads account usage.
// * One HTTP call per operation; no retries, failures go straight to the caller.

use crate::config::constants::{
    GOOGLE_SEARCH_ACTOR, MAX_ERROR_BODY_CHARS, MONTHLY_QUERY_LIMIT, RESULTS_PER_PAGE, SERP_UNIT,
};
use crate::config::settings::{clamp_query_count, ScraperSettings};
use crate::network::errors::NetworkError;
use crate::network::source::{ReviewSource, SourceFuture};
use crate::ops::telemetry;
use crate::refinery::extractor::RawResultPage;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

const SERVICE: &str = "apify";

pub struct ApifyClient {
    inner: Client,
    base_url: Url,
    token: String,
}

impl ApifyClient {
    // * Builds the client; fails fast when no API token is configured.
    pub fn new(settings: &ScraperSettings) -> Result<Self, NetworkError> {
        let token = settings.require_token()?.to_string();
        let base_url = Url::parse(&settings.base_url)?;

        let inner = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            inner,
            base_url,
            token,
        })
    }

    // * Joins `path` onto the base URL and appends the token query parameter.
    fn endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }

    // * Runs the search actor and returns its dataset items.
    pub async fn search(
        &self,
        query: &str,
        num_results: u32,
    ) -> Result<Vec<RawResultPage>, NetworkError> {
        let url = self.endpoint(&format!(
            "/v2/acts/{}/run-sync-get-dataset-items",
            GOOGLE_SEARCH_ACTOR
        ))?;
        let input = build_run_input(query, num_results);

        tracing::info!(query = %query, num_results, "Running search actor");
        let started = Instant::now();

        let result = self.post_json(url, &input).await.and_then(|body| parse_dataset(&body));

        telemetry::record_request(SERVICE, result.is_ok(), started.elapsed().as_secs_f64());

        let pages = result?;
        tracing::info!(pages = pages.len(), "Search actor finished");
        Ok(pages)
    }

    // * Reads this month's SERP usage for the account.
    pub async fn usage(&self) -> Result<UsageReport, NetworkError> {
        let url = self.endpoint("/v2/users/me/usage/monthly")?;
        let started = Instant::now();

        let result = self.get_text(url).await.and_then(|body| {
            let value: Value = serde_json::from_str(&body)?;
            parse_usage(&value, Utc::now())
        });

        telemetry::record_request(SERVICE, result.is_ok(), started.elapsed().as_secs_f64());
        result
    }

    async fn post_json(&self, url: Url, body: &Value) -> Result<String, NetworkError> {
        let resp = self.inner.post(url).json(body).send().await?;
        check_status(resp).await
    }

    async fn get_text(&self, url: Url) -> Result<String, NetworkError> {
        let resp = self.inner.get(url).send().await?;
        check_status(resp).await
    }
}

impl ReviewSource for ApifyClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn fetch_pages<'a>(&'a self, query: &'a str, num_results: u32) -> SourceFuture<'a> {
        Box::pin(self.search(query, num_results))
    }
}

async fn check_status(resp: Response) -> Result<String, NetworkError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(NetworkError::Status {
            service: SERVICE,
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    Ok(body)
}

/// Actor input for a review search. The result count is snapped to 100..=1000.
pub fn build_run_input(query: &str, num_results: u32) -> Value {
    let num_results = clamp_query_count(num_results);
    json!({
        "queries": format!("{} review", query),
        "maxPagesPerQuery": num_results / RESULTS_PER_PAGE,
        "resultsPerPage": RESULTS_PER_PAGE,
        "countryCode": "",
    })
}

/// Parses a dataset body: a JSON array of result pages
pub fn parse_dataset(body: &str) -> Result<Vec<RawResultPage>, NetworkError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => Ok(items.into_iter().map(RawResultPage).collect()),
        other => Err(NetworkError::UnexpectedShape(format!(
            "expected a JSON array of pages, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Monthly SERP usage of the scraping account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub queries_used: u64,
    pub monthly_limit: u64,
    pub cycle_end: DateTime<Utc>,
    pub resets_in_days: i64,
    pub resets_in_hours: i64,
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} queries used this month. Resets in {} days, {} hours.",
            group_thousands(self.queries_used),
            group_thousands(self.monthly_limit),
            self.resets_in_days,
            self.resets_in_hours
        )
    }
}

/// Builds a usage report from the monthly usage payload, relative to `now`.
///
/// Accounts with no SERP usage yet have no `PROXY_SERPS` entry; that counts as 0.
pub fn parse_usage(value: &Value, now: DateTime<Utc>) -> Result<UsageReport, NetworkError> {
    let data = value
        .get("data")
        .ok_or_else(|| NetworkError::UnexpectedShape("missing data".to_string()))?;

    let end_at = data
        .pointer("/usageCycle/endAt")
        .and_then(Value::as_str)
        .ok_or_else(|| NetworkError::UnexpectedShape("missing usageCycle.endAt".to_string()))?;

    let cycle_end = DateTime::parse_from_rfc3339(end_at)
        .map_err(|e| NetworkError::UnexpectedShape(format!("bad endAt '{}': {}", end_at, e)))?
        .with_timezone(&Utc);

    let quantity = data
        .pointer("/monthlyServiceUsage/PROXY_SERPS/quantity")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    // * A cycle that already ended reports zero time left
    let remaining = (cycle_end - now).max(chrono::Duration::zero());

    Ok(UsageReport {
        queries_used: (quantity * SERP_UNIT).round().max(0.0) as u64,
        monthly_limit: MONTHLY_QUERY_LIMIT,
        cycle_end,
        resets_in_days: remaining.num_days(),
        resets_in_hours: (remaining - chrono::Duration::days(remaining.num_days())).num_hours(),
    })
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_input_shape() {
        let input = build_run_input("PS5 Console", 300);
        assert_eq!(input["queries"], "PS5 Console review");
        assert_eq!(input["maxPagesPerQuery"], 3);
        assert_eq!(input["resultsPerPage"], 100);
        assert_eq!(input["countryCode"], "");
    }

    #[test]
    fn test_run_input_clamps_count() {
        assert_eq!(build_run_input("x", 10)["maxPagesPerQuery"], 1);
        assert_eq!(build_run_input("x", 99_999)["maxPagesPerQuery"], 10);
    }

    #[test]
    fn test_parse_dataset() {
        let pages = parse_dataset(r#"[{"organicResults": []}, {"organicResults": []}]"#).unwrap();
        assert_eq!(pages.len(), 2);

        let err = parse_dataset(r#"{"error": "nope"}"#).unwrap_err();
        assert!(matches!(err, NetworkError::UnexpectedShape(_)));

        assert!(matches!(parse_dataset("not json"), Err(NetworkError::Decode(_))));
    }

    #[test]
    fn test_parse_usage() {
        let value = json!({
            "data": {
                "usageCycle": { "startAt": "2024-03-01T00:00:00.000Z", "endAt": "2024-03-31T23:59:59.999Z" },
                "monthlyServiceUsage": { "PROXY_SERPS": { "quantity": 12.5 } }
            }
        });
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();

        let report = parse_usage(&value, now).unwrap();
        assert_eq!(report.queries_used, 1250);
        assert_eq!(report.resets_in_days, 11);
        assert_eq!(report.resets_in_hours, 11);
        assert_eq!(
            report.to_string(),
            "1,250 / 50,000 queries used this month. Resets in 11 days, 11 hours."
        );
    }

    #[test]
    fn test_parse_usage_without_serps() {
        let value = json!({
            "data": {
                "usageCycle": { "endAt": "2024-03-31T23:59:59Z" },
                "monthlyServiceUsage": {}
            }
        });
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let report = parse_usage(&value, now).unwrap();
        assert_eq!(report.queries_used, 0);
        assert_eq!(report.resets_in_days, 0);
        assert_eq!(report.resets_in_hours, 23);
    }

    #[test]
    fn test_parse_usage_after_cycle_end() {
        let value = json!({
            "data": {
                "usageCycle": { "endAt": "2024-03-31T00:00:00Z" },
                "monthlyServiceUsage": { "PROXY_SERPS": { "quantity": 1 } }
            }
        });
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let report = parse_usage(&value, now).unwrap();
        assert_eq!(report.resets_in_days, 0);
        assert_eq!(report.resets_in_hours, 0);
        assert!(report.to_string().ends_with("Resets in 0 days, 0 hours."));
    }

    #[test]
    fn test_parse_usage_missing_cycle() {
        let err = parse_usage(&json!({ "data": {} }), Utc::now()).unwrap_err();
        assert!(matches!(err, NetworkError::UnexpectedShape(_)));
    }

    #[test]
    fn test_client_requires_token() {
        let result = ApifyClient::new(&ScraperSettings::default());
        assert!(matches!(result, Err(NetworkError::Config(_))));
    }

    #[test]
    fn test_endpoint_carries_token() {
        let settings = ScraperSettings {
            api_token: Some("secret".to_string()),
            ..ScraperSettings::default()
        };
        let client = ApifyClient::new(&settings).unwrap();
        let url = client.endpoint("/v2/users/me/usage/monthly").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.apify.com/v2/users/me/usage/monthly?token=secret"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(50_000), "50,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
