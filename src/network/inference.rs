// * Hosted sentiment classifier
// * Sends cleaned descriptions to a hosted text-classification model and keeps
// * the top-scoring label per input.

use crate::config::constants::{INFERENCE_BATCH_SIZE, MAX_ERROR_BODY_CHARS};
use crate::config::settings::{ConfigError, InferenceSettings};
use crate::engine::classifier::{ClassifierError, ClassifyFuture, SentimentClassifier};
use crate::engine::sentiment::LabelScheme;
use crate::network::errors::NetworkError;
use crate::ops::telemetry;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use url::Url;

const SERVICE: &str = "inference";

pub struct InferenceClassifier {
    inner: Client,
    endpoint: Url,
    token: String,
    scheme: LabelScheme,
}

impl InferenceClassifier {
    // * Builds a classifier for `model`; the model must emit `scheme`'s labels.
    pub fn new(
        settings: &InferenceSettings,
        model: &str,
        scheme: LabelScheme,
    ) -> Result<Self, NetworkError> {
        let token = settings
            .api_token
            .clone()
            .ok_or(ConfigError::MissingVar("HF_TOKEN"))?;
        let endpoint = model_endpoint(&settings.base_url, model)?;

        let inner = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            inner,
            endpoint,
            token,
            scheme,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<String>, ClassifierError> {
        let body = json!({
            "inputs": texts,
            "options": { "wait_for_model": true },
        });

        let started = Instant::now();
        let result = self
            .post_batch(&body)
            .await
            .and_then(|value| parse_inference_labels(&value, texts.len()));

        telemetry::record_request(SERVICE, result.is_ok(), started.elapsed().as_secs_f64());
        result
    }

    async fn post_batch(&self, body: &Value) -> Result<Value, ClassifierError> {
        let resp = self
            .inner
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(NetworkError::from)?;

        let status = resp.status();
        let text = resp.text().await.map_err(NetworkError::from)?;
        if !status.is_success() {
            return Err(NetworkError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            }
            .into());
        }

        let value: Value = serde_json::from_str(&text).map_err(NetworkError::from)?;
        Ok(value)
    }
}

impl SentimentClassifier for InferenceClassifier {
    fn backend(&self) -> &str {
        SERVICE
    }

    fn scheme(&self) -> &LabelScheme {
        &self.scheme
    }

    fn classify<'a>(&'a self, texts: &'a [String]) -> ClassifyFuture<'a> {
        Box::pin(async move {
            let mut labels = Vec::with_capacity(texts.len());
            for (idx, batch) in texts.chunks(INFERENCE_BATCH_SIZE).enumerate() {
                tracing::debug!(batch = idx, size = batch.len(), model = %self.endpoint, "Classifying batch");
                labels.extend(self.classify_batch(batch).await?);
            }
            Ok(labels)
        })
    }
}

fn model_endpoint(base_url: &str, model: &str) -> Result<Url, NetworkError> {
    Ok(Url::parse(&format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        model.trim_start_matches('/')
    ))?)
}

/// Extracts one label per input from a text-classification response.
///
/// Each element is either a list of `{label, score}` candidates (the top score
/// wins) or a single `{label, score}` object.
pub fn parse_inference_labels(value: &Value, expected: usize) -> Result<Vec<String>, ClassifierError> {
    let items = value
        .as_array()
        .ok_or_else(|| ClassifierError::Decode(format!("expected an array, got {}", value)))?;

    // * A single input may come back unwrapped as a flat candidate list
    let items: Vec<&Value> = if expected == 1 && items.first().is_some_and(Value::is_object) {
        vec![value]
    } else {
        items.iter().collect()
    };

    let labels = items
        .into_iter()
        .map(top_label)
        .collect::<Result<Vec<_>, _>>()?;

    if labels.len() != expected {
        return Err(ClassifierError::LengthMismatch {
            expected,
            got: labels.len(),
        });
    }

    Ok(labels)
}

fn top_label(item: &Value) -> Result<String, ClassifierError> {
    let best = match item {
        Value::Array(candidates) => candidates
            .iter()
            .max_by(|a, b| score(a).total_cmp(&score(b)))
            .ok_or_else(|| ClassifierError::Decode("empty candidate list".to_string()))?,
        Value::Object(_) => item,
        other => return Err(ClassifierError::Decode(format!("unexpected item {}", other))),
    };

    best.get("label")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClassifierError::Decode(format!("candidate without label: {}", best)))
}

fn score(candidate: &Value) -> f64 {
    candidate
        .get("score")
        .and_then(Value::as_f64)
        .unwrap_or(f64::NEG_INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_candidates_pick_top_score() {
        let value = json!([
            [{ "label": "positive", "score": 0.9 }, { "label": "neutral", "score": 0.08 }],
            [{ "label": "neutral", "score": 0.2 }, { "label": "negative", "score": 0.7 }]
        ]);
        assert_eq!(
            parse_inference_labels(&value, 2).unwrap(),
            vec!["positive", "negative"]
        );
    }

    #[test]
    fn test_flat_objects() {
        let value = json!([{ "label": "5 stars", "score": 0.6 }, { "label": "1 star", "score": 0.5 }]);
        assert_eq!(parse_inference_labels(&value, 2).unwrap(), vec!["5 stars", "1 star"]);
    }

    #[test]
    fn test_single_input_flat_candidates() {
        let value = json!([{ "label": "neutral", "score": 0.3 }, { "label": "positive", "score": 0.6 }]);
        assert_eq!(parse_inference_labels(&value, 1).unwrap(), vec!["positive"]);
    }

    #[test]
    fn test_length_mismatch() {
        let value = json!([[{ "label": "positive", "score": 0.9 }]]);
        let err = parse_inference_labels(&value, 3).unwrap_err();
        assert!(matches!(err, ClassifierError::LengthMismatch { expected: 3, got: 1 }));
    }

    #[test]
    fn test_error_payload_is_decode_error() {
        let value = json!({ "error": "Model is loading" });
        assert!(matches!(parse_inference_labels(&value, 1), Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn test_model_endpoint() {
        let url = model_endpoint(
            "https://api-inference.huggingface.co/models/",
            "cardiffnlp/twitter-roberta-base-sentiment-latest",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest"
        );
    }

    #[test]
    fn test_requires_token() {
        let result = InferenceClassifier::new(
            &InferenceSettings::default(),
            "some/model",
            LabelScheme::polarity(),
        );
        assert!(matches!(result, Err(NetworkError::Config(_))));
    }
}
