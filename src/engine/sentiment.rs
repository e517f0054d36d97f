// * Sentiment Aggregator
// * Counts classifier labels against a fixed ordered label scheme and computes
// * the weighted mean score.
// *
// * Denominator is always the number of classified items, including items whose
// * label is not part of the scheme. Unobserved labels are present with count 0.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemeError {
    #[error("Label scheme has {labels} labels but {weights} weights")]
    LengthMismatch { labels: usize, weights: usize },

    #[error("Label scheme must contain at least one label")]
    Empty,
}

/// Ordered labels with a parallel list of numeric weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScheme {
    pub name: String,
    pub title: String,
    pub labels: Vec<String>,
    pub weights: Vec<f64>,
}

impl LabelScheme {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        labels: Vec<String>,
        weights: Vec<f64>,
    ) -> Result<Self, SchemeError> {
        if labels.is_empty() {
            return Err(SchemeError::Empty);
        }
        if labels.len() != weights.len() {
            return Err(SchemeError::LengthMismatch {
                labels: labels.len(),
                weights: weights.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            title: title.into(),
            labels,
            weights,
        })
    }

    /// Star rating scheme: "1 star" .. "5 stars" weighted 1..5
    pub fn stars() -> Self {
        Self {
            name: "stars".to_string(),
            title: "Rating from 1 - 5 stars".to_string(),
            labels: vec![
                "1 star".to_string(),
                "2 stars".to_string(),
                "3 stars".to_string(),
                "4 stars".to_string(),
                "5 stars".to_string(),
            ],
            weights: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        }
    }

    /// Polarity scheme: Negative / Neutral / Positive weighted 0 / 0.5 / 1
    pub fn polarity() -> Self {
        Self {
            name: "polarity".to_string(),
            title: "Negative / Neutral / Positive".to_string(),
            labels: vec![
                "Negative".to_string(),
                "Neutral".to_string(),
                "Positive".to_string(),
            ],
            weights: vec![0.0, 0.5, 1.0],
        }
    }

    /// Highest weight in the scheme, the top of the displayed scale
    pub fn scale_max(&self) -> f64 {
        self.weights.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Per-label counts in scheme order, plus the total number of classified items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCounts {
    pub entries: Vec<LabelCount>,
    pub total: usize,
}

impl LabelCounts {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    /// Items whose label matched none of the scheme's labels
    pub fn unrecognized(&self) -> usize {
        self.total
            .saturating_sub(self.entries.iter().map(|e| e.count).sum::<usize>())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub scheme: String,
    pub title: String,
    pub counts: LabelCounts,
    /// `None` when nothing was classified
    pub weighted_mean: Option<f64>,
    pub scale_max: f64,
}

/// Upper-cases the first character and lower-cases the rest ("negative" -> "Negative")
pub fn capitalize_label(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Counts labels against the scheme; every scheme label is present in the result
pub fn count_labels<S: AsRef<str>>(labels: &[S], scheme: &LabelScheme) -> LabelCounts {
    let mut entries: Vec<LabelCount> = scheme
        .labels
        .iter()
        .map(|label| LabelCount {
            label: label.clone(),
            count: 0,
        })
        .collect();

    for raw in labels {
        let label = capitalize_label(raw.as_ref());
        if let Some(entry) = entries.iter_mut().find(|e| e.label == label) {
            entry.count += 1;
        }
    }

    LabelCounts {
        entries,
        total: labels.len(),
    }
}

/// Σ weight × count / total.
///
/// Returns `None` for zero classified items, or when `counts` was not built
/// against `scheme` (labels differ in content or order).
pub fn weighted_mean(counts: &LabelCounts, scheme: &LabelScheme) -> Option<f64> {
    if counts.total == 0 {
        return None;
    }

    let same_labels = counts.entries.len() == scheme.labels.len()
        && counts
            .entries
            .iter()
            .zip(&scheme.labels)
            .all(|(entry, label)| entry.label == *label);
    if !same_labels {
        return None;
    }

    let weighted: f64 = counts
        .entries
        .iter()
        .zip(&scheme.weights)
        .map(|(entry, weight)| weight * entry.count as f64)
        .sum();

    Some(weighted / counts.total as f64)
}

/// Counts and weighted mean in one pass over the classifier output
pub fn summarize<S: AsRef<str>>(labels: &[S], scheme: &LabelScheme) -> SentimentSummary {
    let counts = count_labels(labels, scheme);
    let weighted_mean = weighted_mean(&counts, scheme);

    SentimentSummary {
        scheme: scheme.name.clone(),
        title: scheme.title.clone(),
        counts,
        weighted_mean,
        scale_max: scheme.scale_max(),
    }
}
