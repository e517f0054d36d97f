// * Sentiment Classifier Collaborator
// * One label per input text, order preserved. Hosted models implement this in
// * network::inference; the lexicon classifier below is the offline fallback.

use crate::engine::sentiment::LabelScheme;
use crate::network::errors::NetworkError;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

// * Lexicons shared with the word cloud builder
pub const POSITIVE_TERMS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "positive", "happy",
    "love", "best", "awesome", "beautiful", "perfect", "recommend", "smooth", "fast", "worth",
    "solid", "impressive", "reliable", "nice", "easy", "quiet", "incredible",
];

pub const NEGATIVE_TERMS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "negative", "sad", "hate", "worst", "ugly", "poor",
    "disappointing", "disappointed", "failed", "broken", "slow", "loud", "expensive", "overpriced",
    "problem", "issue", "noisy", "refund", "defective", "waste",
];

static POSITIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", POSITIVE_TERMS.join("|")))
        .expect("! CRITICAL: Failed to compile positive lexicon regex")
});

static NEGATIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", NEGATIVE_TERMS.join("|")))
        .expect("! CRITICAL: Failed to compile negative lexicon regex")
});

// * Score band treated as neutral by the polarity mapping
const NEUTRAL_BAND: f32 = 0.2;

/// Errors that can occur while classifying
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Inference request failed: {0}")]
    Network(#[from] NetworkError),

    #[error("Unexpected classifier response: {0}")]
    Decode(String),

    #[error("Classifier returned {got} labels for {expected} inputs")]
    LengthMismatch { expected: usize, got: usize },
}

/// Boxed future returned by classifiers
pub type ClassifyFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>, ClassifierError>> + Send + 'a>>;

/// A classifier bound to one label scheme
pub trait SentimentClassifier: Send + Sync {
    /// Short backend name used in logs and metrics
    fn backend(&self) -> &str;

    /// The label scheme this classifier emits
    fn scheme(&self) -> &LabelScheme;

    /// Classifies every text; the result has exactly one label per input
    fn classify<'a>(&'a self, texts: &'a [String]) -> ClassifyFuture<'a>;
}

/// Lexicon polarity score in [-1, 1]; 0 when no lexicon term is present
pub fn lexicon_score(text: &str) -> f32 {
    let positive = POSITIVE_REGEX.find_iter(text).count() as f32;
    let negative = NEGATIVE_REGEX.find_iter(text).count() as f32;

    let total = positive + negative;
    if total == 0.0 {
        return 0.0;
    }

    ((positive - negative) / total).clamp(-1.0, 1.0)
}

/// Polarity of a single term: 1 positive, -1 negative, 0 neutral
pub fn term_polarity(term: &str) -> i8 {
    let lower = term.to_lowercase();
    if POSITIVE_TERMS.contains(&lower.as_str()) {
        1
    } else if NEGATIVE_TERMS.contains(&lower.as_str()) {
        -1
    } else {
        0
    }
}

/// Offline classifier mapping the lexicon score onto the scheme's labels.
///
/// Emits lower-case labels the way hosted models do; the aggregator
/// capitalizes them. For schemes other than the built-in ones the score is
/// spread evenly over the scheme's labels.
pub struct LexiconClassifier {
    scheme: LabelScheme,
    // * Set when the scheme carries the polarity labels, whatever its name
    polarity_labels: bool,
}

impl LexiconClassifier {
    pub fn new(scheme: LabelScheme) -> Self {
        let polarity_labels = scheme.labels == LabelScheme::polarity().labels;
        Self {
            scheme,
            polarity_labels,
        }
    }

    /// Labels one text
    pub fn label_for(&self, text: &str) -> String {
        let score = lexicon_score(text);

        if self.polarity_labels {
            let label = if score > NEUTRAL_BAND {
                "positive"
            } else if score < -NEUTRAL_BAND {
                "negative"
            } else {
                "neutral"
            };
            return label.to_string();
        }

        // * Spread [-1, 1] evenly across the ordered labels
        let slots = self.scheme.labels.len();
        if slots == 0 {
            return String::new();
        }
        let position = ((score + 1.0) / 2.0 * (slots - 1) as f32).round() as usize;
        self.scheme.labels[position.min(slots - 1)].to_lowercase()
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn backend(&self) -> &str {
        "lexicon"
    }

    fn scheme(&self) -> &LabelScheme {
        &self.scheme
    }

    fn classify<'a>(&'a self, texts: &'a [String]) -> ClassifyFuture<'a> {
        let labels: Vec<String> = texts.iter().map(|t| self.label_for(t)).collect();
        Box::pin(async move { Ok(labels) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_score_range() {
        assert_eq!(lexicon_score("Great console, love it"), 1.0);
        assert_eq!(lexicon_score("Terrible and loud"), -1.0);
        assert_eq!(lexicon_score("It arrived on Tuesday"), 0.0);
        assert_eq!(lexicon_score("Great picture but loud fan"), 0.0);
    }

    #[test]
    fn test_word_boundaries() {
        // * "goodbye" must not count as "good"
        assert_eq!(lexicon_score("goodbye"), 0.0);
    }

    #[test]
    fn test_polarity_labels() {
        let classifier = LexiconClassifier::new(LabelScheme::polarity());
        assert_eq!(classifier.label_for("Excellent value"), "positive");
        assert_eq!(classifier.label_for("Broken on arrival"), "negative");
        assert_eq!(classifier.label_for("Ships in a box"), "neutral");
    }

    #[test]
    fn test_star_labels() {
        let classifier = LexiconClassifier::new(LabelScheme::stars());
        assert_eq!(classifier.label_for("Excellent value"), "5 stars");
        assert_eq!(classifier.label_for("Broken on arrival"), "1 star");
        assert_eq!(classifier.label_for("Ships in a box"), "3 stars");
    }

    #[test]
    fn test_mapping_follows_labels_not_name() {
        let scheme = LabelScheme::new(
            "polarity",
            "Custom",
            vec!["Low".to_string(), "Mid".to_string(), "High".to_string()],
            vec![0.0, 1.0, 2.0],
        )
        .unwrap();
        let classifier = LexiconClassifier::new(scheme);
        assert_eq!(classifier.label_for("Excellent value"), "high");
        assert_eq!(classifier.label_for("Broken on arrival"), "low");

        let renamed = LabelScheme {
            name: "tone".to_string(),
            ..LabelScheme::polarity()
        };
        // * Scores -0.5: the polarity band says negative, an even spread would say neutral
        assert_eq!(
            LexiconClassifier::new(renamed).label_for("Great screen but loud, slow and broken"),
            "negative"
        );
    }

    #[test]
    fn test_term_polarity() {
        assert_eq!(term_polarity("Great"), 1);
        assert_eq!(term_polarity("awful"), -1);
        assert_eq!(term_polarity("console"), 0);
    }

    #[tokio::test]
    async fn test_classify_preserves_order_and_length() {
        let classifier = LexiconClassifier::new(LabelScheme::polarity());
        let texts = vec![
            "Awful battery".to_string(),
            "Great screen".to_string(),
            "Plain box".to_string(),
        ];
        let labels = classifier.classify(&texts).await.unwrap();
        assert_eq!(labels, vec!["negative", "positive", "neutral"]);
    }
}
