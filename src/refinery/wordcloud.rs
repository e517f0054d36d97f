// * Word Cloud Builder
// * Splits cleaned descriptions into positive / negative / neutral term buckets
// * with frequencies. Rendering is left to the consumer.

use crate::config::constants::WORDCLOUD_MAX_WORDS;
use crate::engine::classifier::term_polarity;
use serde::Serialize;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

// * English stop words (the NLTK list) dropped before counting
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "couldn", "couldn't", "d", "did", "didn", "didn't",
    "do", "does", "doesn", "doesn't", "doing", "don", "don't", "down", "during", "each", "few",
    "for", "from", "further", "had", "hadn", "hadn't", "has", "hasn", "hasn't", "have", "haven",
    "haven't", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "i", "if", "in", "into", "is", "isn", "isn't", "it", "it's", "its", "itself", "just", "ll",
    "m", "ma", "me", "mightn", "mightn't", "more", "most", "mustn", "mustn't", "my", "myself",
    "needn", "needn't", "no", "nor", "not", "now", "o", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "ourselves", "out", "over", "own", "re", "s", "same", "shan", "shan't",
    "she", "she's", "should", "should've", "shouldn", "shouldn't", "so", "some", "such", "t",
    "than", "that", "that'll", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve", "very",
    "was", "wasn", "wasn't", "we", "were", "weren", "weren't", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "won", "won't", "wouldn", "wouldn't", "y",
    "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

// * Single-character tokens never reach the cloud
const MIN_TERM_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Most frequent terms per polarity bucket, highest count first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordBuckets {
    pub positive: Vec<TermFrequency>,
    pub negative: Vec<TermFrequency>,
    pub neutral: Vec<TermFrequency>,
}

impl WordBuckets {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty() && self.neutral.is_empty()
    }
}

/// Builds word buckets from cleaned descriptions
pub struct WordCloudBuilder {
    max_words: usize,
}

impl WordCloudBuilder {
    pub fn new() -> Self {
        Self::with_max_words(WORDCLOUD_MAX_WORDS)
    }

    pub fn with_max_words(max_words: usize) -> Self {
        Self { max_words }
    }

    pub fn build<S: AsRef<str>>(&self, descriptions: &[S]) -> WordBuckets {
        let mut positive: HashMap<String, usize> = HashMap::new();
        let mut negative: HashMap<String, usize> = HashMap::new();
        let mut neutral: HashMap<String, usize> = HashMap::new();

        for description in descriptions {
            for word in description.as_ref().unicode_words() {
                let term = word.to_lowercase();
                if term.chars().count() < MIN_TERM_CHARS
                    || is_stop_word(&term)
                    || term.chars().all(|c| c.is_numeric())
                {
                    continue;
                }

                let bucket = match term_polarity(&term) {
                    1 => &mut positive,
                    -1 => &mut negative,
                    _ => &mut neutral,
                };
                *bucket.entry(term).or_insert(0) += 1;
            }
        }

        WordBuckets {
            positive: self.top_terms(positive),
            negative: self.top_terms(negative),
            neutral: self.top_terms(neutral),
        }
    }

    fn top_terms(&self, counts: HashMap<String, usize>) -> Vec<TermFrequency> {
        let mut terms: Vec<TermFrequency> = counts
            .into_iter()
            .map(|(term, count)| TermFrequency { term, count })
            .collect();

        // * Ties broken alphabetically so output is deterministic
        terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        terms.truncate(self.max_words);
        terms
    }
}

impl Default for WordCloudBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_stop_word(term: &str) -> bool {
    // * unicode_words keeps typographic apostrophes, normalize before lookup
    let normalized = term.replace('\u{2019}', "'");
    STOP_WORDS.contains(&normalized.as_str())
}
