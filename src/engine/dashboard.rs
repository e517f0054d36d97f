// * Dashboard orchestrator
// * One query: fetch pages -> extract -> aggregate ratings -> classify -> word buckets.
// * Every run builds fresh values; nothing is shared between queries.

use crate::engine::classifier::{ClassifierError, SentimentClassifier};
use crate::engine::histogram::{summarize_ratings, RatingPrecision, RatingSummary};
use crate::engine::sentiment::{summarize, SentimentSummary};
use crate::network::errors::NetworkError;
use crate::network::source::ReviewSource;
use crate::ops::telemetry;
use crate::refinery::extractor::{extract_reviews, ExtractedReviews, ExtractionStats, RawResultPage};
use crate::refinery::wordcloud::{WordBuckets, WordCloudBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to fetch reviews from {source_name}: {error}")]
    Source {
        source_name: String,
        #[source]
        error: NetworkError,
    },

    #[error("Classifier {backend} failed for scheme {scheme}: {error}")]
    Classifier {
        backend: String,
        scheme: String,
        #[source]
        error: ClassifierError,
    },
}

/// Everything the charting layer needs for one query
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub query: String,
    pub review_count: usize,
    pub rating_count: usize,
    pub extraction: ExtractionStats,
    /// Absent when no record carried a usable rating
    pub ratings: Option<RatingSummary>,
    /// Empty when no description survived cleaning
    pub sentiment: Vec<SentimentSummary>,
    /// Absent when no description survived cleaning
    pub word_buckets: Option<WordBuckets>,
}

/// Options for one dashboard run
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub num_results: u32,
    pub precision: RatingPrecision,
    pub max_words: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            num_results: crate::config::constants::MIN_QUERIES,
            precision: RatingPrecision::Continuous,
            max_words: crate::config::constants::WORDCLOUD_MAX_WORDS,
        }
    }
}

pub struct Dashboard {
    source: Box<dyn ReviewSource>,
    classifiers: Vec<Box<dyn SentimentClassifier>>,
}

impl Dashboard {
    pub fn new(source: Box<dyn ReviewSource>, classifiers: Vec<Box<dyn SentimentClassifier>>) -> Self {
        Self { source, classifiers }
    }

    /// Runs the full pipeline for one query
    pub async fn run(
        &self,
        query: &str,
        options: &DashboardOptions,
    ) -> Result<DashboardReport, DashboardError> {
        info!(query = %query, source = self.source.name(), "Searching for reviews");

        let pages = self
            .source
            .fetch_pages(query, options.num_results)
            .await
            .map_err(|error| DashboardError::Source {
                source_name: self.source.name().to_string(),
                error,
            })?;

        self.report_from_pages(query, &pages, options).await
    }

    /// Runs extraction, aggregation and classification over already fetched pages
    pub async fn report_from_pages(
        &self,
        query: &str,
        pages: &[RawResultPage],
        options: &DashboardOptions,
    ) -> Result<DashboardReport, DashboardError> {
        let reviews = extract_reviews(pages);
        telemetry::record_extraction(&reviews.stats, reviews.descriptions.len(), reviews.ratings.len());
        info!(
            reviews = reviews.descriptions.len(),
            ratings = reviews.ratings.len(),
            "Found reviews"
        );

        let sentiment = self.classify_all(&reviews).await?;
        Ok(build_report(query, reviews, sentiment, options))
    }

    async fn classify_all(
        &self,
        reviews: &ExtractedReviews,
    ) -> Result<Vec<SentimentSummary>, DashboardError> {
        if reviews.descriptions.is_empty() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::with_capacity(self.classifiers.len());
        for classifier in &self.classifiers {
            let scheme = classifier.scheme();
            let result = classifier
                .classify(&reviews.descriptions)
                .await
                .and_then(|labels| {
                    if labels.len() == reviews.descriptions.len() {
                        Ok(labels)
                    } else {
                        Err(ClassifierError::LengthMismatch {
                            expected: reviews.descriptions.len(),
                            got: labels.len(),
                        })
                    }
                });

            telemetry::record_classification(classifier.backend(), result.is_ok());

            let labels = result.map_err(|error| {
                warn!(backend = classifier.backend(), scheme = %scheme.name, error = %error, "Classification failed");
                DashboardError::Classifier {
                    backend: classifier.backend().to_string(),
                    scheme: scheme.name.clone(),
                    error,
                }
            })?;

            let summary = summarize(&labels, scheme);
            if let Some(mean) = summary.weighted_mean {
                telemetry::set_sentiment_mean(&scheme.name, mean);
                info!(scheme = %scheme.name, mean, "Sentiment aggregated");
            }
            summaries.push(summary);
        }

        Ok(summaries)
    }
}

/// Assembles the report from extracted reviews and sentiment summaries
pub fn build_report(
    query: &str,
    reviews: ExtractedReviews,
    sentiment: Vec<SentimentSummary>,
    options: &DashboardOptions,
) -> DashboardReport {
    let rating_values = reviews.rating_values();
    let ratings = (!rating_values.is_empty())
        .then(|| summarize_ratings(&rating_values, options.precision));

    let word_buckets = (!reviews.descriptions.is_empty())
        .then(|| WordCloudBuilder::with_max_words(options.max_words).build(&reviews.descriptions));

    DashboardReport {
        query: query.to_string(),
        review_count: reviews.descriptions.len(),
        rating_count: reviews.ratings.len(),
        extraction: reviews.stats,
        ratings,
        sentiment,
        word_buckets,
    }
}
