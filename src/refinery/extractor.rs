// * Review Batch Extractor
// * Walks scraped result pages and projects every record onto two independent
// * outputs: cleaned descriptions and normalized ratings.
// *
// * The input comes from an uncontrolled external API, so every shape check is
// * per page / per record. A malformed record never aborts the batch.

use crate::config::constants::MIN_DESCRIPTION_CHARS;
use crate::engine::normalization::{normalize_value, NormalizedRating};
use crate::refinery::description::{remove_nbsp, strip_date_prefix};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One dataset item returned by the scraper: `{ "organicResults": [ ... ] }`.
///
/// Kept untyped on purpose; strict deserialization would reject the whole
/// page on a single odd record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResultPage(pub Value);

impl RawResultPage {
    /// Returns the page's records, or `None` if `organicResults` is missing or not an array
    pub fn records(&self) -> Option<impl Iterator<Item = RawResultRecord<'_>>> {
        self.0
            .get("organicResults")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(RawResultRecord))
    }
}

impl From<Value> for RawResultPage {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Borrowed view over one organic search result
#[derive(Debug, Clone, Copy)]
pub struct RawResultRecord<'a>(pub &'a Value);

impl<'a> RawResultRecord<'a> {
    /// `productInfo.rating`, if present (any JSON type)
    pub fn rating(&self) -> Option<&'a Value> {
        self.0.get("productInfo")?.get("rating")
    }

    /// `description`, if present and a string
    pub fn description(&self) -> Option<&'a str> {
        self.0.get("description")?.as_str()
    }
}

/// Output of the extractor. `descriptions` and `ratings` are not index-aligned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedReviews {
    pub descriptions: Vec<String>,
    pub ratings: Vec<NormalizedRating>,
    pub stats: ExtractionStats,
}

impl ExtractedReviews {
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty() && self.ratings.is_empty()
    }

    /// Ratings as plain floats, for aggregation
    pub fn rating_values(&self) -> Vec<f64> {
        self.ratings.iter().map(|r| r.value()).collect()
    }
}

/// Counters collected while walking a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionStats {
    pub pages: usize,
    pub malformed_pages: usize,
    pub records: usize,
    pub ratings_skipped: usize,
    pub descriptions_skipped: usize,
}

/// Extracts descriptions and ratings from a batch of scraped pages
pub fn extract_reviews(pages: &[RawResultPage]) -> ExtractedReviews {
    let mut out = ExtractedReviews::default();

    for (page_idx, page) in pages.iter().enumerate() {
        out.stats.pages += 1;

        let Some(records) = page.records() else {
            warn!(page = page_idx, "Page has no organicResults array, skipping");
            out.stats.malformed_pages += 1;
            continue;
        };

        for record in records {
            out.stats.records += 1;

            // * Rating and description are independent projections of the same record
            match record.rating() {
                Some(raw) => match normalize_value(raw) {
                    Ok(rating) => out.ratings.push(rating),
                    Err(e) => {
                        debug!(page = page_idx, error = %e, "Skipping rating");
                        out.stats.ratings_skipped += 1;
                    }
                },
                None => out.stats.ratings_skipped += 1,
            }

            match record.description().map(remove_nbsp) {
                Some(text) if text.chars().count() > MIN_DESCRIPTION_CHARS => {
                    out.descriptions.push(strip_date_prefix(&text).to_string());
                }
                _ => out.stats.descriptions_skipped += 1,
            }
        }
    }

    debug!(
        pages = out.stats.pages,
        records = out.stats.records,
        descriptions = out.descriptions.len(),
        ratings = out.ratings.len(),
        "Batch extracted"
    );

    out
}
