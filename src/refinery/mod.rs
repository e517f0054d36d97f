// * The Refinery: turns raw search-result pages into cleaned reviews and word buckets.

pub mod description;
pub mod extractor;
pub mod wordcloud;

// * Re-exports for convenient access
pub use description::{clean_description, remove_nbsp, strip_date_prefix};
pub use extractor::{extract_reviews, ExtractedReviews, ExtractionStats, RawResultPage, RawResultRecord};
pub use wordcloud::{TermFrequency, WordBuckets, WordCloudBuilder};
