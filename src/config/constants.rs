// * Configuration Constants
// * Central location for all fixed thresholds, limits and endpoints

// * Descriptions at or below this many characters are dropped by the extractor
pub const MIN_DESCRIPTION_CHARS: usize = 14;

// * HTTP request timeout in seconds (actor runs block until the dataset is ready)
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

// * Search results requested per result page
pub const RESULTS_PER_PAGE: u32 = 100;

// * Bounds and step for the number of search results per query
pub const MIN_QUERIES: u32 = 100;
pub const MAX_QUERIES: u32 = 1000;
pub const QUERY_STEP: u32 = 100;

// * Monthly SERP quota of the scraping plan
pub const MONTHLY_QUERY_LIMIT: u64 = 50_000;

// * Usage API reports SERP quantity in units of 100 queries
pub const SERP_UNIT: f64 = 100.0;

// * Maximum terms kept per word cloud bucket
pub const WORDCLOUD_MAX_WORDS: usize = 20;

// * Scraping service
pub const APIFY_BASE_URL: &str = "https://api.apify.com";
pub const GOOGLE_SEARCH_ACTOR: &str = "apify~google-search-scraper";

// * Hosted sentiment models
pub const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";
pub const MODEL_NAME_STARS: &str = "LiYuan/amazon-review-sentiment-analysis";
pub const MODEL_NAME_POLARITY: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

// * Texts sent per hosted inference request
pub const INFERENCE_BATCH_SIZE: usize = 32;

// * Error response bodies are truncated to this many characters
pub const MAX_ERROR_BODY_CHARS: usize = 500;
