// * Review Source abstraction
// * Anything that can turn a query into raw result pages: the live scraper or a
// * saved dataset file.

use crate::network::errors::NetworkError;
use crate::refinery::extractor::RawResultPage;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by review sources
pub type SourceFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawResultPage>, NetworkError>> + Send + 'a>>;

pub trait ReviewSource: Send + Sync {
    /// Short name used in logs and metrics
    fn name(&self) -> &str;

    /// Fetches raw pages for `query`, asking for roughly `num_results` results
    fn fetch_pages<'a>(&'a self, query: &'a str, num_results: u32) -> SourceFuture<'a>;
}
