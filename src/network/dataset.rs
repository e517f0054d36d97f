// * Saved dataset source
// * Replays a dataset previously exported from the scraper, for offline runs
// * and demos without spending search quota.

use crate::network::client::parse_dataset;
use crate::network::errors::NetworkError;
use crate::network::source::{ReviewSource, SourceFuture};
use crate::refinery::extractor::RawResultPage;
use std::path::{Path, PathBuf};

/// Reads every page from a saved dataset file (a JSON array of pages)
pub async fn load_pages(path: impl AsRef<Path>) -> Result<Vec<RawResultPage>, NetworkError> {
    let body = tokio::fs::read_to_string(path.as_ref()).await?;
    parse_dataset(&body)
}

pub struct DatasetFile {
    path: PathBuf,
}

impl DatasetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSource for DatasetFile {
    fn name(&self) -> &str {
        "dataset"
    }

    // * The query and result count do not filter a saved dataset; every page is returned.
    fn fetch_pages<'a>(&'a self, query: &'a str, _num_results: u32) -> SourceFuture<'a> {
        Box::pin(async move {
            tracing::info!(path = %self.path.display(), query = %query, "Loading saved dataset");
            load_pages(&self.path).await
        })
    }
}
