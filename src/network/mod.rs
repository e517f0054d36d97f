// * Network layer: scraping service, saved datasets, hosted inference

pub mod client;
pub mod dataset;
pub mod errors;
pub mod inference;
pub mod source;

pub use client::{ApifyClient, UsageReport};
pub use dataset::{load_pages, DatasetFile};
pub use errors::NetworkError;
pub use inference::InferenceClassifier;
pub use source::{ReviewSource, SourceFuture};
