// * Engine: rating normalization, aggregation, sentiment and the dashboard orchestrator

pub mod classifier;
pub mod dashboard;
pub mod histogram;
pub mod normalization;
pub mod sentiment;

pub use classifier::{ClassifierError, ClassifyFuture, LexiconClassifier, SentimentClassifier};
pub use dashboard::{Dashboard, DashboardError, DashboardOptions, DashboardReport};
pub use histogram::{summarize_ratings, RatingHistogram, RatingPrecision, RatingSummary};
pub use normalization::{normalize_rating, normalize_value, NormalizedRating, RatingError};
pub use sentiment::{summarize, LabelScheme, SentimentSummary};
