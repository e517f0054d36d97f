// * Rating Aggregator
// * Buckets normalized ratings for charting at the selected display precision.
// *
// * Binned precisions (/5, /10) scale each rating, round half to even, and count
// * into buckets 1..=denominator. Every bucket is present, zero counts included.
// * Values that round to 0 fall outside the bucket range and are not counted.
// * Continuous precision counts distinct observed values, sorted ascending.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingPrecision {
    #[default]
    Continuous,
    OutOfFive,
    OutOfTen,
}

impl RatingPrecision {
    /// Bucket count for binned precisions
    pub fn denominator(self) -> Option<u32> {
        match self {
            RatingPrecision::Continuous => None,
            RatingPrecision::OutOfFive => Some(5),
            RatingPrecision::OutOfTen => Some(10),
        }
    }

    /// Factor applied to a 0-1 value to express it on this precision's scale
    pub fn multiplier(self) -> f64 {
        self.denominator().map_or(1.0, f64::from)
    }
}

impl FromStr for RatingPrecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" | "0" => Ok(RatingPrecision::Continuous),
            "5" | "out-of-5" => Ok(RatingPrecision::OutOfFive),
            "10" | "out-of-10" => Ok(RatingPrecision::OutOfTen),
            other => Err(format!(
                "unknown rating precision '{}', expected continuous, 5 or 10",
                other
            )),
        }
    }
}

impl fmt::Display for RatingPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingPrecision::Continuous => write!(f, "Continuous (0 to 1)"),
            RatingPrecision::OutOfFive => write!(f, "Out of 5"),
            RatingPrecision::OutOfTen => write!(f, "Out of 10"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub bucket: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatingHistogram {
    Binned { denominator: u32, buckets: Vec<Bucket> },
    Continuous { points: Vec<Point> },
}

impl RatingHistogram {
    /// Total number of ratings represented in the chart
    pub fn counted(&self) -> usize {
        match self {
            RatingHistogram::Binned { buckets, .. } => buckets.iter().map(|b| b.count).sum(),
            RatingHistogram::Continuous { points } => points.iter().map(|p| p.count).sum(),
        }
    }
}

/// Histogram plus the mean rating expressed on the same scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub precision: RatingPrecision,
    pub histogram: RatingHistogram,
    pub mean: Option<f64>,
    pub scale: f64,
}

/// Builds the histogram for the requested precision
pub fn rating_histogram(ratings: &[f64], precision: RatingPrecision) -> RatingHistogram {
    match precision.denominator() {
        Some(denominator) => binned(ratings, denominator),
        None => continuous(ratings),
    }
}

fn binned(ratings: &[f64], denominator: u32) -> RatingHistogram {
    let mut buckets: Vec<Bucket> = (1..=denominator)
        .map(|bucket| Bucket { bucket, count: 0 })
        .collect();

    for rating in ratings {
        let scaled = (rating * f64::from(denominator)).round_ties_even();
        if scaled >= 1.0 && scaled <= f64::from(denominator) {
            buckets[scaled as usize - 1].count += 1;
        }
    }

    RatingHistogram::Binned {
        denominator,
        buckets,
    }
}

fn continuous(ratings: &[f64]) -> RatingHistogram {
    let mut sorted: Vec<f64> = ratings.iter().copied().filter(|r| r.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let mut points: Vec<Point> = Vec::new();
    for value in sorted {
        match points.last_mut() {
            Some(last) if last.value == value => last.count += 1,
            _ => points.push(Point { value, count: 1 }),
        }
    }

    RatingHistogram::Continuous { points }
}

/// Arithmetic mean scaled by the precision's multiplier; `None` for no ratings
pub fn mean_on_scale(ratings: &[f64], precision: RatingPrecision) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some(mean * precision.multiplier())
}

pub fn summarize_ratings(ratings: &[f64], precision: RatingPrecision) -> RatingSummary {
    RatingSummary {
        precision,
        histogram: rating_histogram(ratings, precision),
        mean: mean_on_scale(ratings, precision),
        scale: precision.multiplier(),
    }
}
