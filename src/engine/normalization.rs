// * Rating Normalizer
// * Maps heterogeneous provider rating scales onto the canonical 0-1 range.
// *
// * Policy (branch order matters):
// * 1. raw > 10  -> out of 100
// * 2. raw > 5   -> out of 10
// * 3. otherwise -> out of 5
// *
// ! Values already on a 0-1 scale land in branch 3 and get divided by 5 again.
// ! Kept as-is; see test_already_normalized_input_is_divided_by_five.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RatingError {
    #[error("Rating value is not numeric: {0}")]
    NotNumeric(String),

    #[error("Rating {0} cannot be mapped onto the 0-1 range")]
    OutOfRange(f64),
}

// * A rating on the canonical 0-1 scale. Only constructed by `normalize_rating`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NormalizedRating(f64);

impl NormalizedRating {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<NormalizedRating> for f64 {
    fn from(rating: NormalizedRating) -> Self {
        rating.0
    }
}

// * Coerces a loosely typed rating field into a float.
// * Accepts JSON numbers and numeric strings ("4.5", " 8 "); everything else is rejected.
pub fn coerce_rating(raw: &Value) -> Result<f64, RatingError> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| RatingError::NotNumeric(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RatingError::NotNumeric(s.clone())),
        other => Err(RatingError::NotNumeric(other.to_string())),
    }
}

// * Applies the scale policy to an already-coerced value.
// * Non-finite, negative and > 100 inputs are rejected so the result always lies in [0, 1].
pub fn normalize_rating(raw: f64) -> Result<NormalizedRating, RatingError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(RatingError::OutOfRange(raw));
    }

    let scaled = if raw > 10.0 {
        raw / 100.0
    } else if raw > 5.0 {
        raw / 10.0
    } else {
        raw / 5.0
    };

    if scaled > 1.0 {
        return Err(RatingError::OutOfRange(raw));
    }

    Ok(NormalizedRating(scaled))
}

// * Coerce + normalize in one step, the form the batch extractor uses.
pub fn normalize_value(raw: &Value) -> Result<NormalizedRating, RatingError> {
    normalize_rating(coerce_rating(raw)?)
}
