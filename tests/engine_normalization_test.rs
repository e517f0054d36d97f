use review_lens::engine::normalization::{normalize_rating, normalize_value};
use serde_json::json;

// * Test Suite for Rating Normalization

#[test]
fn test_documented_examples() {
    assert!((normalize_rating(8.0).unwrap().value() - 0.8).abs() < 1e-9);
    assert!((normalize_rating(45.0).unwrap().value() - 0.45).abs() < 1e-9);
    assert!((normalize_rating(100.0).unwrap().value() - 1.0).abs() < 1e-9);
}

#[test]
fn test_branch_boundaries() {
    // * 5 stays on the out-of-5 branch, 10 stays on the out-of-10 branch
    assert!((normalize_rating(5.0).unwrap().value() - 1.0).abs() < 1e-9);
    assert!((normalize_rating(5.5).unwrap().value() - 0.55).abs() < 1e-9);
    assert!((normalize_rating(10.0).unwrap().value() - 1.0).abs() < 1e-9);
    assert!((normalize_rating(10.5).unwrap().value() - 0.105).abs() < 1e-9);
}

#[test]
fn test_positive_inputs_stay_in_unit_range() {
    let mut raw = 0.01;
    while raw <= 100.0 {
        let value = normalize_rating(raw).unwrap().value();
        assert!((0.0..=1.0).contains(&value), "raw {} mapped to {}", raw, value);
        raw += 0.37;
    }
}

#[test]
fn test_string_ratings_from_provider() {
    assert!((normalize_value(&json!("4.6")).unwrap().value() - 0.92).abs() < 1e-9);
    assert!(normalize_value(&json!("")).is_err());
    assert!(normalize_value(&json!("four")).is_err());
}
