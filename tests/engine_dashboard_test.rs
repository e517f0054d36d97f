use review_lens::engine::{
    Dashboard, DashboardOptions, LabelScheme, LexiconClassifier, RatingHistogram, RatingPrecision,
    SentimentClassifier,
};
use review_lens::network::DatasetFile;
use serde_json::json;
use std::io::Write;

fn saved_dataset() -> tempfile::NamedTempFile {
    let pages = json!([
        { "organicResults": [
            { "productInfo": { "rating": 9 }, "description": "Nov 12, 2023Great console and fast downloads" },
            { "productInfo": { "rating": "3" }, "description": "Nov 5, 2023Controller broke, awful support" },
            { "description": "Bought it for my nephew last week" }
        ]},
        { "organicResults": "not a list" }
    ]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", pages).unwrap();
    file
}

fn classifiers() -> Vec<Box<dyn SentimentClassifier>> {
    vec![
        Box::new(LexiconClassifier::new(LabelScheme::stars())),
        Box::new(LexiconClassifier::new(LabelScheme::polarity())),
    ]
}

#[tokio::test]
async fn test_dashboard_from_saved_dataset() {
    let file = saved_dataset();
    let dashboard = Dashboard::new(Box::new(DatasetFile::new(file.path())), classifiers());
    let options = DashboardOptions {
        precision: RatingPrecision::OutOfTen,
        ..Default::default()
    };

    let report = dashboard.run("PS5 Console", &options).await.unwrap();

    assert_eq!(report.query, "PS5 Console");
    assert_eq!(report.review_count, 3);
    assert_eq!(report.rating_count, 2);
    assert_eq!(report.extraction.malformed_pages, 1);

    let ratings = report.ratings.expect("ratings present");
    match &ratings.histogram {
        RatingHistogram::Binned { buckets, .. } => {
            assert_eq!(buckets.len(), 10);
            assert_eq!(buckets[8].count, 1);
            assert_eq!(buckets[5].count, 1);
        }
        other => panic!("expected binned histogram, got {:?}", other),
    }

    let polarity = report
        .sentiment
        .iter()
        .find(|s| s.scheme == "polarity")
        .expect("polarity summary");
    assert_eq!(polarity.counts.total, 3);
    assert_eq!(polarity.weighted_mean, Some(0.5));

    let words = report.word_buckets.expect("word buckets present");
    assert!(words.positive.iter().any(|t| t.term == "great"));
    assert!(words.negative.iter().any(|t| t.term == "awful"));
}

#[tokio::test]
async fn test_missing_dataset_is_a_source_error() {
    let dashboard = Dashboard::new(
        Box::new(DatasetFile::new("/nonexistent/review-lens/dataset.json")),
        classifiers(),
    );
    let result = dashboard.run("anything", &DashboardOptions::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_report_json_shape() {
    let file = saved_dataset();
    let dashboard = Dashboard::new(Box::new(DatasetFile::new(file.path())), classifiers());
    let report = dashboard.run("q", &DashboardOptions::default()).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ratings"]["histogram"]["kind"], "continuous");
    assert_eq!(json["sentiment"].as_array().unwrap().len(), 2);
    assert!(json["word_buckets"]["neutral"].is_array());
}
