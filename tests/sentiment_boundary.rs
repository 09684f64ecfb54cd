// tests/sentiment_boundary.rs
// Label thresholds are fixed with inclusive upper boundaries.

use chrono::Utc;

use mention_tracker::ingest::types::{Source, SourceRecord};
use mention_tracker::sentiment::{SentimentAnalyzer, SentimentLabel};

#[test]
fn label_boundaries_are_inclusive() {
    let cases = [
        (-0.06, SentimentLabel::Negative),
        (-0.05, SentimentLabel::Negative),
        (0.0, SentimentLabel::Neutral),
        (0.05, SentimentLabel::Neutral),
        (0.06, SentimentLabel::Positive),
    ];
    for (score, expected) in cases {
        assert_eq!(SentimentLabel::from_score(score), expected, "score {score}");
    }
    assert_eq!(SentimentLabel::from_score(-1.0), SentimentLabel::Negative);
    assert_eq!(SentimentLabel::from_score(1.0), SentimentLabel::Positive);
}

#[test]
fn record_label_is_derived_from_its_score() {
    let mut record = SourceRecord {
        timestamp: Utc::now(),
        source: Source::Reddit,
        title: "Acme".to_string(),
        content: String::new(),
        sentiment_score: 0.06,
    };
    assert_eq!(record.sentiment_label(), SentimentLabel::Positive);

    record.sentiment_score = -0.05;
    assert_eq!(record.sentiment_label(), SentimentLabel::Negative);
}

#[test]
fn scorer_output_feeds_labels_deterministically() {
    let analyzer = SentimentAnalyzer::new();
    let score = analyzer.polarity("Acme is great, I love it");
    assert!(score > 0.05);
    assert_eq!(SentimentLabel::from_score(score), SentimentLabel::Positive);

    let score = analyzer.polarity("Acme is terrible and broken");
    assert!(score < -0.05);
    assert_eq!(SentimentLabel::from_score(score), SentimentLabel::Negative);

    assert_eq!(
        SentimentLabel::from_score(analyzer.polarity("Acme announced a thing")),
        SentimentLabel::Neutral
    );
}
