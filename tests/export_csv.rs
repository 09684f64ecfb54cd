// tests/export_csv.rs

use chrono::{DateTime, Utc};

use mention_tracker::aggregate::Granularity;
use mention_tracker::export::{to_csv, CSV_HEADER};
use mention_tracker::ingest::types::{Source, SourceRecord};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid rfc3339 in test")
        .with_timezone(&Utc)
}

#[test]
fn csv_has_expected_header_and_rows() {
    let records = vec![
        SourceRecord {
            timestamp: ts("2025-06-10T10:42:31Z"),
            source: Source::Reddit,
            title: "Acme, Inc announcement".to_string(),
            content: "short body".to_string(),
            sentiment_score: 0.2,
        },
        SourceRecord {
            timestamp: ts("2025-06-10T14:00:05Z"),
            source: Source::HackerNews,
            title: "Acme outage".to_string(),
            content: String::new(),
            sentiment_score: -0.6,
        },
    ];

    let csv = to_csv(&records, Granularity::Day).expect("csv export");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], CSV_HEADER.join(","));

    // Title with a comma is quoted; bucket is the day start.
    assert_eq!(
        lines[1],
        "2025-06-10T10:42:31Z,Reddit,\"Acme, Inc announcement\",short body,0.2,Positive,2025-06-10T00:00:00Z"
    );
    assert_eq!(
        lines[2],
        "2025-06-10T14:00:05Z,Hacker News,Acme outage,,-0.6,Negative,2025-06-10T00:00:00Z"
    );
}

#[test]
fn hourly_bucket_column_follows_granularity() {
    let records = vec![SourceRecord {
        timestamp: ts("2025-06-10T10:42:31Z"),
        source: Source::HackerNews,
        title: "Acme".to_string(),
        content: String::new(),
        sentiment_score: 0.0,
    }];

    let csv = to_csv(&records, Granularity::Hour).expect("csv export");
    assert!(csv.lines().nth(1).expect("row").ends_with("2025-06-10T10:00:00Z"));
}

#[test]
fn empty_record_set_exports_header_only() {
    let csv = to_csv(&[], Granularity::Day).expect("csv export");
    assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
}
