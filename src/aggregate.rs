//! # Mention Aggregator
//! Pure, testable aggregation over an immutable record set. No I/O.
//!
//! Records are grouped by flooring their timestamp to a [`Granularity`]
//! boundary (hour or day start, UTC). A bucket with zero records never
//! appears in any output; empty input yields empty outputs everywhere.

use std::collections::BTreeMap;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingest::types::{Source, SourceRecord};
use crate::sentiment::SentimentLabel;

/// Time-floor unit used to group mentions for trend views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
}

impl Granularity {
    fn seconds(self) -> i64 {
        match self {
            Granularity::Hour => 3_600,
            Granularity::Day => 86_400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Ok(Granularity::Hour),
            "day" | "daily" => Ok(Granularity::Day),
            other => bail!("unknown granularity '{other}' (expected hourly or daily)"),
        }
    }
}

/// Floor a timestamp to the start of its bucket, UTC.
pub fn bucket_of(ts: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    let unit = granularity.seconds();
    let floored = ts.timestamp().div_euclid(unit) * unit;
    DateTime::<Utc>::from_timestamp(floored, 0).unwrap_or(ts)
}

/// Mentions per (bucket, source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub bucket: DateTime<Utc>,
    pub source: Source,
    pub mentions: usize,
}

/// Mentions per bucket across all sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketTotal {
    pub bucket: DateTime<Utc>,
    pub total: usize,
}

/// Mean polarity per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket: DateTime<Utc>,
    pub mean_sentiment: f64,
}

/// Record counts per sentiment label over the whole result set (not bucketed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl SentimentBreakdown {
    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Positive => self.positive,
        }
    }

    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive
    }
}

/// Group records by (bucket, source) and count each group.
/// Output is sorted by bucket ascending, then source name.
pub fn counts_by_source_and_bucket(
    records: &[SourceRecord],
    granularity: Granularity,
) -> Vec<SourceCount> {
    let mut groups: BTreeMap<(DateTime<Utc>, Source), usize> = BTreeMap::new();
    for r in records {
        *groups
            .entry((bucket_of(r.timestamp, granularity), r.source))
            .or_default() += 1;
    }

    let mut out: Vec<SourceCount> = groups
        .into_iter()
        .map(|((bucket, source), mentions)| SourceCount {
            bucket,
            source,
            mentions,
        })
        .collect();
    out.sort_by(|a, b| {
        a.bucket
            .cmp(&b.bucket)
            .then_with(|| a.source.as_str().cmp(b.source.as_str()))
    });
    out
}

/// Group records by bucket only and count.
pub fn totals_by_bucket(records: &[SourceRecord], granularity: Granularity) -> Vec<BucketTotal> {
    let mut groups: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for r in records {
        *groups.entry(bucket_of(r.timestamp, granularity)).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(bucket, total)| BucketTotal { bucket, total })
        .collect()
}

/// Arithmetic mean of `sentiment_score` per bucket.
pub fn mean_sentiment_by_bucket(
    records: &[SourceRecord],
    granularity: Granularity,
) -> Vec<TrendPoint> {
    let mut groups: BTreeMap<DateTime<Utc>, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups
            .entry(bucket_of(r.timestamp, granularity))
            .or_insert((0.0, 0));
        entry.0 += r.sentiment_score;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(bucket, (sum, n))| TrendPoint {
            bucket,
            mean_sentiment: sum / n as f64,
        })
        .collect()
}

/// Count records per sentiment label across the entire set.
pub fn sentiment_distribution(records: &[SourceRecord]) -> SentimentBreakdown {
    let mut out = SentimentBreakdown::default();
    for r in records {
        match r.sentiment_label() {
            SentimentLabel::Negative => out.negative += 1,
            SentimentLabel::Neutral => out.neutral += 1,
            SentimentLabel::Positive => out.positive += 1,
        }
    }
    out
}
