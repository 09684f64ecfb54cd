// src/ingest/types.rs
use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::Granularity;
use crate::sentiment::SentimentLabel;

/// Where a mention came from. Extensible: new providers add a variant here
/// and an adapter under `ingest::providers`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Source {
    Reddit,
    HackerNews,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Reddit => "Reddit",
            Source::HackerNews => "Hacker News",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of mention evidence, normalized from any provider.
///
/// The sentiment label is derived from `sentiment_score` on demand via
/// [`SourceRecord::sentiment_label`]; it is intentionally not a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub timestamp: DateTime<Utc>,
    pub source: Source,
    pub title: String,
    /// Body text; empty string when the post has none.
    pub content: String,
    /// Polarity in [-1, 1], deterministic given title + content.
    pub sentiment_score: f64,
}

impl SourceRecord {
    pub fn sentiment_label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.sentiment_score)
    }
}

/// Inclusive time window `[start, end]`, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window covering the last `days` days, ending now.
    pub fn last_days(days: u32) -> Self {
        let end = Utc::now();
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// One validated search trigger: term plus lookback window and filters.
#[derive(Debug, Clone)]
pub struct MentionQuery {
    pub term: String,
    pub granularity: Granularity,
    pub lookback_days: u32,
    /// Minimum upvote score; only the Reddit-like provider applies it.
    pub min_upvotes: i64,
    pub window: QueryWindow,
}

impl MentionQuery {
    pub fn new(
        term: &str,
        granularity: Granularity,
        lookback_days: u32,
        min_upvotes: i64,
    ) -> Result<Self> {
        let term = term.trim();
        if term.is_empty() {
            bail!("search term must not be empty");
        }
        Ok(Self {
            term: term.to_string(),
            granularity,
            lookback_days,
            min_upvotes,
            window: QueryWindow::last_days(lookback_days),
        })
    }
}

/// Provider capability: fetch recent mentions of a term as normalized
/// records. Each adapter owns its raw schema; the orchestrator stays
/// provider-agnostic.
#[async_trait::async_trait]
pub trait MentionProvider: Send + Sync {
    async fn fetch(&self, query: &MentionQuery) -> Result<Vec<SourceRecord>>;
    fn name(&self) -> &'static str;
}
