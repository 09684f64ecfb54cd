//! # Query Orchestrator
//! Drives one search trigger through fetch -> merge -> aggregate.
//!
//! A query moves Idle -> Fetching -> Aggregated | Empty | Failed. A single
//! provider's failure degrades to a partial result with a user-visible
//! warning; it never aborts the query. Re-triggering the whole query is the
//! retry mechanism.

use std::time::Duration;

use anyhow::anyhow;
use futures::future::join_all;
use metrics::{counter, gauge};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{
    counts_by_source_and_bucket, mean_sentiment_by_bucket, sentiment_distribution,
    totals_by_bucket, BucketTotal, Granularity, SentimentBreakdown, SourceCount, TrendPoint,
};
use crate::cache::{QueryCache, QueryKey};
use crate::ingest::ensure_metrics_described;
use crate::ingest::types::{MentionProvider, MentionQuery, SourceRecord};
use crate::keywords::{self, KeywordCount};

/// Keywords exposed in the report for the word-frequency view.
const TOP_KEYWORDS: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentionReport {
    pub term: String,
    pub granularity: Granularity,
    pub counts_by_source: Vec<SourceCount>,
    pub totals: Vec<BucketTotal>,
    pub sentiment_trend: Vec<TrendPoint>,
    pub sentiment_distribution: SentimentBreakdown,
    pub top_keywords: Vec<KeywordCount>,
    /// Raw record set for sampling and CSV export.
    pub records: Vec<SourceRecord>,
    /// Providers that failed on this run; their contribution is empty.
    pub failures: Vec<ProviderFailure>,
}

/// Terminal state of one query.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackerOutcome {
    /// Mentions found; aggregates computed.
    Aggregated(MentionReport),
    /// At least one provider responded but nothing matched: "no mentions
    /// found", not an error.
    Empty { failures: Vec<ProviderFailure> },
    /// Every provider failed; nothing to aggregate.
    Failed { failures: Vec<ProviderFailure> },
}

impl TrackerOutcome {
    pub fn records(&self) -> &[SourceRecord] {
        match self {
            TrackerOutcome::Aggregated(report) => &report.records,
            _ => &[],
        }
    }
}

pub struct MentionTracker {
    providers: Vec<Box<dyn MentionProvider>>,
    cache: Box<dyn QueryCache>,
    provider_timeout: Duration,
}

impl MentionTracker {
    pub fn new(
        providers: Vec<Box<dyn MentionProvider>>,
        cache: Box<dyn QueryCache>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            cache,
            provider_timeout,
        }
    }

    /// Run one query to a terminal state. Never panics and never returns a
    /// transport error; provider failures surface inside the outcome.
    pub async fn track(&self, query: &MentionQuery) -> TrackerOutcome {
        ensure_metrics_described();
        gauge!("mention_last_query_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        let key = QueryKey::from(query);
        let (records, failures) = match self.cache.get(&key) {
            Some(records) => {
                info!(term = %query.term, records = records.len(), "serving query from cache");
                (records, Vec::new())
            }
            None => {
                let (records, failures) = self.fetch_merged(query).await;
                // Failed fetches are never memoized; a retry refetches.
                if failures.is_empty() {
                    self.cache.put(&key, &records);
                }
                (records, failures)
            }
        };

        if records.is_empty() {
            if !self.providers.is_empty() && failures.len() == self.providers.len() {
                return TrackerOutcome::Failed { failures };
            }
            return TrackerOutcome::Empty { failures };
        }

        let corpus = keywords::corpus(&records);
        TrackerOutcome::Aggregated(MentionReport {
            term: query.term.clone(),
            granularity: query.granularity,
            counts_by_source: counts_by_source_and_bucket(&records, query.granularity),
            totals: totals_by_bucket(&records, query.granularity),
            sentiment_trend: mean_sentiment_by_bucket(&records, query.granularity),
            sentiment_distribution: sentiment_distribution(&records),
            top_keywords: keywords::top_keywords(&corpus, TOP_KEYWORDS),
            records,
            failures,
        })
    }

    /// Fetch from all providers behind a join barrier; merge what succeeded.
    /// No cross-source dedup, no ordering guarantee between providers.
    async fn fetch_merged(
        &self,
        query: &MentionQuery,
    ) -> (Vec<SourceRecord>, Vec<ProviderFailure>) {
        let fetches = self.providers.iter().map(|p| async {
            let result = match tokio::time::timeout(self.provider_timeout, p.fetch(query)).await {
                Ok(r) => r,
                Err(_) => Err(anyhow!("timed out after {:?}", self.provider_timeout)),
            };
            (p.name(), result)
        });

        let mut records = Vec::new();
        let mut failures = Vec::new();
        for (name, result) in join_all(fetches).await {
            match result {
                Ok(mut batch) => {
                    counter!("mention_kept_total").increment(batch.len() as u64);
                    info!(provider = name, records = batch.len(), term = %query.term, "provider fetch ok");
                    records.append(&mut batch);
                }
                Err(e) => {
                    warn!(error = ?e, provider = name, "provider error");
                    counter!("mention_provider_errors_total").increment(1);
                    failures.push(ProviderFailure {
                        provider: name.to_string(),
                        message: format!("{e:#}"),
                    });
                }
            }
        }
        (records, failures)
    }
}
