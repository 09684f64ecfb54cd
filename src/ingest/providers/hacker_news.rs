// src/ingest/providers/hacker_news.rs
//! Hacker News adapter over the Algolia `search_by_date` endpoint.
//! No authentication; hits carry an epoch timestamp, title, and optional
//! story text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::types::{MentionProvider, MentionQuery, Source, SourceRecord};
use crate::ingest::{contains_term, normalize_text};
use crate::sentiment::SentimentAnalyzer;

const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    created_at_i: Option<i64>,
    title: Option<String>,
    story_text: Option<String>,
}

pub struct HackerNewsProvider {
    client: reqwest::Client,
    keyword_filter: bool,
    analyzer: SentimentAnalyzer,
    base_url: String,
}

impl HackerNewsProvider {
    pub fn new(keyword_filter: bool) -> Self {
        Self::with_base(keyword_filter, DEFAULT_BASE_URL)
    }

    /// Base URL is injectable so tests can point at a local stub.
    pub fn with_base(keyword_filter: bool, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            keyword_filter,
            analyzer: SentimentAnalyzer::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Parse a `search_by_date` response and normalize its hits against the
    /// query. Malformed hits (missing timestamp) are skipped, not fatal.
    pub fn normalize_response(&self, json: &str, query: &MentionQuery) -> Result<Vec<SourceRecord>> {
        let t0 = std::time::Instant::now();

        let resp: SearchResponse =
            serde_json::from_str(json).context("parsing hacker news response json")?;
        counter!("mention_events_total").increment(resp.hits.len() as u64);

        let mut out = Vec::new();
        for hit in resp.hits {
            let Some(created) = hit
                .created_at_i
                .and_then(|s| DateTime::from_timestamp(s, 0))
            else {
                continue;
            };
            if !query.window.contains(created) {
                continue;
            }

            let title = normalize_text(hit.title.as_deref().unwrap_or_default());
            let content = normalize_text(hit.story_text.as_deref().unwrap_or_default());
            if self.keyword_filter && !contains_term(&title, &content, &query.term) {
                continue;
            }

            let sentiment_score = self.analyzer.polarity(&format!("{title} {content}"));
            out.push(SourceRecord {
                timestamp: created,
                source: Source::HackerNews,
                title,
                content,
                sentiment_score,
            });
        }

        histogram!("mention_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl MentionProvider for HackerNewsProvider {
    async fn fetch(&self, query: &MentionQuery) -> Result<Vec<SourceRecord>> {
        let resp = self
            .client
            .get(format!("{}/search_by_date", self.base_url))
            .query(&[("query", query.term.as_str()), ("tags", "story")])
            .send()
            .await
            .context("hacker news search request")?
            .error_for_status()
            .context("hacker news search status")?;

        let body = resp.text().await.context("reading hacker news response")?;
        self.normalize_response(&body, query)
    }

    fn name(&self) -> &'static str {
        "Hacker News"
    }
}
