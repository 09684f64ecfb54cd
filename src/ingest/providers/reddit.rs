// src/ingest/providers/reddit.rs
//! Reddit adapter: OAuth2 password grant, subreddit discovery by term,
//! then recent posts per subreddit, normalized against the query window.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::config::RedditCredentials;
use crate::ingest::types::{MentionProvider, MentionQuery, Source, SourceRecord};
use crate::ingest::{contains_term, normalize_text};
use crate::sentiment::SentimentAnalyzer;

const USER_AGENT: &str = "mention-tracker/0.1";
const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListingData<T> {
    #[serde(default)]
    children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
struct Thing<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SubredditAbout {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    title: Option<String>,
    selftext: Option<String>,
    created_utc: Option<f64>,
    score: Option<i64>,
}

pub struct RedditProvider {
    client: reqwest::Client,
    credentials: Option<RedditCredentials>,
    keyword_filter: bool,
    analyzer: SentimentAnalyzer,
    auth_base: String,
    api_base: String,
}

impl RedditProvider {
    pub fn new(credentials: Option<RedditCredentials>, keyword_filter: bool) -> Self {
        Self::with_bases(
            credentials,
            keyword_filter,
            DEFAULT_AUTH_BASE,
            DEFAULT_API_BASE,
        )
    }

    /// Base URLs are injectable so tests can point at a local stub.
    pub fn with_bases(
        credentials: Option<RedditCredentials>,
        keyword_filter: bool,
        auth_base: &str,
        api_base: &str,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            keyword_filter,
            analyzer: SentimentAnalyzer::new(),
            auth_base: auth_base.to_string(),
            api_base: api_base.to_string(),
        }
    }

    async fn access_token(&self, creds: &RedditCredentials) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_base))
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .form(&[
                ("grant_type", "password"),
                ("username", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ])
            .send()
            .await
            .context("reddit token request")?
            .error_for_status()
            .context("reddit token response status")?;

        let tok: TokenResponse = resp.json().await.context("parsing reddit token response")?;
        tok.access_token
            .context("reddit token response has no access_token (invalid credentials?)")
    }

    async fn matching_subreddits(&self, token: &str, term: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}/subreddits/search", self.api_base))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("q", term), ("limit", "10")])
            .send()
            .await
            .context("reddit subreddit search request")?
            .error_for_status()
            .context("reddit subreddit search status")?;

        let listing: Listing<SubredditAbout> =
            resp.json().await.context("parsing subreddit listing")?;
        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|t| t.data.display_name)
            .collect())
    }

    async fn recent_posts(&self, token: &str, subreddit: &str) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}/r/{}/new", self.api_base, subreddit))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("limit", "100")])
            .send()
            .await
            .with_context(|| format!("reddit /r/{subreddit}/new request"))?
            .error_for_status()
            .with_context(|| format!("reddit /r/{subreddit}/new status"))?;

        resp.text().await.context("reading reddit listing body")
    }

    /// Parse one `/new` listing and normalize its posts against the query.
    /// Malformed posts (missing timestamp) are skipped, not fatal.
    pub fn normalize_listing(&self, json: &str, query: &MentionQuery) -> Result<Vec<SourceRecord>> {
        let t0 = std::time::Instant::now();

        let listing: Listing<RawPost> =
            serde_json::from_str(json).context("parsing reddit listing json")?;
        counter!("mention_events_total").increment(listing.data.children.len() as u64);

        let mut out = Vec::new();
        for child in listing.data.children {
            let post = child.data;
            let Some(created) = post
                .created_utc
                .and_then(|s| DateTime::from_timestamp(s as i64, 0))
            else {
                continue;
            };
            if !query.window.contains(created) {
                continue;
            }
            if post.score.unwrap_or(0) < query.min_upvotes {
                continue;
            }

            let title = normalize_text(post.title.as_deref().unwrap_or_default());
            let content = normalize_text(post.selftext.as_deref().unwrap_or_default());
            if self.keyword_filter && !contains_term(&title, &content, &query.term) {
                continue;
            }

            let sentiment_score = self.analyzer.polarity(&format!("{title} {content}"));
            out.push(SourceRecord {
                timestamp: created,
                source: Source::Reddit,
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
impl MentionProvider for RedditProvider {
    async fn fetch(&self, query: &MentionQuery) -> Result<Vec<SourceRecord>> {
        let creds = self.credentials.as_ref().context(
            "Reddit credentials not configured \
             (set REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET / REDDIT_USERNAME / REDDIT_PASSWORD)",
        )?;
        let token = self.access_token(creds).await?;

        let mut out = Vec::new();
        for sub in self.matching_subreddits(&token, &query.term).await? {
            match self.recent_posts(&token, &sub).await {
                Ok(body) => match self.normalize_listing(&body, query) {
                    Ok(mut records) => out.append(&mut records),
                    Err(e) => {
                        tracing::warn!(error = ?e, subreddit = %sub, "skipping unparseable listing")
                    }
                },
                Err(e) => {
                    tracing::warn!(error = ?e, subreddit = %sub, "skipping unreachable subreddit")
                }
            }
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}
