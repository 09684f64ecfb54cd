// tests/api_http.rs
// Router-level tests with mock providers behind the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use chrono::{Duration as TimeDelta, Utc};
use http::{Request, StatusCode};
use tower::ServiceExt;

use mention_tracker::api::{create_router, AppState};
use mention_tracker::cache::NoCache;
use mention_tracker::config::TrackerConfig;
use mention_tracker::ingest::types::{MentionProvider, MentionQuery, Source, SourceRecord};
use mention_tracker::tracker::MentionTracker;

struct StaticProvider(Vec<SourceRecord>);

#[async_trait]
impl MentionProvider for StaticProvider {
    async fn fetch(&self, _query: &MentionQuery) -> Result<Vec<SourceRecord>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "Hacker News"
    }
}

fn app(records: Vec<SourceRecord>) -> Router {
    let tracker = MentionTracker::new(
        vec![Box::new(StaticProvider(records))],
        Box::new(NoCache),
        Duration::from_secs(5),
    );
    create_router(AppState {
        tracker: Arc::new(tracker),
        config: Arc::new(TrackerConfig::default()),
    })
}

fn sample_records() -> Vec<SourceRecord> {
    vec![SourceRecord {
        timestamp: Utc::now() - TimeDelta::hours(2),
        source: Source::HackerNews,
        title: "Acme ships a widget".to_string(),
        content: String::new(),
        sentiment_score: 0.4,
    }]
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn health_returns_ok() {
    let resp = app(Vec::new())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
        .await
        .expect("call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");
}

#[tokio::test]
async fn track_returns_aggregated_json() {
    let resp = app(sample_records())
        .oneshot(
            Request::builder()
                .uri("/track?term=acme&granularity=daily")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("call /track");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(json["status"], "aggregated");
    assert_eq!(json["records"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(json["granularity"], "day");
}

#[tokio::test]
async fn track_with_no_mentions_reports_empty() {
    let resp = app(Vec::new())
        .oneshot(
            Request::builder()
                .uri("/track?term=acme")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("call /track");
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value =
        serde_json::from_str(&body_string(resp).await).expect("json body");
    assert_eq!(json["status"], "empty");
}

#[tokio::test]
async fn missing_term_is_a_bad_request() {
    let resp = app(Vec::new())
        .oneshot(Request::builder().uri("/track").body(Body::empty()).expect("request"))
        .await
        .expect("call /track");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_term_is_a_bad_request() {
    let resp = app(Vec::new())
        .oneshot(
            Request::builder()
                .uri("/track?term=%20%20")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("call /track");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_granularity_is_a_bad_request() {
    let resp = app(Vec::new())
        .oneshot(
            Request::builder()
                .uri("/track?term=acme&granularity=weekly")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("call /track");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn csv_endpoint_sets_content_type_and_header_row() {
    let resp = app(sample_records())
        .oneshot(
            Request::builder()
                .uri("/track.csv?term=acme")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("call /track.csv");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/csv")
    );

    let body = body_string(resp).await;
    assert!(body.starts_with("timestamp,source,title,content,sentiment_score,sentiment_label,time_bucket"));
    assert!(body.contains("Acme ships a widget"));
}
