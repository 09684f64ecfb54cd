use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::config::TrackerConfig;
use crate::export;
use crate::ingest::types::MentionQuery;
use crate::tracker::MentionTracker;

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<MentionTracker>,
    pub config: Arc<TrackerConfig>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/track", get(track))
        .route("/track.csv", get(track_csv))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct TrackParams {
    term: String,
    granularity: Option<String>,
    days: Option<u32>,
    min_upvotes: Option<i64>,
}

fn build_query(config: &TrackerConfig, params: &TrackParams) -> anyhow::Result<MentionQuery> {
    let granularity = match params.granularity.as_deref() {
        Some(s) => s.parse()?,
        None => config.granularity,
    };
    MentionQuery::new(
        &params.term,
        granularity,
        params.days.unwrap_or(config.lookback_days),
        params.min_upvotes.unwrap_or(config.min_upvotes),
    )
}

async fn track(State(state): State<AppState>, Query(params): Query<TrackParams>) -> Response {
    let query = match build_query(&state.config, &params) {
        Ok(q) => q,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    Json(state.tracker.track(&query).await).into_response()
}

async fn track_csv(State(state): State<AppState>, Query(params): Query<TrackParams>) -> Response {
    let query = match build_query(&state.config, &params) {
        Ok(q) => q,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    let outcome = state.tracker.track(&query).await;
    match export::to_csv(outcome.records(), query.granularity) {
        Ok(body) => ([(header::CONTENT_TYPE, "text/csv")], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
