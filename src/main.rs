//! Mention Tracker Service binary entrypoint.
//! Boots the Axum HTTP server over the query pipeline: provider adapters,
//! sentiment scoring, and time-bucketed aggregation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mention_tracker::api::{create_router, AppState};
use mention_tracker::cache::MemoryCache;
use mention_tracker::config::{self, RedditCredentials};
use mention_tracker::ingest::providers::{hacker_news::HackerNewsProvider, reddit::RedditProvider};
use mention_tracker::ingest::types::MentionProvider;
use mention_tracker::metrics::Metrics;
use mention_tracker::tracker::MentionTracker;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mention_tracker=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = config::load_default().context("loading tracker config")?;

    let credentials = match RedditCredentials::from_env() {
        Ok(c) => Some(c),
        Err(e) => {
            // Fetches will surface this as a provider failure, not a crash.
            tracing::warn!(error = ?e, "Reddit credentials unavailable");
            None
        }
    };

    let providers: Vec<Box<dyn MentionProvider>> = vec![
        Box::new(RedditProvider::new(credentials, config.reddit_keyword_filter)),
        Box::new(HackerNewsProvider::new(config.hn_keyword_filter)),
    ];

    let metrics = Metrics::init(config.cache_ttl_secs);
    let cache = Box::new(MemoryCache::with_ttl(Duration::from_secs(config.cache_ttl_secs)));
    let tracker = MentionTracker::new(
        providers,
        cache,
        Duration::from_secs(config.provider_timeout_secs),
    );

    let state = AppState {
        tracker: Arc::new(tracker),
        config: Arc::new(config),
    };
    let router = create_router(state).merge(metrics.router());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "mention tracker listening");
    axum::serve(listener, router).await.context("serving http")?;
    Ok(())
}
