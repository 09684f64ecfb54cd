//! Optional memoization for repeated queries.
//!
//! An explicit, injectable capability rather than process-wide state, so
//! tests never leak cached results between cases. Correctness of the
//! pipeline never depends on the cache.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::aggregate::Granularity;
use crate::ingest::types::{MentionQuery, SourceRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub term: String,
    pub lookback_days: u32,
    pub granularity: Granularity,
}

impl From<&MentionQuery> for QueryKey {
    fn from(q: &MentionQuery) -> Self {
        Self {
            term: q.term.to_lowercase(),
            lookback_days: q.lookback_days,
            granularity: q.granularity,
        }
    }
}

pub trait QueryCache: Send + Sync {
    fn get(&self, key: &QueryKey) -> Option<Vec<SourceRecord>>;
    fn put(&self, key: &QueryKey, records: &[SourceRecord]);
}

/// Disables memoization entirely.
#[derive(Debug, Default)]
pub struct NoCache;

impl QueryCache for NoCache {
    fn get(&self, _key: &QueryKey) -> Option<Vec<SourceRecord>> {
        None
    }

    fn put(&self, _key: &QueryKey, _records: &[SourceRecord]) {}
}

/// In-memory cache with a fixed TTL per entry.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<HashMap<QueryKey, (Instant, Vec<SourceRecord>)>>,
    ttl: Duration,
}

impl MemoryCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

impl QueryCache for MemoryCache {
    fn get(&self, key: &QueryKey) -> Option<Vec<SourceRecord>> {
        let inner = self.inner.lock().expect("cache mutex poisoned");
        inner
            .get(key)
            .and_then(|(at, records)| (at.elapsed() < self.ttl).then(|| records.clone()))
    }

    fn put(&self, key: &QueryKey, records: &[SourceRecord]) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");
        inner.insert(key.clone(), (Instant::now(), records.to_vec()));
    }
}
