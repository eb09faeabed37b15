use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cinefeed_config::{CacheConfig, FailureCaching};
use cinefeed_models::{Detail, MovieId};
use cinefeed_sources::{MovieSource, Normalizer};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long fallback records stay in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Skip,
    Forever,
    Expire(Duration),
}

impl FailurePolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        match config.failures {
            FailureCaching::Skip => FailurePolicy::Skip,
            FailureCaching::Forever => FailurePolicy::Forever,
            FailureCaching::Expire => FailurePolicy::Expire(config.failure_ttl()),
        }
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[derive(Debug, Clone)]
struct CachedDetail {
    detail: Detail,
    stored_at: Instant,
}

/// Process-lifetime cache of normalized detail records, keyed by movie id.
///
/// Successful records are kept until [`DetailCache::clear`]. The map lock is
/// released before the upstream call, so two first requests for the same id
/// may both fetch; the later write wins.
pub struct DetailCache {
    source: Arc<dyn MovieSource>,
    normalizer: Normalizer,
    policy: FailurePolicy,
    entries: RwLock<HashMap<MovieId, CachedDetail>>,
}

impl DetailCache {
    pub fn new(source: Arc<dyn MovieSource>, normalizer: Normalizer, policy: FailurePolicy) -> Self {
        Self {
            source,
            normalizer,
            policy,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Return the cached record for `id`, fetching and normalizing it on a
    /// miss. Never fails: upstream errors come back as [`Detail::Fallback`].
    pub async fn get_or_fetch(&self, id: MovieId) -> Detail {
        if let Some(detail) = self.lookup(id).await {
            debug!(movie_id = id, "Detail cache hit");
            return detail;
        }

        debug!(movie_id = id, source = self.source.source_name(), "Detail cache miss");
        let detail = match self.source.movie_details(id).await {
            Ok(value) => Detail::Loaded(self.normalizer.normalize_value(id, value)),
            Err(e) => {
                warn!(movie_id = id, error = %e, "Detail fetch failed, using fallback record");
                Detail::Fallback(self.normalizer.fallback(id, &e))
            }
        };

        self.store(id, &detail).await;
        detail
    }

    /// Whether a usable record for `id` is cached.
    pub async fn contains(&self, id: MovieId) -> bool {
        self.lookup(id).await.is_some()
    }

    /// Number of stored records, including expired fallbacks not yet replaced.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        info!(count = entries.len(), "Clearing detail cache");
        entries.clear();
    }

    async fn lookup(&self, id: MovieId) -> Option<Detail> {
        let entries = self.entries.read().await;
        let entry = entries.get(&id)?;
        if self.is_expired(entry) {
            debug!(movie_id = id, "Cached fallback expired");
            return None;
        }
        Some(entry.detail.clone())
    }

    fn is_expired(&self, entry: &CachedDetail) -> bool {
        match (&entry.detail, self.policy) {
            (Detail::Fallback(_), FailurePolicy::Expire(ttl)) => entry.stored_at.elapsed() >= ttl,
            _ => false,
        }
    }

    async fn store(&self, id: MovieId, detail: &Detail) {
        if detail.is_fallback() && self.policy == FailurePolicy::Skip {
            return;
        }
        let entry = CachedDetail {
            detail: detail.clone(),
            stored_at: Instant::now(),
        };
        self.entries.write().await.insert(id, entry);
    }
}
