//! Content-addressed recipe cache with LRU eviction and durable persistence.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::storage::Storage;
use crate::telemetry;
use crate::types::{AnalysisRequest, Recipe};

use super::lru::LruMap;
use super::persist::{self, CacheSnapshot};

/// Storage key of the single serialized cache blob.
const CACHE_STORAGE_KEY: &str = "recipe_cache";

/// Default bounded capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// A cached recipe plus its access bookkeeping.
///
/// `access_count` and `last_accessed` are the recency/frequency signals
/// behind the "most accessed" and "recently accessed" views; both update
/// on every cache hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecipe {
    pub recipe: Recipe,
    pub original_request: AnalysisRequest,
    pub cached_at: DateTime<Utc>,
    pub access_count: u64,
    pub last_accessed: DateTime<Utc>,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub total_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub eviction_count: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

impl CacheStatistics {
    /// Hit ratio over all lookups; zero when none recorded.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

// All mutable state lives here, behind one mutex, so every cache
// operation is a single linearizable read-modify-write.
struct CacheState {
    entries: LruMap<String, CachedRecipe>,
    hit_count: u64,
    miss_count: u64,
    eviction_count: u64,
    hydrated: bool,
}

/// LRU recipe cache keyed by image+prompt content hash.
///
/// Every mutating operation persists the full snapshot synchronously;
/// persistence failures are logged and swallowed, in-memory state staying
/// authoritative for the session. The persisted blob is hydrated lazily on
/// the first operation, and a corrupt or stale blob silently yields an
/// empty cache.
pub struct RecipeCache {
    storage: Arc<dyn Storage>,
    state: Mutex<CacheState>,
}

impl RecipeCache {
    pub fn new(storage: Arc<dyn Storage>, capacity: usize) -> Self {
        Self {
            storage,
            state: Mutex::new(CacheState {
                entries: LruMap::new(capacity),
                hit_count: 0,
                miss_count: 0,
                eviction_count: 0,
                hydrated: false,
            }),
        }
    }

    /// Insert (or overwrite) the recipe for a request.
    pub async fn cache_recipe(&self, request: &AnalysisRequest, recipe: Recipe) {
        let key = request.cache_key();
        let mut state = self.lock_hydrated().await;
        let now = Utc::now();
        let entry = CachedRecipe {
            recipe,
            original_request: request.clone(),
            cached_at: now,
            access_count: 0,
            last_accessed: now,
        };
        if let Some((evicted_key, _)) = state.entries.insert(key.clone(), entry) {
            state.eviction_count += 1;
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(1);
            debug!(key = %evicted_key, "evicted least-recently-used recipe");
        }
        debug!(%key, "cached recipe");
        self.persist(&state).await;
    }

    /// Look up the recipe for a request.
    ///
    /// On a hit the entry's access count and recency refresh and the
    /// returned recipe is marked [`RecipeSource::Cached`](crate::RecipeSource::Cached).
    pub async fn get_cached(&self, request: &AnalysisRequest) -> Option<Recipe> {
        let key = request.cache_key();
        let mut state = self.lock_hydrated().await;
        match state.entries.get(&key) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_accessed = Utc::now();
                let recipe = entry.recipe.as_cached();
                state.hit_count += 1;
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                self.persist(&state).await;
                Some(recipe)
            }
            None => {
                state.miss_count += 1;
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                self.persist(&state).await;
                None
            }
        }
    }

    /// Remove the entry holding the recipe with this id.
    pub async fn remove_recipe(&self, recipe_id: &str) -> bool {
        let mut state = self.lock_hydrated().await;
        let removed = state
            .entries
            .drain_filter(|_, entry| entry.recipe.id == recipe_id);
        if removed.is_empty() {
            return false;
        }
        self.persist(&state).await;
        true
    }

    /// Drop entries cached more than `retention_days` ago. Returns the
    /// number removed. Retention sweeps do not count as LRU evictions.
    pub async fn clear_old_entries(&self, retention_days: u32) -> usize {
        let cutoff = Utc::now() - Duration::days(retention_days as i64);
        let mut state = self.lock_hydrated().await;
        let removed = state.entries.drain_filter(|_, entry| entry.cached_at < cutoff);
        if !removed.is_empty() {
            debug!(count = removed.len(), retention_days, "swept stale cache entries");
            self.persist(&state).await;
        }
        removed.len()
    }

    /// Drop every entry, keeping the statistics counters.
    pub async fn clear_all(&self) {
        let mut state = self.lock_hydrated().await;
        state.entries.clear();
        self.persist(&state).await;
    }

    /// Change the bounded capacity, evicting LRU entries as needed.
    pub async fn resize(&self, capacity: usize) {
        let mut state = self.lock_hydrated().await;
        let evicted = state.entries.set_capacity(capacity);
        if !evicted.is_empty() {
            state.eviction_count += evicted.len() as u64;
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(evicted.len() as u64);
        }
        self.persist(&state).await;
    }

    /// All cached recipes, newest first by creation time.
    pub async fn all_recipes(&self) -> Vec<Recipe> {
        let state = self.lock_hydrated().await;
        let mut recipes: Vec<Recipe> = state
            .entries
            .iter()
            .map(|(_, entry)| entry.recipe.clone())
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recipes
    }

    /// Up to `limit` recipes by most recent access.
    pub async fn recently_accessed(&self, limit: usize) -> Vec<Recipe> {
        self.sorted_view(limit, |a, b| b.last_accessed.cmp(&a.last_accessed))
            .await
    }

    /// Up to `limit` recipes by access count, descending.
    pub async fn most_accessed(&self, limit: usize) -> Vec<Recipe> {
        self.sorted_view(limit, |a, b| b.access_count.cmp(&a.access_count))
            .await
    }

    /// Current counters and entry-age bounds.
    pub async fn statistics(&self) -> CacheStatistics {
        let state = self.lock_hydrated().await;
        CacheStatistics {
            total_entries: state.entries.len(),
            hit_count: state.hit_count,
            miss_count: state.miss_count,
            eviction_count: state.eviction_count,
            oldest_entry: state.entries.iter().map(|(_, e)| e.cached_at).min(),
            newest_entry: state.entries.iter().map(|(_, e)| e.cached_at).max(),
        }
    }

    async fn sorted_view(
        &self,
        limit: usize,
        cmp: impl Fn(&CachedRecipe, &CachedRecipe) -> std::cmp::Ordering,
    ) -> Vec<Recipe> {
        let state = self.lock_hydrated().await;
        let mut entries: Vec<&CachedRecipe> = state.entries.iter().map(|(_, e)| e).collect();
        entries.sort_by(|a, b| cmp(a, b));
        entries
            .into_iter()
            .take(limit)
            .map(|e| e.recipe.clone())
            .collect()
    }

    // Lock the state, hydrating from storage on first touch. Any load
    // failure or corrupt blob means an empty cache, never an error.
    async fn lock_hydrated(&self) -> tokio::sync::MutexGuard<'_, CacheState> {
        let mut state = self.state.lock().await;
        if !state.hydrated {
            state.hydrated = true;
            match self.storage.read(CACHE_STORAGE_KEY).await {
                Ok(Some(bytes)) => match persist::decode(&bytes) {
                    Some(snapshot) => {
                        state.hit_count = snapshot.hit_count;
                        state.miss_count = snapshot.miss_count;
                        state.eviction_count = snapshot.eviction_count;
                        for (key, entry) in snapshot.entries {
                            // Snapshot may exceed the current capacity;
                            // overflow falls out as ordinary evictions.
                            if state.entries.insert(key, entry).is_some() {
                                state.eviction_count += 1;
                            }
                        }
                        debug!(entries = state.entries.len(), "recipe cache hydrated");
                    }
                    None => {
                        warn!("discarding corrupt or stale recipe cache blob");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "recipe cache load failed, starting empty");
                }
            }
        }
        state
    }

    // Persist the full snapshot. Entries are written LRU-first so that
    // hydration's reinsertion rebuilds the same eviction order. Failures
    // are logged and swallowed.
    async fn persist(&self, state: &CacheState) {
        let snapshot = CacheSnapshot {
            entries: state
                .entries
                .iter_ordered()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            hit_count: state.hit_count,
            miss_count: state.miss_count,
            eviction_count: state.eviction_count,
        };
        let bytes = match persist::encode(&snapshot) {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "recipe cache serialization failed");
                return;
            }
        };
        if let Err(e) = self.storage.write(CACHE_STORAGE_KEY, &bytes).await {
            warn!(error = %e, "recipe cache persistence failed");
        }
    }
}
