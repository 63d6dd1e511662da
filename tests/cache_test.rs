//! Tests for [`RecipeCache`]: statistics, LRU bounds, views, persistence,
//! and corruption handling.

use std::sync::Arc;

use bakelens::storage::{MemoryStorage, Storage};
use bakelens::{AnalysisRequest, RecipeCache, RecipeParser, RecipeSource};

const CACHE_KEY: &str = "recipe_cache";

fn request(image: &[u8], prompt: &str) -> AnalysisRequest {
    AnalysisRequest::from_image(image, prompt)
}

fn recipe(title: &str) -> bakelens::Recipe {
    // Parser output is the only way recipes are minted in production.
    let mut r = RecipeParser::new().parse(&format!("{title}\n2 cups flour\nMix and bake."), "h");
    r.title = title.to_string();
    r
}

fn cache(capacity: usize) -> (RecipeCache, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (RecipeCache::new(storage.clone(), capacity), storage)
}

// =========================================================================
// Hit / miss behaviour
// =========================================================================

#[tokio::test]
async fn miss_then_hit() {
    let (cache, _) = cache(10);
    let req = request(b"img", "what is this?");

    assert!(cache.get_cached(&req).await.is_none());

    cache.cache_recipe(&req, recipe("Sourdough")).await;
    let hit = cache.get_cached(&req).await.unwrap();
    assert_eq!(hit.title, "Sourdough");

    let stats = cache.statistics().await;
    assert_eq!(stats.hit_count, 1);
    assert_eq!(stats.miss_count, 1);
    assert_eq!(stats.total_entries, 1);
}

#[tokio::test]
async fn hit_marks_recipe_as_cached() {
    let (cache, _) = cache(10);
    let req = request(b"img", "p");
    cache.cache_recipe(&req, recipe("Bagels")).await;

    let hit = cache.get_cached(&req).await.unwrap();
    assert_eq!(hit.source, RecipeSource::Cached);
}

#[tokio::test]
async fn equivalent_request_hits_regardless_of_time() {
    let (cache, _) = cache(10);
    cache
        .cache_recipe(&request(b"img", "prompt"), recipe("Rye Loaf"))
        .await;

    // A fresh request object with the same content must hit.
    assert!(cache.get_cached(&request(b"img", "prompt")).await.is_some());
    assert!(cache.get_cached(&request(b"img", "other")).await.is_none());
}

#[tokio::test]
async fn hit_rate_zero_without_lookups() {
    let (cache, _) = cache(10);
    assert_eq!(cache.statistics().await.hit_rate(), 0.0);
}

// =========================================================================
// LRU bound and eviction accounting
// =========================================================================

#[tokio::test]
async fn capacity_plus_k_inserts_evict_exactly_k() {
    let (cache, _) = cache(3);
    for i in 0..5 {
        let req = request(format!("img-{i}").as_bytes(), "p");
        cache.cache_recipe(&req, recipe(&format!("r{i}"))).await;
    }

    let stats = cache.statistics().await;
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.eviction_count, 2);
}

#[tokio::test]
async fn eviction_prefers_least_recently_used() {
    let (cache, _) = cache(2);
    let first = request(b"one", "p");
    let second = request(b"two", "p");
    cache.cache_recipe(&first, recipe("first")).await;
    cache.cache_recipe(&second, recipe("second")).await;

    // Touch "first" so "second" is LRU.
    cache.get_cached(&first).await;
    cache
        .cache_recipe(&request(b"three", "p"), recipe("third"))
        .await;

    assert!(cache.get_cached(&first).await.is_some());
    assert!(cache.get_cached(&second).await.is_none());
}

#[tokio::test]
async fn resize_down_evicts_and_counts() {
    let (cache, _) = cache(5);
    for i in 0..5 {
        cache
            .cache_recipe(&request(format!("{i}").as_bytes(), "p"), recipe("r"))
            .await;
    }
    cache.resize(2).await;

    let stats = cache.statistics().await;
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.eviction_count, 3);
}

// =========================================================================
// Removal and retention
// =========================================================================

#[tokio::test]
async fn remove_by_recipe_id() {
    let (cache, _) = cache(10);
    let req = request(b"img", "p");
    let r = recipe("Pretzels");
    let id = r.id.clone();
    cache.cache_recipe(&req, r).await;

    assert!(cache.remove_recipe(&id).await);
    assert!(!cache.remove_recipe(&id).await);
    assert!(cache.get_cached(&req).await.is_none());
}

#[tokio::test]
async fn clear_old_entries_respects_retention() {
    let (cache, _) = cache(10);
    cache.cache_recipe(&request(b"img", "p"), recipe("Fresh")).await;

    // Everything was cached just now; a 7-day sweep removes nothing.
    assert_eq!(cache.clear_old_entries(7).await, 0);
    assert_eq!(cache.statistics().await.total_entries, 1);
}

#[tokio::test]
async fn clear_all_keeps_counters() {
    let (cache, _) = cache(10);
    let req = request(b"img", "p");
    cache.cache_recipe(&req, recipe("Focaccia")).await;
    cache.get_cached(&req).await;

    cache.clear_all().await;

    let stats = cache.statistics().await;
    assert_eq!(stats.total_entries, 0);
    assert_eq!(stats.hit_count, 1);
}

// =========================================================================
// Read views
// =========================================================================

#[tokio::test]
async fn most_accessed_orders_by_access_count() {
    let (cache, _) = cache(10);
    let hot = request(b"hot", "p");
    let cold = request(b"cold", "p");
    cache.cache_recipe(&hot, recipe("Hot")).await;
    cache.cache_recipe(&cold, recipe("Cold")).await;

    for _ in 0..3 {
        cache.get_cached(&hot).await;
    }
    cache.get_cached(&cold).await;

    let top = cache.most_accessed(1).await;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].title, "Hot");
}

#[tokio::test]
async fn recently_accessed_orders_by_last_access() {
    let (cache, _) = cache(10);
    let old = request(b"old", "p");
    let new = request(b"new", "p");
    cache.cache_recipe(&old, recipe("Old")).await;
    cache.cache_recipe(&new, recipe("New")).await;

    cache.get_cached(&new).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    cache.get_cached(&old).await;

    let recent = cache.recently_accessed(2).await;
    assert_eq!(recent[0].title, "Old");
    assert_eq!(recent[1].title, "New");
}

#[tokio::test]
async fn all_recipes_limit_and_count() {
    let (cache, _) = cache(10);
    for i in 0..4 {
        cache
            .cache_recipe(&request(format!("{i}").as_bytes(), "p"), recipe("r"))
            .await;
    }
    assert_eq!(cache.all_recipes().await.len(), 4);
    assert_eq!(cache.recently_accessed(2).await.len(), 2);
}

// =========================================================================
// Persistence and corruption
// =========================================================================

#[tokio::test]
async fn cache_survives_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let req = request(b"img", "p");

    let first = RecipeCache::new(storage.clone(), 10);
    first.cache_recipe(&req, recipe("Persisted")).await;
    first.get_cached(&req).await;
    drop(first);

    let second = RecipeCache::new(storage, 10);
    let hit = second.get_cached(&req).await.unwrap();
    assert_eq!(hit.title, "Persisted");

    // Counters survive too: 1 hit before restart + 1 after.
    assert_eq!(second.statistics().await.hit_count, 2);
}

#[tokio::test]
async fn lru_order_survives_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let stale = request(b"stale", "p");
    let touched = request(b"touched", "p");
    let fresh = request(b"fresh", "p");

    let first = RecipeCache::new(storage.clone(), 3);
    first.cache_recipe(&touched, recipe("Touched")).await;
    first.cache_recipe(&stale, recipe("Stale")).await;
    first.cache_recipe(&fresh, recipe("Fresh")).await;
    // "touched" is now most recently used, "stale" least.
    first.get_cached(&touched).await;
    drop(first);

    // The first overflow after a restart must still evict the LRU entry.
    let second = RecipeCache::new(storage, 3);
    second
        .cache_recipe(&request(b"new", "p"), recipe("New"))
        .await;

    assert!(second.get_cached(&stale).await.is_none());
    assert!(second.get_cached(&touched).await.is_some());
    assert!(second.get_cached(&fresh).await.is_some());
    assert_eq!(second.statistics().await.eviction_count, 1);
}

#[tokio::test]
async fn tampered_blob_loads_as_empty_cache() {
    let storage = Arc::new(MemoryStorage::new());
    let req = request(b"img", "p");

    let first = RecipeCache::new(storage.clone(), 10);
    first.cache_recipe(&req, recipe("Tampered")).await;
    drop(first);

    // Flip one byte inside the payload.
    let mut blob = storage.read(CACHE_KEY).await.unwrap().unwrap();
    let payload_pos = blob.windows(8).position(|w| w == b"Tampered").unwrap();
    blob[payload_pos] = b'X';
    storage.write(CACHE_KEY, &blob).await.unwrap();

    let second = RecipeCache::new(storage, 10);
    assert!(second.get_cached(&req).await.is_none());
    assert_eq!(second.statistics().await.total_entries, 0);
}

#[tokio::test]
async fn garbage_blob_loads_as_empty_cache() {
    let storage = Arc::new(MemoryStorage::new());
    storage.write(CACHE_KEY, b"\x00\xffnot a cache").await.unwrap();

    let cache = RecipeCache::new(storage, 10);
    assert!(cache.get_cached(&request(b"img", "p")).await.is_none());
}

#[tokio::test]
async fn write_failure_keeps_memory_state_authoritative() {
    let storage = Arc::new(MemoryStorage::new());
    let cache = RecipeCache::new(storage.clone(), 10);
    storage.fail_writes(true);

    let req = request(b"img", "p");
    cache.cache_recipe(&req, recipe("Ephemeral")).await;

    // Persistence failed, but the in-memory entry still serves hits.
    assert!(cache.get_cached(&req).await.is_some());
}
