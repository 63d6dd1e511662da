//! Persisted cache blob format.
//!
//! The whole cache serializes to one artifact:
//! `{ version, checksum, payload }` where `payload` is the JSON snapshot
//! and `checksum` is the SHA-256 hex digest of the payload string. Decoding
//! is deliberately lossy: a version mismatch, checksum mismatch, or any
//! parse failure yields `None` and the cache starts empty. Startup never
//! fails because of a corrupt cache file.

use serde::{Deserialize, Serialize};

use crate::types::request::sha256_hex;

use super::recipe::CachedRecipe;

/// Bumped whenever the snapshot layout changes incompatibly.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// On-disk envelope.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCache {
    version: u32,
    checksum: String,
    payload: String,
}

/// Everything the cache needs to restore a session: entries (keyed by
/// cache key, each carrying its original request) and the running
/// statistics counters.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub entries: Vec<(String, CachedRecipe)>,
    #[serde(default)]
    pub hit_count: u64,
    #[serde(default)]
    pub miss_count: u64,
    #[serde(default)]
    pub eviction_count: u64,
}

/// Serialize a snapshot into the versioned, checksummed envelope.
pub fn encode(snapshot: &CacheSnapshot) -> serde_json::Result<Vec<u8>> {
    let payload = serde_json::to_string(snapshot)?;
    let envelope = PersistedCache {
        version: CACHE_FORMAT_VERSION,
        checksum: sha256_hex(payload.as_bytes()),
        payload,
    };
    serde_json::to_vec(&envelope)
}

/// Decode a persisted blob, `None` on any mismatch or parse failure.
pub fn decode(bytes: &[u8]) -> Option<CacheSnapshot> {
    let envelope: PersistedCache = serde_json::from_slice(bytes).ok()?;
    if envelope.version != CACHE_FORMAT_VERSION {
        return None;
    }
    if sha256_hex(envelope.payload.as_bytes()) != envelope.checksum {
        return None;
    }
    serde_json::from_str(&envelope.payload).ok()
}
