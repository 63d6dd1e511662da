//! Caching subsystem.
//!
//! - [`RecipeCache`] — content-addressed LRU cache of parsed recipes,
//!   persisted as one checksummed blob after every mutation. All state
//!   sits behind a single mutex, so hit/miss statistics are exact.
//!
//! - [`lru::LruMap`] — the underlying bounded map. Evictions are returned
//!   to the caller rather than handled by a hidden callback, which is how
//!   the cache keeps its eviction counter and persistence in lockstep.
//!
//! - [`persist`] — the versioned `{version, checksum, payload}` envelope.
//!   Corruption is detected by checksum and handled by starting empty.

pub mod lru;
pub mod persist;
pub mod recipe;

pub use persist::CACHE_FORMAT_VERSION;
pub use recipe::{CacheStatistics, CachedRecipe, DEFAULT_CACHE_CAPACITY, RecipeCache};
