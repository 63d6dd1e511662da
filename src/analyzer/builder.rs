//! Builder for configuring analysis engines

use std::sync::Arc;

use crate::cache::{DEFAULT_CACHE_CAPACITY, RecipeCache};
use crate::security::{RateLimits, SecurityManager};
use crate::storage::{FileStorage, Storage};
use crate::traits::VisionModel;
use crate::{BakelensError, Result};

use super::engine::AnalysisEngine;

/// Main entry point for creating analysis engines.
pub struct Bakelens;

impl Bakelens {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> BakelensBuilder {
        BakelensBuilder::new()
    }
}

/// Builder for configuring analysis engines.
///
/// A vision model is required; everything else has defaults: file storage
/// under the platform cache directory, cache capacity 50, production rate
/// limits (10/50/200), identifier `"analysis"`.
pub struct BakelensBuilder {
    model: Option<Arc<dyn VisionModel>>,
    storage: Option<Arc<dyn Storage>>,
    cache_capacity: usize,
    rate_limits: RateLimits,
    identifier: String,
}

impl BakelensBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            storage: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            rate_limits: RateLimits::default(),
            identifier: "analysis".to_string(),
        }
    }

    /// Set the vision model (required).
    pub fn model(mut self, model: Arc<dyn VisionModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the durable storage backend.
    ///
    /// Defaults to [`FileStorage::default_dir`] at build time.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the recipe cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Override the sliding-window rate limits.
    pub fn rate_limits(mut self, limits: RateLimits) -> Self {
        self.rate_limits = limits;
        self
    }

    /// Set the identifier under which requests are rate-limited.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Build the engine.
    ///
    /// Construction does no I/O: the cache and rate-limit windows hydrate
    /// lazily on first use, so a corrupt persisted state can never fail
    /// startup.
    pub fn build(self) -> Result<AnalysisEngine> {
        let model = self.model.ok_or(BakelensError::NoModel)?;
        let storage: Arc<dyn Storage> = match self.storage {
            Some(s) => s,
            None => Arc::new(FileStorage::default_dir()?),
        };
        if self.cache_capacity == 0 {
            return Err(BakelensError::Configuration(
                "cache capacity must be at least 1".into(),
            ));
        }

        let security = SecurityManager::new(storage.clone(), self.rate_limits);
        let cache = RecipeCache::new(storage, self.cache_capacity);

        Ok(AnalysisEngine::new(model, security, cache, self.identifier))
    }
}

impl Default for BakelensBuilder {
    fn default() -> Self {
        Self::new()
    }
}
