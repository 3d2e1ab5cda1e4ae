//! Memoized pipeline runs.
//!
//! A completed run is cached under the content hash of the dataset snapshot
//! and a fingerprint of the scoring configuration. Any change to the data
//! changes the snapshot hash, so entries never go stale and carry no TTL.
//!
//! # Performance
//!
//! - Cache hit: O(1) lookup, no store access beyond the snapshot hash
//! - Cache miss: one full pipeline run

use super::{PipelineOutput, SustainabilityPipeline};
use crate::config::{CacheConfig, PipelineConfig};
use crate::error::{Result, SedsError};
use crate::store::EnergyRepository;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use xxhash_rust::xxh3::xxh3_64;

// ============================================================================
// Cache Key
// ============================================================================

/// Key for run cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunCacheKey {
    /// Content hash of the dataset snapshot
    pub snapshot_hash: u64,
    /// Hash of the scoring configuration
    pub config_fingerprint: u64,
}

impl RunCacheKey {
    /// Build the key for a repository snapshot and configuration.
    pub fn new<R: EnergyRepository>(repo: &R, config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            snapshot_hash: repo.snapshot_hash()?,
            config_fingerprint: config_fingerprint(config)?,
        })
    }
}

/// Hash of the canonical JSON form of `config`.
pub fn config_fingerprint(config: &PipelineConfig) -> Result<u64> {
    let bytes = serde_json::to_vec(config)
        .map_err(|e| SedsError::config(format!("fingerprinting configuration: {e}")))?;
    Ok(xxh3_64(&bytes))
}

// ============================================================================
// Cached Entry
// ============================================================================

/// A cached run with metadata.
#[derive(Debug, Clone)]
pub struct CachedRun {
    /// The run output
    pub output: Arc<PipelineOutput>,
    /// When this was computed
    pub computed_at: Instant,
}

impl CachedRun {
    #[must_use]
    pub fn new(output: PipelineOutput) -> Self {
        Self {
            output: Arc::new(output),
            computed_at: Instant::now(),
        }
    }

    /// Get age of this cache entry.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.computed_at.elapsed()
    }
}

// ============================================================================
// Score Cache
// ============================================================================

/// Statistics for cache performance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache lookups
    pub lookups: u64,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Entries evicted
    pub evictions: u64,
}

impl CacheStats {
    /// Get the cache hit rate.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// Thread-safe cache of completed runs.
#[derive(Debug)]
pub struct ScoreCache {
    cache: RwLock<HashMap<RunCacheKey, CachedRun>>,
    max_entries: usize,
    stats: RwLock<CacheStats>,
}

impl ScoreCache {
    /// Create a cache holding at most `max_entries` runs.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Create a cache sized by the `cache` configuration section.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries)
    }

    /// Look up a cached run.
    pub fn get(&self, key: &RunCacheKey) -> Option<Arc<PipelineOutput>> {
        let result = {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            cache.get(key).map(|entry| Arc::clone(&entry.output))
        };

        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.lookups += 1;
        if result.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        result
    }

    /// Store a run, evicting the oldest entries at capacity.
    pub fn put(&self, key: RunCacheKey, output: PipelineOutput) -> Arc<PipelineOutput> {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);

        while cache.len() >= self.max_entries && !cache.contains_key(&key) {
            let Some(oldest_key) = Self::find_oldest_entry(&cache) else {
                break;
            };
            cache.remove(&oldest_key);
            self.stats
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .evictions += 1;
        }

        let entry = CachedRun::new(output);
        let shared = Arc::clone(&entry.output);
        cache.insert(key, entry);
        shared
    }

    fn find_oldest_entry(cache: &HashMap<RunCacheKey, CachedRun>) -> Option<RunCacheKey> {
        cache
            .iter()
            .max_by_key(|(_, entry)| entry.age())
            .map(|(key, _)| *key)
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear all cached entries.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new(16)
    }
}

// ============================================================================
// Cached Pipeline
// ============================================================================

/// A pipeline wrapper that reuses completed runs.
///
/// The cache is shared, so several pipelines (for example one per reloaded
/// snapshot) can draw from the same entries.
pub struct CachedPipeline<R> {
    pipeline: SustainabilityPipeline<R>,
    cache: Arc<ScoreCache>,
}

impl<R: EnergyRepository> CachedPipeline<R> {
    /// Wrap `pipeline` with a fresh cache.
    #[must_use]
    pub fn new(pipeline: SustainabilityPipeline<R>) -> Self {
        Self::with_cache(pipeline, Arc::new(ScoreCache::default()))
    }

    /// Wrap `pipeline` with a shared cache.
    #[must_use]
    pub const fn with_cache(pipeline: SustainabilityPipeline<R>, cache: Arc<ScoreCache>) -> Self {
        Self { pipeline, cache }
    }

    /// Run, or return the cached output for this snapshot and configuration.
    pub fn run(&self) -> Result<Arc<PipelineOutput>> {
        let key = RunCacheKey::new(self.pipeline.repository(), self.pipeline.config())?;
        if let Some(output) = self.cache.get(&key) {
            tracing::info!(snapshot = key.snapshot_hash, "Reusing cached scores");
            return Ok(output);
        }
        let output = self.pipeline.run()?;
        Ok(self.cache.put(key, output))
    }

    #[must_use]
    pub const fn pipeline(&self) -> &SustainabilityPipeline<R> {
        &self.pipeline
    }

    #[must_use]
    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }
}
