//! Memoized bundle generation.

use std::path::Path;
use std::sync::Arc;

use satchel_config::BundleOptions;
use satchel_graph::{DependencyGraphWalker, Runtime};

use crate::assemble::{BundleAssembler, BundleResult};
use crate::cache::{BundleCache, CacheConfig, CacheStats, compute_cache_key};
use crate::error::{BundleError, Result};

/// Cache of serialized [`BundleResult`]s keyed by [`compute_cache_key`].
pub type ResultCache = BundleCache<String, Arc<str>>;

/// Walks, assembles and memoizes bundles.
///
/// One `Bundler` owns one result cache. Clone the cache into several
/// bundlers with [`Bundler::with_cache`] to share it.
#[derive(Debug, Clone)]
pub struct Bundler {
    walker: DependencyGraphWalker,
    assembler: BundleAssembler,
    cache: ResultCache,
}

impl Bundler {
    /// Bundler with an unbounded, non-expiring cache.
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self::with_cache(runtime, BundleCache::new(CacheConfig::default()))
    }

    pub fn with_cache(runtime: Arc<dyn Runtime>, cache: ResultCache) -> Self {
        Self {
            walker: DependencyGraphWalker::new(Arc::clone(&runtime)),
            assembler: BundleAssembler::new(runtime),
            cache,
        }
    }

    /// Produce the bundle for `entry`, reusing a memoized result when the
    /// same entry and options were bundled before.
    ///
    /// A cached result is returned without touching the filesystem, so edits
    /// made after the first call are not seen until [`clear_cache`](Self::clear_cache).
    ///
    /// # Errors
    ///
    /// Every failure is wrapped in [`BundleError::Generate`] naming the entry.
    pub async fn generate_bundle(
        &self,
        entry: impl AsRef<Path>,
        options: &BundleOptions,
    ) -> Result<BundleResult> {
        let entry = entry.as_ref();
        self.generate(entry, options)
            .await
            .map_err(|source| BundleError::Generate {
                entry: entry.to_path_buf(),
                source: Box::new(source),
            })
    }

    #[tracing::instrument(skip(self, options), fields(entry = %entry.display()))]
    async fn generate(&self, entry: &Path, options: &BundleOptions) -> Result<BundleResult> {
        let key = compute_cache_key(entry, options)?;

        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_str::<BundleResult>(&cached) {
                Ok(result) => {
                    tracing::debug!(hash = %result.hash, "bundle cache hit");
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable cached bundle: {}", e);
                    self.cache.remove(&key);
                }
            }
        }

        let dependencies = self.walker.walk(entry, options).await?;
        let Some(entry_path) = dependencies.entry() else {
            return Err(BundleError::NoDependencies {
                entry: entry.to_path_buf(),
            });
        };

        let result = self
            .assembler
            .assemble(entry_path, &dependencies, options)
            .await?;

        let serialized: Arc<str> = serde_json::to_string(&result)?.into();
        self.cache.insert(key, serialized);

        Ok(result)
    }

    /// Forget every memoized bundle.
    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::debug!("bundle cache cleared");
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
