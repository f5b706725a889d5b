//! Facade over the compute pool and result cache.

use std::sync::{Arc, Mutex, MutexGuard};

use diffweave_core::{DiffLine, ParseRequest, ParsedDiff};

use crate::cache::{cache_key, DiffCache};
use crate::config::ServiceConfig;
use crate::error::PoolError;
use crate::pool::DiffPool;

/// The main entry point: parse requests go through the cache, everything
/// else straight to the pool.
///
/// Only requests carrying both full file contents are cached — results
/// computed without content fall back to per-segment highlighting and are
/// recomputed once the content becomes available.
pub struct DiffService {
    pool: DiffPool,
    cache: Mutex<DiffCache>,
}

impl DiffService {
    /// Must be called within a tokio runtime (the pool spawns its reply
    /// router as a task).
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            pool: DiffPool::new(config.workers, config.engine),
            cache: Mutex::new(DiffCache::new(config.cache_capacity)),
        }
    }

    /// Parse one file's patch, consulting the result cache first.
    pub async fn parse_diff(&self, request: ParseRequest) -> Result<Arc<ParsedDiff>, PoolError> {
        let key = cache_key(
            &request.filename,
            request.previous_filename.as_deref(),
            &request.patch,
        );
        if let Some(hit) = lock(&self.cache).get(&key) {
            return Ok(hit);
        }

        let cacheable = request.old_content.is_some() && request.new_content.is_some();
        let diff = Arc::new(self.pool.parse_diff(request).await?);
        if cacheable {
            lock(&self.cache).insert(key, Arc::clone(&diff));
        }
        Ok(diff)
    }

    /// Fan out a batch of parse requests and await them all.
    pub async fn parse_diff_batch(
        &self,
        requests: Vec<ParseRequest>,
    ) -> Result<Vec<Arc<ParsedDiff>>, PoolError> {
        futures::future::try_join_all(requests.into_iter().map(|r| self.parse_diff(r))).await
    }

    /// Highlight a contiguous file range with full cross-line context.
    pub async fn highlight_lines(
        &self,
        content: String,
        filename: String,
        start_line: u32,
        count: u32,
    ) -> Result<Vec<DiffLine>, PoolError> {
        self.pool.highlight_lines(content, filename, start_line, count).await
    }

    /// Number of cached parse results, for introspection and tests.
    pub fn cached_entries(&self) -> usize {
        lock(&self.cache).len()
    }

    /// Stop all workers and fail pending requests. The cache survives;
    /// lookups still hit, but misses fail with `PoolError::PoolClosed`.
    pub fn terminate(&self) {
        self.pool.terminate();
    }
}

fn lock(cache: &Mutex<DiffCache>) -> MutexGuard<'_, DiffCache> {
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
