//! Content-addressed result cache.
//!
//! Keys are SHA-256 over the length-framed request identity
//! `(filename, previous_filename, patch)`, so a re-pushed branch with the
//! same patch text hits without re-parsing. Eviction is batched: when the
//! map reaches capacity, the oldest ~20% of entries go at once, trading
//! per-hit LRU bookkeeping for cheap steady-state lookups.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use diffweave_core::ParsedDiff;

pub type CacheKey = [u8; 32];

/// Stable hash of a parse request's identity.
///
/// Length framing keeps `("ab", "c")` distinct from `("a", "bc")`.
pub fn cache_key(filename: &str, previous_filename: Option<&str>, patch: &str) -> CacheKey {
    let mut hasher = Sha256::new();
    for part in [filename, previous_filename.unwrap_or(""), patch] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.finalize().into()
}

/// Bounded insertion-ordered map of parsed diffs.
pub struct DiffCache {
    capacity: usize,
    entries: HashMap<CacheKey, Arc<ParsedDiff>>,
    order: VecDeque<CacheKey>,
}

impl DiffCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<ParsedDiff>> {
        self.entries.get(key).cloned()
    }

    /// Insert an entry, evicting the oldest batch at capacity.
    ///
    /// Re-inserting an existing key refreshes the value without disturbing
    /// its age.
    pub fn insert(&mut self, key: CacheKey, diff: Arc<ParsedDiff>) {
        if self.entries.contains_key(&key) {
            self.entries.insert(key, diff);
            return;
        }
        if self.entries.len() >= self.capacity {
            self.evict_oldest_batch();
        }
        self.order.push_back(key);
        self.entries.insert(key, diff);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest_batch(&mut self) {
        let target = (self.capacity / 5).max(1);
        let mut evicted = 0;
        while evicted < target {
            let Some(key) = self.order.pop_front() else { break };
            if self.entries.remove(&key).is_some() {
                evicted += 1;
            }
        }
        debug!(evicted, remaining = self.entries.len(), "evicted oldest cache batch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff() -> Arc<ParsedDiff> {
        Arc::new(ParsedDiff { hunks: Vec::new() })
    }

    fn key(n: u8) -> CacheKey {
        let mut k = [0u8; 32];
        k[0] = n;
        k
    }

    #[test]
    fn key_is_stable_and_framed() {
        assert_eq!(cache_key("a.rs", None, "patch"), cache_key("a.rs", None, "patch"));
        assert_ne!(cache_key("a.rs", None, "patch"), cache_key("a.rs", Some("b.rs"), "patch"));
        assert_ne!(cache_key("ab", Some("c"), ""), cache_key("a", Some("bc"), ""));
    }

    #[test]
    fn get_returns_inserted_entry() {
        let mut cache = DiffCache::new(10);
        cache.insert(key(1), diff());
        assert!(cache.get(&key(1)).is_some());
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn overflow_evicts_oldest_fifth() {
        let mut cache = DiffCache::new(10);
        for n in 0..10 {
            cache.insert(key(n), diff());
        }
        cache.insert(key(10), diff());

        // 2 oldest evicted (20% of 10), one new entry added.
        assert_eq!(cache.len(), 9);
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_none());
        assert!(cache.get(&key(2)).is_some());
        assert!(cache.get(&key(10)).is_some());
    }

    #[test]
    fn reinsert_does_not_duplicate_order() {
        let mut cache = DiffCache::new(3);
        cache.insert(key(1), diff());
        cache.insert(key(1), diff());
        cache.insert(key(2), diff());
        cache.insert(key(3), diff());
        assert_eq!(cache.len(), 3);

        // Next insert evicts exactly one entry (capacity/5 rounds up to 1).
        cache.insert(key(4), diff());
        assert_eq!(cache.len(), 3);
        assert!(cache.get(&key(1)).is_none());
    }
}
