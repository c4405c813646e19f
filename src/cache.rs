//! LRU cache for access decisions
//!
//! Decisions are pure over the immutable policy table, so cached results
//! never go stale within a process lifetime.

use crate::engine::Decision;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for a decision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    role: String,
    resource: String,
    action: String,
}

/// LRU cache keyed by (role, resource, action)
pub struct DecisionCache {
    cache: LruCache<CacheKey, Decision>,
}

impl DecisionCache {
    /// Create a cache with the given capacity (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        DecisionCache {
            cache: LruCache::new(capacity),
        }
    }

    /// Get a cached decision
    pub fn get(&mut self, role: &str, resource: &str, action: &str) -> Option<Decision> {
        let key = CacheKey {
            role: role.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        };
        self.cache.get(&key).cloned()
    }

    /// Store a decision
    pub fn put(&mut self, role: &str, resource: &str, action: &str, decision: Decision) {
        let key = CacheKey {
            role: role.to_string(),
            resource: resource.to_string(),
            action: action.to_string(),
        };
        self.cache.put(key, decision);
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of cached decisions
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
