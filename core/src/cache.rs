use dashmap::DashMap;

use crate::messages::CrackResponse;

/// Identifies a crack request whose result can be reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The target digest, in lowercase hexadecimal.
    pub digest: String,
    pub max_length: u8,
    /// The inclusive range of counters, `None` for a full search.
    pub range: Option<(u64, u64)>,
}

/// Storage for completed crack results.
///
/// Only completed results are stored: two identical requests running at the
/// same time both compute, and the first one to finish fills the cache.
pub trait ResultCache: Send + Sync {
    /// Returns the stored result for this key, if any.
    fn get(&self, key: &CacheKey) -> Option<CrackResponse>;

    /// Stores a result. An entry that is already set is never overwritten.
    fn set(&self, key: CacheKey, value: CrackResponse);
}

/// An in-memory cache living as long as the worker process.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CrackResponse>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CrackResponse> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: CacheKey, value: CrackResponse) {
        self.entries.entry(key).or_insert(value);
    }
}
