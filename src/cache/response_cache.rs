//! Prompt → answer cache with LRU eviction.
//!
//! Fronts the remote completion call so repeated questions are answered
//! locally. The cache key is the fully composed prompt. Capacity is fixed at
//! construction; entries live in a small vector and every operation is a
//! linear scan, which is the right trade-off for a handful of slots.
//!
//! Recency is tracked with a per-cache logical clock that advances on every
//! touch, so `last_used` values are strictly increasing within a run and
//! eviction order never depends on timer resolution.

use tracing::debug;

/// Default number of cached answers.
pub const DEFAULT_CAPACITY: usize = 5;

/// A single cached answer.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The fully composed prompt.
    pub key: String,
    /// The answer returned for that prompt.
    pub value: String,
    /// Logical timestamp of the last access (insert, update, or hit).
    pub last_used: u64,
}

/// Bounded LRU cache of completion answers.
///
/// Not internally synchronized: callers sharing one instance across threads
/// wrap it in a mutex, since `get` mutates recency bookkeeping.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Vec<CacheEntry>,
    capacity: usize,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` answers.
    ///
    /// `capacity` is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            clock: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a cached answer, refreshing its recency on hit.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = self.tick();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.last_used = now;
                self.hits = self.hits.saturating_add(1);
                debug!(key_len = key.len(), "Response cache hit");
                Some(entry.value.clone())
            }
            None => {
                self.misses = self.misses.saturating_add(1);
                None
            }
        }
    }

    /// Store an answer.
    ///
    /// An existing key is updated in place. Otherwise the answer is appended
    /// while there is room, or overwrites the least recently used slot.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let now = self.tick();

        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            entry.last_used = now;
            return;
        }

        if self.entries.len() < self.capacity {
            self.entries.push(CacheEntry {
                key,
                value,
                last_used: now,
            });
            return;
        }

        let slot = self.lru_index();
        debug!(slot, "Evicting LRU response cache entry");
        self.evictions = self.evictions.saturating_add(1);
        self.entries[slot] = CacheEntry {
            key,
            value,
            last_used: now,
        };
    }

    /// Whether `key` is cached, without touching recency or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Return aggregate statistics about the cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Return the number of entries currently in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // -- private helpers ---------------------------------------------------

    fn tick(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    /// Index of the entry with the oldest `last_used`; ties go to the lowest
    /// index. Only called when the cache is full, so never empty.
    fn lru_index(&self) -> usize {
        let mut oldest = 0;
        for (i, e) in self.entries.iter().enumerate().skip(1) {
            if e.last_used < self.entries[oldest].last_used {
                oldest = i;
            }
        }
        oldest
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub entries: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries overwritten to make room.
    pub evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_miss() {
        let mut cache = ResponseCache::default();
        assert!(cache.get("p").is_none());
        cache.put("p", "r");
        assert_eq!(cache.get("p"), Some("r".into()));
    }

    #[test]
    fn test_cache_lru_eviction_respects_refresh() {
        let mut cache = ResponseCache::new(2);
        cache.put("a", "1");
        cache.put("b", "2");
        assert_eq!(cache.get("a"), Some("1".into()));
        cache.put("c", "3");
        assert!(cache.get("b").is_none(), "b was least recently used");
        assert_eq!(cache.get("a"), Some("1".into()));
        assert_eq!(cache.get("c"), Some("3".into()));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_put_existing_key_updates_in_place() {
        let mut cache = ResponseCache::default();
        cache.put("p", "r1");
        let before = cache.len();
        cache.put("p", "r2");
        assert_eq!(cache.get("p"), Some("r2".into()));
        assert_eq!(cache.len(), before);
    }

    #[test]
    fn test_put_existing_key_refreshes_recency() {
        let mut cache = ResponseCache::new(2);
        cache.put("a", "1");
        cache.put("b", "2");
        cache.put("a", "1b");
        cache.put("c", "3");
        assert!(!cache.contains("b"));
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let mut cache = ResponseCache::default();
        for i in 0..20 {
            cache.put(format!("k{i}"), format!("v{i}"));
            assert!(cache.len() <= DEFAULT_CAPACITY);
        }
        assert_eq!(cache.len(), DEFAULT_CAPACITY);
        // The five most recent survive.
        for i in 15..20 {
            assert!(cache.contains(&format!("k{i}")));
        }
    }

    #[test]
    fn test_eviction_overwrites_oldest_slot() {
        let mut cache = ResponseCache::new(3);
        cache.put("k0", "v0");
        cache.put("k1", "v1");
        cache.put("k2", "v2");
        let _ = cache.get("k0");
        cache.put("k3", "v3");
        assert!(!cache.contains("k1"));
        assert_eq!(cache.entries[1].key, "k3");
    }

    #[test]
    fn test_lru_index_tie_goes_to_lowest_index() {
        let mut cache = ResponseCache::new(3);
        cache.put("k0", "v0");
        cache.put("k1", "v1");
        cache.put("k2", "v2");
        for e in &mut cache.entries {
            e.last_used = 7;
        }
        assert_eq!(cache.lru_index(), 0);
    }

    #[test]
    fn test_timestamps_increase() {
        let mut cache = ResponseCache::new(2);
        cache.put("a", "1");
        let t1 = cache.entries[0].last_used;
        let _ = cache.get("a");
        let t2 = cache.entries[0].last_used;
        assert!(t2 > t1);
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = ResponseCache::new(1);
        cache.put("k1", "r1");
        let _ = cache.get("k1");
        let _ = cache.get("k1");
        let _ = cache.get("nope");
        cache.put("k2", "r2");
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = ResponseCache::default();
        cache.put("k1", "r1");
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("k1").is_none());
    }

    #[test]
    fn test_capacity_zero_clamped() {
        let mut cache = ResponseCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.put("a", "1");
        cache.put("b", "2");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some("2".into()));
    }

    #[test]
    fn test_contains_does_not_count_as_lookup() {
        let mut cache = ResponseCache::default();
        cache.put("a", "1");
        assert!(cache.contains("a"));
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
    }
}
