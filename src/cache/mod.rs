//! LLM response caching with fixed capacity and LRU eviction.

pub mod response_cache;

pub use response_cache::{CacheEntry, CacheStats, ResponseCache, DEFAULT_CAPACITY};
