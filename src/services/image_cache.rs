//! In-memory cache of fetched background images with LRU eviction.
//!
//! Entries expire after their TTL. Each image source owns its own cache;
//! cached buffers are immutable once stored.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Cached image body
struct CachedImage {
    bytes: Arc<Vec<u8>>,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedImage {
    fn new(bytes: Arc<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            bytes,
            cached_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }
}

struct CacheInner {
    entries: HashMap<String, CachedImage>,
    /// Keys by recency of use (oldest first)
    insertion_order: Vec<String>,
}

/// Thread-safe LRU cache keyed by [`cache_key`]
pub struct ImageCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
    ttl: Duration,
}

impl ImageCache {
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                insertion_order: Vec::new(),
            }),
            max_entries,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Get a cached image if it exists and hasn't expired
    pub fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        let mut inner = self.inner.lock().ok()?;

        if inner.entries.get(key)?.is_expired() {
            inner.entries.remove(key);
            inner.insertion_order.retain(|k| k != key);
            return None;
        }
        let bytes = inner.entries.get(key)?.bytes.clone();

        // Mark as recently used
        inner.insertion_order.retain(|k| k != key);
        inner.insertion_order.push(key.to_string());

        tracing::debug!(cache_key = %key, "Image cache hit");
        Some(bytes)
    }

    /// Store an image, evicting the least recently used entries when full
    pub fn store(&self, key: String, bytes: Arc<Vec<u8>>) {
        if self.max_entries == 0 {
            return;
        }
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        if inner.entries.remove(&key).is_some() {
            inner.insertion_order.retain(|k| k != &key);
        }

        while inner.entries.len() >= self.max_entries && !inner.insertion_order.is_empty() {
            let oldest_key = inner.insertion_order.remove(0);
            inner.entries.remove(&oldest_key);
            tracing::debug!(
                key = %oldest_key,
                cache_size = inner.entries.len(),
                "Image cache: evicted oldest entry"
            );
        }

        tracing::debug!(
            cache_key = %key,
            size_bytes = bytes.len(),
            "Image cache: stored image"
        );
        inner
            .entries
            .insert(key.clone(), CachedImage::new(bytes, self.ttl));
        inner.insertion_order.push(key);
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute a cache key for an image URL.
///
/// The key is the first 16 bytes of the SHA256 of the URL, hex encoded.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"GET|");
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Arc<Vec<u8>> {
        Arc::new(s.as_bytes().to_vec())
    }

    #[test]
    fn test_cache_key_deterministic() {
        assert_eq!(
            cache_key("https://example.com/a.jpg"),
            cache_key("https://example.com/a.jpg")
        );
        assert_eq!(cache_key("https://example.com/a.jpg").len(), 32);
    }

    #[test]
    fn test_cache_key_differs_by_url() {
        assert_ne!(
            cache_key("https://example.com/a.jpg"),
            cache_key("https://example.com/b.jpg")
        );
    }

    #[test]
    fn test_store_and_get() {
        let cache = ImageCache::new(10, 60);
        cache.store("key1".to_string(), bytes("image1"));
        assert_eq!(cache.get("key1"), Some(bytes("image1")));
    }

    #[test]
    fn test_miss() {
        let cache = ImageCache::new(10, 60);
        assert_eq!(cache.get("nonexistent"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ImageCache::new(3, 60);

        cache.store("key1".to_string(), bytes("1"));
        cache.store("key2".to_string(), bytes("2"));
        cache.store("key3".to_string(), bytes("3"));

        // Touch key1 so key2 becomes the oldest
        cache.get("key1");

        cache.store("key4".to_string(), bytes("4"));

        assert!(cache.get("key1").is_some());
        assert!(cache.get("key2").is_none());
        assert!(cache.get("key3").is_some());
        assert!(cache.get("key4").is_some());
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_expiration() {
        let cache = ImageCache::new(10, 0);
        cache.store("key1".to_string(), bytes("1"));

        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get("key1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_update_existing() {
        let cache = ImageCache::new(10, 60);
        cache.store("key1".to_string(), bytes("old"));
        cache.store("key1".to_string(), bytes("new"));

        assert_eq!(cache.get("key1"), Some(bytes("new")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_update_existing_in_full_cache_keeps_others() {
        let cache = ImageCache::new(2, 60);
        cache.store("a".to_string(), bytes("1"));
        cache.store("b".to_string(), bytes("2"));
        cache.store("a".to_string(), bytes("3"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(bytes("3")));
        assert_eq!(cache.get("b"), Some(bytes("2")));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = ImageCache::new(0, 60);
        cache.store("key1".to_string(), bytes("1"));
        assert!(cache.get("key1").is_none());
    }
}
