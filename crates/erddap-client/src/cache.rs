//! TTL cache for fetched grid subsets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use fishspot_common::BoundingBox;
use grid_pipeline::ScalarGrid;

/// Time-bounded cache of fetched subsets, keyed by dataset URL and
/// bounding box.
///
/// Expiry is a fixed TTL from fetch time; the pipeline never assumes
/// freshness beyond "most recent timestamp in whatever was fetched", so a
/// stale-but-unexpired entry is always safe to serve.
pub struct GridCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

struct CacheEntry {
    grid: ScalarGrid,
    fetched_at: Instant,
}

impl GridCache {
    /// Create a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache key for a dataset URL and bounding box.
    pub fn key(dataset_url: &str, bbox: &BoundingBox) -> String {
        format!("{}|{}", dataset_url, bbox.cache_key())
    }

    /// Fetch an unexpired entry, removing it if it has aged out.
    pub fn get(&self, key: &str) -> Option<ScalarGrid> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.grid.clone())
            }
            Some(_) => {
                entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert or replace an entry.
    pub fn insert(&self, key: String, grid: ScalarGrid) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                grid,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, e| e.fetched_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit/miss statistics for logs.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// Cache counters.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    /// Cache hit rate in [0, 1].
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ScalarGrid {
        ScalarGrid::new(vec![20.0], vec![-158.0], vec![26.0]).unwrap()
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = GridCache::new(Duration::from_secs(60));
        let bbox = BoundingBox::new(-161.0, 18.5, -155.0, 22.5);
        let key = GridCache::key("https://example/griddap/sst", &bbox);

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), grid());
        assert!(cache.get(&key).is_some());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expiry() {
        let cache = GridCache::new(Duration::from_millis(10));
        let bbox = BoundingBox::new(-161.0, 18.5, -155.0, 22.5);
        let key = GridCache::key("https://example/griddap/sst", &bbox);

        cache.insert(key.clone(), grid());
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_distinct_bboxes_are_distinct_entries() {
        let a = BoundingBox::new(-161.0, 18.5, -155.0, 22.5);
        let b = BoundingBox::new(-160.0, 19.0, -156.0, 22.0);
        assert_ne!(
            GridCache::key("https://example/griddap/sst", &a),
            GridCache::key("https://example/griddap/sst", &b)
        );
    }

    #[test]
    fn test_purge_expired() {
        let cache = GridCache::new(Duration::from_millis(10));
        cache.insert("a".to_string(), grid());
        cache.insert("b".to_string(), grid());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.is_empty());
    }
}
