//! In-process TTL cache
//!
//! A bounded key/value memo for scraped and resolved content. Constructed at
//! the composition root and shared by reference; all access goes through one
//! mutex so a size-triggered trim cannot race reads.
//!
//! The size bound is opportunistic: when an insert pushes the map past
//! capacity, an arbitrary batch of entries is dropped. This keeps growth
//! bounded without pretending to be an eviction policy.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const MAX_ENTRIES: usize = 1000;
const TRIM_COUNT: usize = 100;

struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self) -> bool {
        match self.expires_at {
            Some(at) => Instant::now() <= at,
            None => true,
        }
    }
}

pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value, optionally expiring after `ttl`.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let mut entries = self.entries.lock();
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );

        if entries.len() > MAX_ENTRIES {
            let doomed: Vec<String> = entries.keys().take(TRIM_COUNT).cloned().collect();
            for key in doomed {
                entries.remove(&key);
            }
        }
    }

    /// Fetch a live value. Expired entries are deleted on read; callers
    /// cannot distinguish expired from never cached.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_before_expiry_miss_after() {
        let cache = TtlCache::new();
        cache.set("k", "v".to_string(), Some(Duration::from_millis(100)));

        assert_eq!(cache.get("k"), Some("v".to_string()));

        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("k"), None);
        // the expired entry is purged by the read, not just hidden
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn entries_without_ttl_do_not_expire() {
        let cache = TtlCache::new();
        cache.set("k", 7u32, None);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), Some(7));
    }

    #[test]
    fn miss_on_absent_key() {
        let cache: TtlCache<String> = TtlCache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn overflow_triggers_trim() {
        let cache = TtlCache::new();
        for i in 0..=MAX_ENTRIES {
            cache.set(&format!("key-{i}"), i, None);
        }
        assert_eq!(cache.len(), MAX_ENTRIES + 1 - TRIM_COUNT);
    }

    #[test]
    fn overwrite_replaces_value_and_ttl() {
        let cache = TtlCache::new();
        cache.set("k", 1, Some(Duration::from_millis(10)));
        cache.set("k", 2, None);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), Some(2));
    }
}
