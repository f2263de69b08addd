// SPDX-License-Identifier: LGPL-3.0-only
//! Bounded in-memory cache of rendered icons.

use lru::LruCache;
use parking_lot::Mutex;

use crate::icon::image::{Color, IconImage, IconSize};

/// Identity of one rendered image.
///
/// A missing tint is its own key component, so untinted and tinted renders
/// of the same icon never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Icon name.
    pub name: String,
    /// Rendered size.
    pub size: IconSize,
    /// Tint color, if any.
    pub tint: Option<Color>,
}

impl CacheKey {
    /// Create a new cache key.
    pub fn new(name: impl Into<String>, size: IconSize, tint: Option<Color>) -> Self {
        Self {
            name: name.into(),
            size,
            tint,
        }
    }
}

struct CacheState {
    /// Entries ordered from most to least recently accessed.
    entries: LruCache<CacheKey, IconImage>,
    limit: usize,
}

/// Thread-safe cache of rendered icons with batch LRU eviction.
///
/// When an insertion pushes the cache over its limit, the least recently
/// accessed entries are dropped until only `limit - slack` remain, so a burst
/// of misses does not pay for an eviction on every insert. The newest entry
/// always survives.
pub struct IconCache {
    state: Mutex<CacheState>,
    min_limit: usize,
    slack: usize,
}

impl IconCache {
    /// Create a cache holding at most `limit` images.
    ///
    /// `limit` is clamped to `min_limit`, which is itself at least one.
    pub fn new(limit: usize, min_limit: usize, slack: usize) -> Self {
        let min_limit = min_limit.max(1);
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                limit: limit.max(min_limit),
            }),
            min_limit,
            slack,
        }
    }

    /// Get a cached image, marking it as most recently accessed.
    pub fn get(&self, key: &CacheKey) -> Option<IconImage> {
        let mut state = self.state.lock();
        state.entries.get(key).cloned()
    }

    /// Store an image, replacing any entry under the same key.
    ///
    /// Returns the number of entries evicted to get back under the limit.
    pub fn insert(&self, key: CacheKey, image: IconImage) -> usize {
        let mut state = self.state.lock();
        state.entries.put(key, image);
        self.evict(&mut state)
    }

    /// Whether an entry exists, without touching its recency.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.state.lock().entries.contains(key)
    }

    /// Change the limit, evicting immediately if the cache is now too large.
    ///
    /// Returns the effective limit after clamping.
    pub fn set_limit(&self, limit: usize) -> usize {
        let limit = limit.max(self.min_limit);
        let mut state = self.state.lock();
        state.limit = limit;
        self.evict(&mut state);
        limit
    }

    /// Current limit.
    pub fn limit(&self) -> usize {
        self.state.lock().limit
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the cache holds no images.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Cache keys from most to least recently accessed.
    pub fn keys(&self) -> Vec<CacheKey> {
        let state = self.state.lock();
        state.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let removed = state.entries.len();
        state.entries.clear();
        removed
    }

    /// Drop every entry rendered from icon `name`. Returns how many were removed.
    pub fn clear_icon(&self, name: &str) -> usize {
        let mut state = self.state.lock();
        let stale: Vec<CacheKey> = state
            .entries
            .iter()
            .filter(|(key, _)| key.name == name)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            state.entries.pop(key);
        }
        stale.len()
    }

    fn evict(&self, state: &mut CacheState) -> usize {
        let len = state.entries.len();
        if len <= state.limit {
            return 0;
        }

        let keep = state.limit.saturating_sub(self.slack).max(1);
        let mut evicted = 0;
        while state.entries.len() > keep {
            if state.entries.pop_lru().is_none() {
                break;
            }
            evicted += 1;
        }

        log::debug!(
            "IconCache: evicted {} of {} entries (limit {})",
            evicted,
            len,
            state.limit
        );
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, side: u32) -> CacheKey {
        CacheKey::new(name, IconSize::square(side), None)
    }

    fn image() -> IconImage {
        IconImage::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_limit_is_clamped_to_floor() {
        let cache = IconCache::new(3, 10, 0);
        assert_eq!(cache.limit(), 10);
        assert_eq!(cache.set_limit(4), 10);
        assert_eq!(cache.set_limit(25), 25);
    }

    #[test]
    fn test_eviction_removes_oldest_first() {
        let cache = IconCache::new(3, 1, 0);
        cache.insert(key("a", 16), image());
        cache.insert(key("b", 16), image());
        cache.insert(key("c", 16), image());

        // Touch "a" so "b" becomes the oldest.
        assert!(cache.get(&key("a", 16)).is_some());

        assert_eq!(cache.insert(key("d", 16), image()), 1);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&key("b", 16)));
        assert!(cache.contains(&key("a", 16)));
        assert!(cache.contains(&key("c", 16)));
        assert!(cache.contains(&key("d", 16)));
    }

    #[test]
    fn test_eviction_reclaims_slack() {
        let cache = IconCache::new(10, 1, 4);
        for side in 0..10 {
            cache.insert(key("icon", side), image());
        }
        assert_eq!(cache.len(), 10);

        // One over the limit drops back to limit - slack.
        assert_eq!(cache.insert(key("icon", 100), image()), 5);
        assert_eq!(cache.len(), 6);
        assert!(cache.contains(&key("icon", 100)));
        assert!(!cache.contains(&key("icon", 0)));
        assert!(cache.contains(&key("icon", 9)));
    }

    #[test]
    fn test_newest_entry_survives_large_slack() {
        let cache = IconCache::new(2, 1, 10);
        cache.insert(key("a", 16), image());
        cache.insert(key("b", 16), image());
        cache.insert(key("c", 16), image());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key("c", 16)));
    }

    #[test]
    fn test_reinsert_replaces_and_refreshes() {
        let cache = IconCache::new(2, 1, 0);
        cache.insert(key("a", 16), image());
        cache.insert(key("b", 16), image());
        cache.insert(key("a", 16), IconImage::empty());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a", 16)), Some(IconImage::empty()));

        cache.insert(key("c", 16), image());
        assert!(!cache.contains(&key("b", 16)));
        assert!(cache.contains(&key("a", 16)));
    }

    #[test]
    fn test_shrinking_limit_evicts_immediately() {
        let cache = IconCache::new(50, 5, 0);
        for side in 0..20 {
            cache.insert(key("icon", side), image());
        }
        assert_eq!(cache.set_limit(8), 8);
        assert!(cache.len() <= 8);
        assert!(cache.contains(&key("icon", 19)));
    }

    #[test]
    fn test_clear_icon_is_scoped() {
        let cache = IconCache::new(10, 1, 0);
        cache.insert(key("home", 16), image());
        cache.insert(key("home", 32), image());
        cache.insert(CacheKey::new("home", IconSize::square(16), Some(Color::WHITE)), image());
        cache.insert(key("homepage", 16), image());

        assert_eq!(cache.clear_icon("home"), 3);
        assert_eq!(cache.keys(), vec![key("homepage", 16)]);
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_tint_is_part_of_key() {
        let cache = IconCache::new(10, 1, 0);
        cache.insert(key("home", 16), image());
        assert!(!cache.contains(&CacheKey::new("home", IconSize::square(16), Some(Color::BLACK))));
    }
}
