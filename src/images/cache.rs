//! LRU cache for prepared images.

use std::collections::HashMap;

/// Maximum number of images to keep in cache
const MAX_CACHE_SIZE: usize = 50;

struct Entry<T> {
    value: T,
    last_access: u64,
}

/// Least-recently-used cache keyed by image URL
pub struct ImageCache<T> {
    entries: HashMap<String, Entry<T>>,
    capacity: usize,
    clock: u64,
}

impl<T> Default for ImageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ImageCache<T> {
    /// Create a new image cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_CACHE_SIZE)
    }

    /// Create a cache holding at most `capacity` images.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Store an image, evicting the least recently used one if full.
    pub fn insert(&mut self, url: &str, value: T) {
        if !self.entries.contains_key(url) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        let last_access = self.tick();
        self.entries
            .insert(url.to_string(), Entry { value, last_access });
    }

    /// Get an image, marking it as recently used.
    pub fn get_mut(&mut self, url: &str) -> Option<&mut T> {
        let now = self.tick();
        self.entries.get_mut(url).map(|entry| {
            entry.last_access = now;
            &mut entry.value
        })
    }

    /// Check if an image is cached.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_access)
            .map(|(k, _)| k.clone())
        {
            self.entries.remove(&oldest);
        }
    }

    /// Clear the entire cache.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = ImageCache::with_capacity(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        // Touch "a" so "b" becomes the oldest
        assert_eq!(cache.get_mut("a"), Some(&mut 1));
        cache.insert("c", 3);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let mut cache = ImageCache::with_capacity(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_mut("a"), Some(&mut 10));
        assert!(cache.contains("b"));
    }
}
