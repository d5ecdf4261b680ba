//! Decoded-slide cache.
//!
//! Owned by one renderer for one presentation session and dropped with it;
//! there is no process-wide cache.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::types::SlideId;

/// Least-recently-used map from slide to decoded content.
#[derive(Debug)]
pub struct SlideCache<V> {
    entries: LruCache<SlideId, V>,
}

impl<V> SlideCache<V> {
    /// Create a cache holding at most `capacity` slides (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Look up a slide, marking it most recently used.
    pub fn get(&mut self, slide: &SlideId) -> Option<&V> {
        self.entries.get(slide)
    }

    /// Store decoded content, evicting the least recently used slide if full.
    pub fn put(&mut self, slide: SlideId, value: V) {
        if !self.entries.contains(&slide) && self.entries.len() == self.entries.cap().get() {
            if let Some((evicted, _)) = self.entries.pop_lru() {
                tracing::debug!("Evicted {} from slide cache", evicted);
            }
        }
        self.entries.put(slide, value);
    }

    /// Whether a slide is cached, without touching its recency.
    pub fn contains(&self, slide: &SlideId) -> bool {
        self.entries.contains(slide)
    }

    /// Number of cached slides.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached slide.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = SlideCache::new(2);
        cache.put(SlideId::new("a"), 1);
        cache.put(SlideId::new("b"), 2);
        // touch a so b becomes the eviction candidate
        assert_eq!(cache.get(&SlideId::new("a")), Some(&1));
        cache.put(SlideId::new("c"), 3);

        assert!(cache.contains(&SlideId::new("a")));
        assert!(!cache.contains(&SlideId::new("b")));
        assert!(cache.contains(&SlideId::new("c")));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let mut cache = SlideCache::new(0);
        cache.put(SlideId::new("a"), ());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces_existing_entry() {
        let mut cache = SlideCache::new(4);
        cache.put(SlideId::new("a"), 1);
        cache.put(SlideId::new("a"), 5);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&SlideId::new("a")), Some(&5));
    }
}
