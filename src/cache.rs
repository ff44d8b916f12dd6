//! Two-level layout cache.
//!
//! The primary map goes from a digit-normalized key to the layout built for
//! it. It holds the layout strongly but its identity only weakly. Identities
//! are kept alive by [`TextHandle`](crate::TextHandle)s held by callers and by a
//! bounded set of recently queried raw strings. Once nothing holds an
//! identity any more, the next sweep drops its layout.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};

use lru::LruCache;

use crate::error::LayoutError;
use crate::identity::{StringIdentity, normalize_digits_into};
use crate::layout::LayoutEntry;

/// Cache counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sweeps: u64,
    /// Slots dropped by sweeps
    pub evicted: u64,
}

struct Slot {
    identity: Weak<StringIdentity>,
    entry: Rc<LayoutEntry>,
}

pub struct LayoutCache {
    slots: HashMap<String, Slot>,
    recent: LruCache<String, Rc<StringIdentity>>,
    /// Reused buffer for the normalized form of the queried string
    lookup_key: String,
    sweep_interval: usize,
    misses_since_sweep: usize,
    stats: CacheStats,
}

impl LayoutCache {
    /// Create a cache that keeps the `retained_strings` most recently queried
    /// strings alive and sweeps dead slots every `sweep_interval` misses.
    pub fn new(retained_strings: usize, sweep_interval: usize) -> Self {
        Self {
            slots: HashMap::new(),
            recent: LruCache::new(NonZeroUsize::new(retained_strings).unwrap_or(NonZeroUsize::MIN)),
            lookup_key: String::with_capacity(64),
            sweep_interval: sweep_interval.max(1),
            misses_since_sweep: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up the layout for `s`, calling `build` to create it on a miss.
    ///
    /// If `build` fails nothing is inserted.
    pub fn resolve<F>(
        &mut self,
        s: &str,
        build: F,
    ) -> Result<(Rc<LayoutEntry>, Rc<StringIdentity>), LayoutError>
    where
        F: FnOnce() -> Result<LayoutEntry, LayoutError>,
    {
        normalize_digits_into(&mut self.lookup_key, s);

        if let Some(slot) = self.slots.get_mut(self.lookup_key.as_str()) {
            self.stats.hits += 1;
            let identity = match slot.identity.upgrade() {
                Some(identity) => identity,
                None => {
                    // Swept lazily: the layout is still valid, only its
                    // identity was dropped
                    let identity = Rc::new(StringIdentity::new(s));
                    slot.identity = Rc::downgrade(&identity);
                    slot.entry.set_identity(&identity);
                    identity
                }
            };
            let entry = Rc::clone(&slot.entry);
            self.register(s, &identity);
            return Ok((entry, identity));
        }

        self.stats.misses += 1;
        let entry = Rc::new(build()?);
        let identity = Rc::new(StringIdentity::new(s));
        entry.set_identity(&identity);
        log::debug!(
            "Cached layout for {:?} ({} glyphs, advance {})",
            identity.text(),
            entry.glyphs().len(),
            entry.advance()
        );

        self.slots.insert(
            identity.key().to_owned(),
            Slot {
                identity: Rc::downgrade(&identity),
                entry: Rc::clone(&entry),
            },
        );
        self.register(s, &identity);

        self.misses_since_sweep += 1;
        if self.misses_since_sweep >= self.sweep_interval {
            self.sweep();
        }
        Ok((entry, identity))
    }

    /// Keep `identity` alive while `s` stays among the recently queried strings.
    fn register(&mut self, s: &str, identity: &Rc<StringIdentity>) {
        // `get` also marks the string as recently used
        let stale = self
            .recent
            .get(s)
            .is_none_or(|existing| !Rc::ptr_eq(existing, identity));
        if stale {
            self.recent.put(s.to_owned(), Rc::clone(identity));
        }
    }

    /// Drop every layout whose identity is no longer reachable.
    ///
    /// Returns the number of dropped layouts.
    pub fn sweep(&mut self) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|_, slot| slot.identity.strong_count() > 0);
        let evicted = before - self.slots.len();

        self.misses_since_sweep = 0;
        self.stats.sweeps += 1;
        self.stats.evicted += evicted as u64;
        log::debug!(
            "Layout cache sweep dropped {} of {} entries",
            evicted,
            before
        );
        evicted
    }

    /// Whether a layout for `s` (or a string differing only in digits) is cached.
    pub fn contains(&mut self, s: &str) -> bool {
        normalize_digits_into(&mut self.lookup_key, s);
        self.slots.contains_key(self.lookup_key.as_str())
    }

    /// Forget the recently queried strings, so only caller-held handles keep
    /// layouts alive. Layouts are dropped by the next sweep.
    pub fn release_recent(&mut self) {
        self.recent.clear();
    }

    /// Number of cached layouts, including ones awaiting a sweep.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_layout(_: &str) -> Result<LayoutEntry, LayoutError> {
        Ok(LayoutEntry::empty())
    }

    #[test]
    fn test_digit_variants_share_one_slot() {
        let mut cache = LayoutCache::new(8, 100);
        let (a, _) = cache.resolve("Score 12", || dummy_layout("Score 12")).unwrap();
        let (b, _) = cache
            .resolve("Score 99", || panic!("should be a cache hit"))
            .unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_failed_build_inserts_nothing() {
        let mut cache = LayoutCache::new(8, 100);
        let result = cache.resolve("x", || {
            Err(LayoutError::Provider(glyphstring_fonts::ProviderError::NoFont(
                glyphstring_fonts::FontStyle::PLAIN,
            )))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
        assert!(!cache.contains("x"));
    }

    #[test]
    fn test_sweep_drops_only_unreachable_layouts() {
        let mut cache = LayoutCache::new(1, 100);
        let (_, kept) = cache.resolve("kept", || dummy_layout("kept")).unwrap();
        cache.resolve("a", || dummy_layout("a")).unwrap();
        // Capacity 1: "b" pushes "a" out of the recent set
        cache.resolve("b", || dummy_layout("b")).unwrap();

        assert_eq!(cache.sweep(), 1);
        assert!(cache.contains("kept"));
        assert!(cache.contains("b"));
        assert!(!cache.contains("a"));
        drop(kept);
    }

    #[test]
    fn test_dead_identity_is_revived_without_rebuild() {
        let mut cache = LayoutCache::new(1, 100);
        let (first, _) = cache.resolve("a", || dummy_layout("a")).unwrap();
        cache.release_recent();
        assert!(first.identity().is_none());

        let (second, identity) = cache.resolve("a", || panic!("layout must be reused")).unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(&second.identity().unwrap(), &identity));
    }

    #[test]
    fn test_automatic_sweep_interval() {
        let mut cache = LayoutCache::new(1, 2);
        cache.resolve("a", || dummy_layout("a")).unwrap();
        cache.resolve("b", || dummy_layout("b")).unwrap();
        assert_eq!(cache.stats().sweeps, 1);
        assert_eq!(cache.stats().evicted, 1);
        assert_eq!(cache.len(), 1);
    }
}
