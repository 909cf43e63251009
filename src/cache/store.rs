//! Cache Store Module
//!
//! Size-bounded store of decoded buffers with ordered eviction.
//!
//! Footprints are accounted in bytes so the running total stays exact;
//! kilobyte views divide by 1000.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::audio::{AudioBuffer, AudioSource};
use crate::cache::{estimate_bytes, CacheEntry, CacheStats};

/// Comparator deciding which entries are evicted first (smallest first).
pub type EvictionOrder = Arc<dyn Fn(&CacheEntry, &CacheEntry) -> Ordering + Send + Sync>;

/// Oldest admission first.
pub fn oldest_first(a: &CacheEntry, b: &CacheEntry) -> Ordering {
    a.timestamp().cmp(&b.timestamp())
}

// == Admission ==
/// Outcome of [`CacheStore::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Entry appended to the store
    Admitted,
    /// Source already has an entry; store unchanged
    AlreadyCached,
    /// Entry alone exceeds the capacity
    TooLarge,
    /// Eviction did not leave enough room
    NoRoom,
}

// == Cache Store ==
/// Ordered collection of cache entries plus a running total footprint.
pub struct CacheStore {
    /// Entries in admission order until an eviction pass re-sorts them
    entries: Vec<CacheEntry>,
    /// Sum of the estimated size of every live entry
    cached_bytes: u64,
    /// Capacity in bytes
    max_bytes: u64,
    /// Default eviction comparator
    order: EvictionOrder,
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_cache_size` - Capacity in kilobytes
    pub fn new(max_cache_size: u64) -> Self {
        Self {
            entries: Vec::new(),
            cached_bytes: 0,
            max_bytes: max_cache_size.saturating_mul(1000),
            order: Arc::new(oldest_first),
            stats: CacheStats::new(),
        }
    }

    /// Replaces the default oldest-first eviction order.
    pub fn with_eviction_order(mut self, order: EvictionOrder) -> Self {
        self.order = order;
        self
    }

    // == Lookup ==
    /// Returns the first entry whose source equals `source`.
    ///
    /// Linear scan; records a hit or a miss.
    pub fn lookup(&mut self, source: &AudioSource) -> Option<&CacheEntry> {
        match self.entries.iter().position(|e| e.source() == source) {
            Some(index) => {
                self.stats.record_hit();
                Some(&self.entries[index])
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Checks for an entry without touching the statistics.
    pub fn contains(&self, source: &AudioSource) -> bool {
        self.entries.iter().any(|e| e.source() == source)
    }

    // == Admit ==
    /// Inserts a decoded buffer, evicting older entries if needed.
    ///
    /// Never fails loudly: oversized entries and entries that still do not
    /// fit after eviction are dropped and reported through the return value.
    pub fn admit(
        &mut self,
        source: AudioSource,
        buffer: Arc<AudioBuffer>,
        now: Duration,
    ) -> Admission {
        if self.contains(&source) {
            debug!(%source, "source already cached, keeping existing entry");
            return Admission::AlreadyCached;
        }

        let size = estimate_bytes(&buffer);
        if size > self.max_bytes {
            debug!(%source, size, max = self.max_bytes, "buffer larger than cache, not cached");
            self.stats.record_rejection();
            return Admission::TooLarge;
        }

        if self.cached_bytes + size >= self.max_bytes {
            // size - (max - cached), without underflow
            let target = (self.cached_bytes + size).saturating_sub(self.max_bytes);
            self.evict_to_free(target);
        }

        if self.cached_bytes + size < self.max_bytes {
            self.cached_bytes += size;
            self.entries.push(CacheEntry::new(source, buffer, now));
            self.stats.record_admission();
            debug!(size, cached = self.cached_bytes, "buffer cached");
            Admission::Admitted
        } else {
            debug!(%source, size, cached = self.cached_bytes, "no room after eviction, not cached");
            self.stats.record_rejection();
            Admission::NoRoom
        }
    }

    // == Evict ==
    /// Frees at least `target_bytes` using the store's eviction order.
    ///
    /// Returns the number of bytes freed.
    pub fn evict_to_free(&mut self, target_bytes: u64) -> u64 {
        let order = Arc::clone(&self.order);
        self.evict_to_free_by(target_bytes, |a, b| order(a, b))
    }

    /// Frees at least `target_bytes`, removing whole entries in `compare` order.
    ///
    /// May free more than asked. Empties the store when the target exceeds
    /// its content. Returns the number of bytes freed.
    pub fn evict_to_free_by<F>(&mut self, target_bytes: u64, mut compare: F) -> u64
    where
        F: FnMut(&CacheEntry, &CacheEntry) -> Ordering,
    {
        self.entries.sort_by(|a, b| compare(a, b));

        let mut freed = 0;
        let mut count = 0;
        for entry in &self.entries {
            if freed >= target_bytes {
                break;
            }
            freed += entry.size_bytes();
            count += 1;
        }

        self.entries.drain(..count);
        self.cached_bytes -= freed;
        self.stats.record_evictions(count);
        if count > 0 {
            debug!(count, freed, target = target_bytes, "evicted cache entries");
        }
        freed
    }

    // == Flush ==
    /// Removes every entry and resets the running total.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.cached_bytes = 0;
    }

    // == Accessors ==
    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn cached_bytes(&self) -> u64 {
        self.cached_bytes
    }

    /// Running total in kilobytes.
    pub fn cached_size_kb(&self) -> f64 {
        self.cached_bytes as f64 / 1000.0
    }

    pub fn max_cache_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Re-derives the total from the live entries.
    pub fn recompute_bytes(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| estimate_bytes(e.buffer()))
            .sum()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.cached_size_kb = self.cached_size_kb();
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("cached_bytes", &self.cached_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
