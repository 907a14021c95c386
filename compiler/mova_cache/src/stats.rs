//! Cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, bumped with relaxed atomics.
#[derive(Default)]
pub(crate) struct Counters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub inserts: AtomicU64,
    pub rejected: AtomicU64,
    pub evictions: AtomicU64,
    pub invalidations: AtomicU64,
    pub sweeps: AtomicU64,
}

impl Counters {
    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(u64::try_from(n).unwrap_or(u64::MAX), Ordering::Relaxed);
    }
}

/// A point-in-time copy of the cache counters.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    /// Results not stored: absent, `Unknown`, or computed from a stale tree.
    pub rejected: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub sweeps: u64,
    pub entries: usize,
    pub indexed_types: usize,
}

impl CacheStats {
    pub(crate) fn load(counters: &Counters, entries: usize, indexed_types: usize) -> Self {
        let get = |c: &AtomicU64| c.load(Ordering::Relaxed);
        CacheStats {
            hits: get(&counters.hits),
            misses: get(&counters.misses),
            inserts: get(&counters.inserts),
            rejected: get(&counters.rejected),
            evictions: get(&counters.evictions),
            invalidations: get(&counters.invalidations),
            sweeps: get(&counters.sweeps),
            entries,
            indexed_types,
        }
    }

    /// Fraction of lookups served from the cache, in percent.
    pub fn hit_rate_percent(&self) -> u64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0
        } else {
            self.hits * 100 / total
        }
    }
}
