//! Lookup statistics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Where a positional lookup started walking from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Head,
    Tail,
    Cache,
}

/// Counters for positional lookups and cache maintenance
#[derive(Debug, Default)]
pub struct LookupStats {
    lookups: AtomicU64,
    head_anchored: AtomicU64,
    tail_anchored: AtomicU64,
    cache_anchored: AtomicU64,
    steps: AtomicU64,
    rebuilds: AtomicU64,
    repairs: AtomicU64,
}

impl LookupStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one lookup, its starting anchor and how many links it walked
    pub(crate) fn record_lookup(&self, anchor: Anchor, steps: usize) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.steps.fetch_add(steps as u64, Ordering::Relaxed);
        let counter = match anchor {
            Anchor::Head => &self.head_anchored,
            Anchor::Tail => &self.tail_anchored,
            Anchor::Cache => &self.cache_anchored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a full cache resample
    pub(crate) fn record_rebuild(&self) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an in-place cache repair
    pub(crate) fn record_repair(&self) {
        self.repairs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total lookups
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Lookups that started from the head
    pub fn head_anchored(&self) -> u64 {
        self.head_anchored.load(Ordering::Relaxed)
    }

    /// Lookups that started from the tail
    pub fn tail_anchored(&self) -> u64 {
        self.tail_anchored.load(Ordering::Relaxed)
    }

    /// Lookups that started from a cache slot
    pub fn cache_anchored(&self) -> u64 {
        self.cache_anchored.load(Ordering::Relaxed)
    }

    /// Total links walked by lookups
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::Relaxed)
    }

    /// Get total rebuilds
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Get total repairs
    pub fn repairs(&self) -> u64 {
        self.repairs.load(Ordering::Relaxed)
    }

    /// Fraction of lookups anchored on a cache slot (0.0 to 1.0)
    pub fn cache_ratio(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.cache_anchored() as f64 / lookups as f64
        }
    }

    /// Average links walked per lookup
    pub fn mean_steps(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.steps() as f64 / lookups as f64
        }
    }

    /// Reset all statistics
    pub fn reset(&self) {
        self.lookups.store(0, Ordering::Relaxed);
        self.head_anchored.store(0, Ordering::Relaxed);
        self.tail_anchored.store(0, Ordering::Relaxed);
        self.cache_anchored.store(0, Ordering::Relaxed);
        self.steps.store(0, Ordering::Relaxed);
        self.rebuilds.store(0, Ordering::Relaxed);
        self.repairs.store(0, Ordering::Relaxed);
    }
}
