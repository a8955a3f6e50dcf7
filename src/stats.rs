//! Mapping statistics counters.
//!
//! All counters use `Relaxed` ordering. They are observational only; the
//! address-space lock provides the ordering that correctness relies on.
//!
//! # Usage
//!
//! ```ignore
//! let snap = linmap::stats::snapshot();
//! println!("maps: {}, pages grown: {}", snap.map_calls, snap.grown_pages);
//! ```
//!
//! Counters are process-wide: every `Mapper` bumps the same set.

use core::sync::atomic::{AtomicU64, Ordering};

pub(crate) struct Stats {
    // ---- Mapping operations ----
    /// Calls to `map` that passed argument validation.
    pub map_calls: AtomicU64,
    /// Calls to `unmap` that passed argument validation.
    pub unmap_calls: AtomicU64,
    /// Calls to `remap` that passed argument validation.
    pub remap_calls: AtomicU64,
    /// Growing remaps satisfied by claiming the adjacent pages.
    pub remap_in_place: AtomicU64,
    /// Growing remaps that had to copy into a new region.
    pub remap_moved: AtomicU64,
    /// Calls to `advise` that passed argument validation.
    pub advise_calls: AtomicU64,

    // ---- Linear memory ----
    /// Grow requests sent to the host.
    pub grow_calls: AtomicU64,
    /// Pages the host added.
    pub grown_pages: AtomicU64,
    /// Grow requests the host refused.
    pub refused_grows: AtomicU64,
}

impl Stats {
    const fn new() -> Self {
        Self {
            map_calls: AtomicU64::new(0),
            unmap_calls: AtomicU64::new(0),
            remap_calls: AtomicU64::new(0),
            remap_in_place: AtomicU64::new(0),
            remap_moved: AtomicU64::new(0),
            advise_calls: AtomicU64::new(0),
            grow_calls: AtomicU64::new(0),
            grown_pages: AtomicU64::new(0),
            refused_grows: AtomicU64::new(0),
        }
    }
}

pub(crate) static STATS: Stats = Stats::new();

/// A point-in-time copy of all counters.
///
/// Each field is loaded atomically, but the snapshot as a whole may race
/// with concurrent operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Snapshot {
    pub map_calls: u64,
    pub unmap_calls: u64,
    pub remap_calls: u64,
    pub remap_in_place: u64,
    pub remap_moved: u64,
    pub advise_calls: u64,
    pub grow_calls: u64,
    pub grown_pages: u64,
    pub refused_grows: u64,
}

/// Load all counters with `Relaxed` ordering and return a [`Snapshot`].
pub fn snapshot() -> Snapshot {
    let s = &STATS;
    Snapshot {
        map_calls: s.map_calls.load(Ordering::Relaxed),
        unmap_calls: s.unmap_calls.load(Ordering::Relaxed),
        remap_calls: s.remap_calls.load(Ordering::Relaxed),
        remap_in_place: s.remap_in_place.load(Ordering::Relaxed),
        remap_moved: s.remap_moved.load(Ordering::Relaxed),
        advise_calls: s.advise_calls.load(Ordering::Relaxed),
        grow_calls: s.grow_calls.load(Ordering::Relaxed),
        grown_pages: s.grown_pages.load(Ordering::Relaxed),
        refused_grows: s.refused_grows.load(Ordering::Relaxed),
    }
}
