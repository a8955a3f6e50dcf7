//! One bit per page over `[0, MAX_ADDRESS)`.
//!
//! A set bit means the page is claimed, either by the static heap below the
//! heap boundary or by a live mapping. The bitmap is the only record of what
//! is mapped: regions carry no metadata once mapped.
//!
//! All methods take page-aligned addresses and lengths, and callers keep
//! `addr + len <= MAX_ADDRESS`. Nothing here touches linear memory.

use crate::config::{BITMAP_WORDS, MAX_ADDRESS, NUM_PAGES, PAGE_SHIFT};

const WORD_BITS: usize = u64::BITS as usize;

#[inline]
const fn word_index(page: usize) -> usize {
    page / WORD_BITS
}

#[inline]
const fn bit_mask(page: usize) -> u64 {
    1 << (page % WORD_BITS)
}

/// Fixed-capacity page occupancy map.
pub struct PageBitmap {
    words: [u64; BITMAP_WORDS],
}

impl PageBitmap {
    /// All pages free.
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            words: [0; BITMAP_WORDS],
        }
    }

    #[inline]
    pub fn is_set(&self, page: usize) -> bool {
        self.words[word_index(page)] & bit_mask(page) != 0
    }

    /// Return the index of the first page in `[addr, addr + len)` whose
    /// state differs from `set`, or `None` if every page matches.
    pub fn test_range(&self, addr: usize, len: usize, set: bool) -> Option<usize> {
        debug_assert!(addr <= MAX_ADDRESS && len <= MAX_ADDRESS - addr);
        let start = addr >> PAGE_SHIFT;
        let end = start + (len >> PAGE_SHIFT);
        // Per-page is fine: zeroing a 64 KiB page costs far more than this loop.
        (start..end).find(|&page| self.is_set(page) != set)
    }

    /// Flip every bit in `[addr, addr + len)`.
    ///
    /// Only valid on a range `test_range` has shown to be uniformly set or
    /// uniformly clear; flipping a mixed range corrupts the map.
    pub fn toggle_range(&mut self, addr: usize, len: usize) {
        debug_assert!(addr <= MAX_ADDRESS && len <= MAX_ADDRESS - addr);
        let start = addr >> PAGE_SHIFT;
        let end = start + (len >> PAGE_SHIFT);
        for page in start..end {
            self.words[word_index(page)] ^= bit_mask(page);
        }
    }

    /// Find the lowest address of `len` bytes of contiguous free pages.
    ///
    /// Full words are skipped with one comparison. Within a word the first
    /// free page is found with a trailing-zero count, and when the run
    /// starting there is obstructed the scan resumes just past the
    /// obstructing page, so interleaved small mappings stay linear.
    pub fn hunt_range(&self, len: usize) -> Option<usize> {
        debug_assert!(len > 0 && len <= MAX_ADDRESS);
        let mut page = 0;
        while page < NUM_PAGES {
            let idx = word_index(page);
            let free = !self.words[idx] & (u64::MAX << (page % WORD_BITS));
            if free == 0 {
                page = (idx + 1) * WORD_BITS;
                continue;
            }

            let start = idx * WORD_BITS + free.trailing_zeros() as usize;
            let addr = start << PAGE_SHIFT;
            if addr > MAX_ADDRESS - len {
                return None;
            }
            match self.test_range(addr, len, false) {
                None => return Some(addr),
                Some(used) => page = used + 1,
            }
        }
        None
    }

    /// Number of claimed pages.
    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
