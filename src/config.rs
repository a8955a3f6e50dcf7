//! Build-time address-space configuration.
//!
//! The constants come from `linmap.toml` (or `$LINMAP_CONFIG`) via build.rs.

include!(concat!(env!("OUT_DIR"), "/config_gen.rs"));

/// Round `len` up to a whole number of pages.
///
/// Callers must have checked `len <= MAX_ADDRESS` first so this cannot
/// overflow.
#[inline]
pub const fn page_round_up(len: usize) -> usize {
    (len + PAGE_MASK) & !PAGE_MASK
}

#[inline]
pub const fn is_page_aligned(addr: usize) -> bool {
    addr & PAGE_MASK == 0
}

/// Number of pages needed to cover `[0, end)`.
#[inline]
pub const fn pages_covering(end: usize) -> usize {
    // Split so `end` close to usize::MAX doesn't overflow.
    (end >> PAGE_SHIFT) + (end & PAGE_MASK != 0) as usize
}
