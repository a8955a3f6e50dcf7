//! Linear memory backends.
//!
//! The host gives us one contiguous buffer that can only grow, in whole
//! pages. `LinearMemory` exposes exactly that: a size query and a grow
//! request. There is deliberately no way to shrink it.
//!
//! On wasm32 this is the module's memory 0. Everywhere else a simulated
//! buffer stands in, so the mapping logic can be driven from host tests.

use crate::config::{pages_covering, PAGE_SIZE};
use crate::error::{Error, Result};
use crate::stat;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        mod wasm;
        pub use wasm::WasmMemory;
        /// Backend used for the process-wide address space.
        pub type Native = WasmMemory;
    } else {
        mod sim;
        pub use sim::SimMemory;
    }
}

/// The host's grow-only linear memory.
///
/// Addresses are byte offsets from the start of linear memory. `zero` and
/// `copy` are only called on ranges below `pages() * PAGE_SIZE`.
pub trait LinearMemory {
    /// Current size in pages.
    fn pages(&self) -> usize;

    /// Grow by `delta` pages. Returns the previous size in pages, or `None`
    /// if the host refused.
    fn grow(&mut self, delta: usize) -> Option<usize>;

    /// Where statically allocated memory ends, if the host knows.
    fn heap_base_hint(&self) -> Option<usize> {
        None
    }

    /// Fill `[addr, addr + len)` with zero bytes.
    fn zero(&mut self, addr: usize, len: usize);

    /// Copy `len` bytes from `src` to `dst`. The ranges do not overlap.
    fn copy(&mut self, src: usize, dst: usize, len: usize);
}

/// Make sure linear memory backs every address below `end`.
///
/// Requests exactly the missing pages, or nothing when memory is already
/// large enough. Refusal is reported, never retried.
pub fn grow_to<M: LinearMemory + ?Sized>(memory: &mut M, end: usize) -> Result<()> {
    let have = memory.pages();
    let need = pages_covering(end);
    if need <= have {
        return Ok(());
    }

    let delta = need - have;
    stat!(grow_calls);
    match memory.grow(delta) {
        Some(old) => {
            stat!(grown_pages, delta);
            log::debug!(
                "linear memory grown {} -> {} pages ({:#x} bytes)",
                old,
                old + delta,
                (old + delta) * PAGE_SIZE
            );
            Ok(())
        }
        None => {
            stat!(refused_grows);
            log::warn!("host refused to grow linear memory by {} pages", delta);
            Err(Error::OutOfMemory)
        }
    }
}
