//! WebAssembly memory 0.

use super::LinearMemory;
use core::arch::wasm32;

unsafe extern "C" {
    /// End of static data, provided by the linker.
    static __heap_base: u8;
}

/// The module's own linear memory. Zero-sized; all state lives in the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct WasmMemory;

impl LinearMemory for WasmMemory {
    #[inline]
    fn pages(&self) -> usize {
        wasm32::memory_size(0)
    }

    #[inline]
    fn grow(&mut self, delta: usize) -> Option<usize> {
        match wasm32::memory_grow(0, delta) {
            usize::MAX => None,
            old => Some(old),
        }
    }

    fn heap_base_hint(&self) -> Option<usize> {
        let base = (&raw const __heap_base) as usize;
        (base != 0).then_some(base)
    }

    fn zero(&mut self, addr: usize, len: usize) {
        // Address 0 is always below the heap boundary, never a mapping.
        unsafe { core::ptr::write_bytes(addr as *mut u8, 0, len) };
    }

    fn copy(&mut self, src: usize, dst: usize, len: usize) {
        unsafe { core::ptr::copy_nonoverlapping(src as *const u8, dst as *mut u8, len) };
    }
}
