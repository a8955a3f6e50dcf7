//! Host-side simulated linear memory.
//!
//! A heap buffer that grows in whole pages up to a fixed ceiling, standing
//! in for Wasm memory on targets that don't have one. Mapped addresses are
//! offsets into the buffer.

use super::LinearMemory;
use crate::config::PAGE_SIZE;
use alloc::vec::Vec;

pub struct SimMemory {
    bytes: Vec<u8>,
    max_pages: usize,
    heap_base: Option<usize>,
}

impl SimMemory {
    /// Start at `initial_pages`; growth past `max_pages` is refused.
    pub fn new(initial_pages: usize, max_pages: usize) -> Self {
        assert!(initial_pages <= max_pages, "initial size exceeds ceiling");
        let mut bytes = Vec::new();
        bytes.resize(initial_pages * PAGE_SIZE, 0);
        Self {
            bytes,
            max_pages,
            heap_base: None,
        }
    }

    /// Report `addr` as the end of static data.
    pub fn with_heap_base(mut self, addr: usize) -> Self {
        self.heap_base = Some(addr);
        self
    }

    /// Read access to `[addr, addr + len)`.
    pub fn bytes(&self, addr: usize, len: usize) -> &[u8] {
        &self.bytes[addr..addr + len]
    }

    /// Write access to `[addr, addr + len)`.
    pub fn bytes_mut(&mut self, addr: usize, len: usize) -> &mut [u8] {
        &mut self.bytes[addr..addr + len]
    }
}

impl LinearMemory for SimMemory {
    fn pages(&self) -> usize {
        self.bytes.len() / PAGE_SIZE
    }

    fn grow(&mut self, delta: usize) -> Option<usize> {
        let old = self.pages();
        let new = old.checked_add(delta)?;
        if new > self.max_pages {
            return None;
        }
        // Fresh pages are zeroed, like real Wasm memory.
        self.bytes.resize(new * PAGE_SIZE, 0);
        Some(old)
    }

    fn heap_base_hint(&self) -> Option<usize> {
        self.heap_base
    }

    fn zero(&mut self, addr: usize, len: usize) {
        self.bytes[addr..addr + len].fill(0);
    }

    fn copy(&mut self, src: usize, dst: usize, len: usize) {
        self.bytes.copy_within(src..src + len, dst);
    }
}
