//! The address space: page bitmap, heap boundary and the mapping operations.
//!
//! `AddressSpace` holds all the state and does the work through `&mut self`.
//! `Mapper` wraps it in the single lock that serializes every operation; it
//! is what a process-wide static holds.
//!
//! Every operation validates completely before it mutates anything, and
//! linear memory is grown before any bit is set, so a failed call leaves
//! both the bitmap and the memory size as they were. (Growth that succeeded
//! for a call that later fails is never undone; memory can't shrink.)

use crate::bitmap::PageBitmap;
use crate::config::{is_page_aligned, page_round_up, MAX_ADDRESS, PAGE_SHIFT, PAGE_SIZE};
use crate::error::{Error, Result};
use crate::mman::{Advice, MapFlags, Prot, RemapFlags};
use crate::platform::{grow_to, LinearMemory};
use crate::stat;
use crate::sync::{SpinMutex, SpinMutexGuard};

/// `brk` never grows past this, matching 32-bit `brk` semantics.
const BRK_LIMIT: usize = u32::MAX as usize;

/// Lowest address the mapping operations may manage.
///
/// Decided once, on the first operation that needs it, and fixed from then
/// on. Everything below it is reserved for the static heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeapBoundary {
    Uninitialized,
    Initialized(usize),
}

pub struct AddressSpace<M> {
    memory: M,
    bitmap: PageBitmap,
    boundary: HeapBoundary,
    /// End of memory handed out by `brk` before the boundary was fixed.
    brk_end: usize,
}

impl<M> AddressSpace<M> {
    pub const fn new(memory: M) -> Self {
        Self {
            memory,
            bitmap: PageBitmap::new(),
            boundary: HeapBoundary::Uninitialized,
            brk_end: 0,
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Direct access to the backing memory, e.g. to fill a mapping.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn bitmap(&self) -> &PageBitmap {
        &self.bitmap
    }

    pub fn heap_boundary(&self) -> HeapBoundary {
        self.boundary
    }
}

impl<M: LinearMemory> AddressSpace<M> {
    /// Fix the heap boundary if this is the first call, and return it.
    ///
    /// The boundary is the host's heap-start hint, or the current memory size
    /// if there is none, raised to cover anything `brk` handed out, rounded
    /// up to a page and never below one page. All pages under it are marked
    /// in use exactly once so neither the search nor `test_mapped` will ever
    /// treat static-heap memory as free or as a mapping.
    pub fn ensure_initialized(&mut self) -> usize {
        if let HeapBoundary::Initialized(boundary) = self.boundary {
            return boundary;
        }

        let bottom = match self.memory.heap_base_hint() {
            Some(hint) if hint != 0 => hint,
            _ => self.memory.pages() << PAGE_SHIFT,
        };
        let bottom = bottom.max(self.brk_end).clamp(PAGE_SIZE, MAX_ADDRESS);
        let boundary = page_round_up(bottom);

        self.bitmap.toggle_range(0, boundary);
        self.boundary = HeapBoundary::Initialized(boundary);
        log::debug!("heap boundary fixed at {:#x}", boundary);
        boundary
    }

    /// True iff `[addr, addr + len)` lies above the heap boundary and every
    /// page in it is claimed by a mapping.
    ///
    /// Arguments that don't describe an in-range, page-aligned, non-empty
    /// range are simply not mapped.
    pub fn test_mapped(&mut self, addr: usize, len: usize) -> bool {
        if len == 0 || !is_page_aligned(addr) || !is_page_aligned(len) {
            return false;
        }
        if len > MAX_ADDRESS || addr > MAX_ADDRESS - len {
            return false;
        }
        let boundary = self.ensure_initialized();
        addr >= boundary && self.bitmap.test_range(addr, len, true).is_none()
    }

    /// Lowest free run of `len` bytes (page-rounded), without claiming it.
    pub fn hunt_range(&mut self, len: usize) -> Option<usize> {
        if len == 0 || len > MAX_ADDRESS {
            return None;
        }
        self.ensure_initialized();
        self.bitmap.hunt_range(page_round_up(len))
    }

    /// Create an anonymous private mapping of `len` bytes and return its
    /// address. The contents read as zero.
    ///
    /// Without `MapFlags::FIXED` the hint is ignored and the lowest free run
    /// is used. With it the mapping goes exactly at `hint`, which must be
    /// entirely free; existing mappings are never replaced.
    pub fn map(&mut self, hint: usize, len: usize, prot: Prot, flags: MapFlags) -> Result<usize> {
        let len = check_map(hint, len, prot, flags)?;
        stat!(map_calls);
        self.ensure_initialized();

        let addr = if flags.contains(MapFlags::FIXED) {
            if self.bitmap.test_range(hint, len, false).is_some() {
                return Err(Error::OutOfMemory);
            }
            hint
        } else {
            self.bitmap.hunt_range(len).ok_or(Error::OutOfMemory)?
        };

        grow_to(&mut self.memory, addr + len)?;
        self.bitmap.toggle_range(addr, len);
        self.memory.zero(addr, len);

        log::trace!("map {:#x}+{:#x} {:?}", addr, len, flags);
        Ok(addr)
    }

    /// Release `[addr, addr + len)`, which must be entirely mapped.
    ///
    /// Only the bitmap changes; linear memory is never handed back.
    pub fn unmap(&mut self, addr: usize, len: usize) -> Result<()> {
        let len = check_range(addr, len)?;
        stat!(unmap_calls);
        if !self.test_mapped(addr, len) {
            return Err(Error::InvalidArgument);
        }
        self.bitmap.toggle_range(addr, len);

        log::trace!("unmap {:#x}+{:#x}", addr, len);
        Ok(())
    }

    /// Resize the mapping at `old_addr`, returning its (possibly new) address.
    ///
    /// Shrinking releases the tail. Growing first tries to claim the pages
    /// right after the mapping; failing that, and only with
    /// `RemapFlags::MAYMOVE`, the contents move to the lowest free run that
    /// fits. Added bytes read as zero either way.
    pub fn remap(
        &mut self,
        old_addr: usize,
        old_len: usize,
        new_len: usize,
        flags: RemapFlags,
    ) -> Result<usize> {
        if flags.contains(RemapFlags::FIXED) {
            return Err(Error::NotSupported);
        }
        if !(flags - RemapFlags::MAYMOVE).is_empty() {
            return Err(Error::InvalidArgument);
        }
        if new_len == 0 {
            return Err(Error::InvalidArgument);
        }
        let old_len = check_range(old_addr, old_len)?;
        if new_len > MAX_ADDRESS {
            return Err(Error::OutOfMemory);
        }
        let new_len = page_round_up(new_len);

        stat!(remap_calls);
        if !self.test_mapped(old_addr, old_len) {
            return Err(Error::InvalidArgument);
        }

        if new_len <= old_len {
            if new_len < old_len {
                self.bitmap.toggle_range(old_addr + new_len, old_len - new_len);
            }
            log::trace!("remap {:#x} {:#x} -> {:#x} (shrink)", old_addr, old_len, new_len);
            return Ok(old_addr);
        }

        let old_end = old_addr + old_len;
        let extra = new_len - old_len;

        // If growing memory fails here the move below may still fit lower down.
        let fits_in_place = old_addr <= MAX_ADDRESS - new_len
            && self.bitmap.test_range(old_end, extra, false).is_none()
            && grow_to(&mut self.memory, old_addr + new_len).is_ok();
        if fits_in_place {
            self.bitmap.toggle_range(old_end, extra);
            self.memory.zero(old_end, extra);
            stat!(remap_in_place);
            log::trace!("remap {:#x} {:#x} -> {:#x} (in place)", old_addr, old_len, new_len);
            return Ok(old_addr);
        }

        if !flags.contains(RemapFlags::MAYMOVE) {
            return Err(Error::OutOfMemory);
        }

        let new_addr = self.bitmap.hunt_range(new_len).ok_or(Error::OutOfMemory)?;
        grow_to(&mut self.memory, new_addr + new_len)?;

        self.bitmap.toggle_range(new_addr, new_len);
        self.memory.copy(old_addr, new_addr, old_len);
        self.memory.zero(new_addr + old_len, extra);
        self.bitmap.toggle_range(old_addr, old_len);

        stat!(remap_moved);
        log::trace!(
            "remap {:#x} {:#x} -> {:#x} {:#x} (moved)",
            old_addr,
            old_len,
            new_addr,
            new_len
        );
        Ok(new_addr)
    }

    /// Accept an access-pattern hint for a mapped range. Nothing is done
    /// with it: no prefetch, no eviction.
    pub fn advise(&mut self, addr: usize, len: usize, advice: Advice) -> Result<()> {
        let len = check_range(addr, len)?;
        stat!(advise_calls);
        if !self.test_mapped(addr, len) {
            return Err(Error::InvalidArgument);
        }
        log::trace!("advise {:#x}+{:#x} {:?} (ignored)", addr, len, advice);
        Ok(())
    }

    /// Move the program break to `new_break` and return the resulting break.
    ///
    /// The break is the end of linear memory. It only moves up, in whole
    /// pages, and only until the heap boundary is fixed: after that the
    /// pages above it belong to the mapping operations, and the current
    /// break is returned unchanged.
    pub fn brk(&mut self, new_break: usize) -> usize {
        let pages = self.memory.pages();
        let current = pages << PAGE_SHIFT;

        if self.boundary != HeapBoundary::Uninitialized {
            return current;
        }
        if !is_page_aligned(new_break) || new_break > MAX_ADDRESS {
            return current;
        }
        let new_pages = new_break >> PAGE_SHIFT;
        if new_pages <= pages || new_pages >= BRK_LIMIT / PAGE_SIZE {
            return current;
        }

        match grow_to(&mut self.memory, new_break) {
            Ok(()) => {
                self.brk_end = new_break;
                new_break
            }
            Err(_) => current,
        }
    }
}

/// Check `map` arguments and return the page-rounded length.
fn check_map(hint: usize, len: usize, prot: Prot, flags: MapFlags) -> Result<usize> {
    if flags.contains(MapFlags::SHARED) {
        return Err(Error::NotSupported);
    }
    if !flags.contains(MapFlags::PRIVATE) || !(flags - MapFlags::all()).is_empty() {
        return Err(Error::InvalidArgument);
    }
    if !flags.contains(MapFlags::ANONYMOUS) {
        return Err(Error::NotSupported);
    }
    if !(prot - Prot::all()).is_empty() {
        return Err(Error::InvalidArgument);
    }
    if prot.contains(Prot::EXEC) {
        return Err(Error::NotSupported);
    }
    if len == 0 {
        return Err(Error::InvalidArgument);
    }
    if len > MAX_ADDRESS {
        return Err(Error::OutOfMemory);
    }
    let len = page_round_up(len);
    if flags.contains(MapFlags::FIXED) && (!is_page_aligned(hint) || hint > MAX_ADDRESS - len) {
        return Err(Error::InvalidArgument);
    }
    Ok(len)
}

/// Check an existing-range argument pair and return the page-rounded length.
fn check_range(addr: usize, len: usize) -> Result<usize> {
    if len == 0 || len > MAX_ADDRESS {
        return Err(Error::InvalidArgument);
    }
    let len = page_round_up(len);
    if !is_page_aligned(addr) || addr > MAX_ADDRESS - len {
        return Err(Error::InvalidArgument);
    }
    Ok(len)
}

/// An `AddressSpace` behind the lock that serializes all mapping operations.
pub struct Mapper<M> {
    space: SpinMutex<AddressSpace<M>>,
}

impl<M> Mapper<M> {
    pub const fn new(memory: M) -> Self {
        Self {
            space: SpinMutex::new(AddressSpace::new(memory)),
        }
    }

    /// Hold the lock across several operations or to inspect state.
    pub fn lock(&self) -> SpinMutexGuard<'_, AddressSpace<M>> {
        self.space.lock()
    }
}

impl<M: LinearMemory> Mapper<M> {
    pub fn map(&self, hint: usize, len: usize, prot: Prot, flags: MapFlags) -> Result<usize> {
        self.lock().map(hint, len, prot, flags)
    }

    pub fn unmap(&self, addr: usize, len: usize) -> Result<()> {
        self.lock().unmap(addr, len)
    }

    pub fn remap(
        &self,
        old_addr: usize,
        old_len: usize,
        new_len: usize,
        flags: RemapFlags,
    ) -> Result<usize> {
        self.lock().remap(old_addr, old_len, new_len, flags)
    }

    pub fn advise(&self, addr: usize, len: usize, advice: Advice) -> Result<()> {
        self.lock().advise(addr, len, advice)
    }

    pub fn brk(&self, new_break: usize) -> usize {
        self.lock().brk(new_break)
    }

    pub fn test_mapped(&self, addr: usize, len: usize) -> bool {
        self.lock().test_mapped(addr, len)
    }
}

#[cfg(target_arch = "wasm32")]
/// The process-wide address space over the module's own memory.
pub static ADDRESS_SPACE: Mapper<crate::platform::Native> =
    Mapper::new(crate::platform::WasmMemory);

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::platform::SimMemory;
    use alloc::boxed::Box;

    const RW: Prot = Prot::READ.union(Prot::WRITE);
    const ANON: MapFlags = MapFlags::PRIVATE.union(MapFlags::ANONYMOUS);

    fn pages(n: usize) -> usize {
        n * PAGE_SIZE
    }

    // 4 pages of static data, room to grow to 64.
    fn make_space() -> Box<AddressSpace<SimMemory>> {
        Box::new(AddressSpace::new(SimMemory::new(4, 64)))
    }

    #[test]
    fn test_boundary_from_memory_size() {
        let mut space = make_space();
        assert_eq!(space.heap_boundary(), HeapBoundary::Uninitialized);
        assert_eq!(space.ensure_initialized(), pages(4));
        assert_eq!(space.heap_boundary(), HeapBoundary::Initialized(pages(4)));
        assert_eq!(space.bitmap().count_set(), 4);

        // Idempotent: nothing is toggled twice.
        assert_eq!(space.ensure_initialized(), pages(4));
        assert_eq!(space.bitmap().count_set(), 4);
    }

    #[test]
    fn test_boundary_from_hint_rounds_up() {
        let mut space = Box::new(AddressSpace::new(
            SimMemory::new(8, 64).with_heap_base(pages(2) + 100),
        ));
        assert_eq!(space.ensure_initialized(), pages(3));
        // Memory between the hint and the current size is free to map.
        assert_eq!(space.hunt_range(1), Some(pages(3)));
    }

    #[test]
    fn test_boundary_never_zero() {
        let mut space = Box::new(AddressSpace::new(SimMemory::new(0, 8)));
        assert_eq!(space.ensure_initialized(), pages(1));
        let addr = space.map(0, 1, RW, ANON).unwrap();
        assert_eq!(addr, pages(1));
    }

    #[test]
    fn test_map_rounds_and_grows() {
        let mut space = make_space();
        let addr = space.map(0, 100, RW, ANON).unwrap();
        assert_eq!(addr, pages(4));
        assert_eq!(space.memory().pages(), 5);
        assert!(space.test_mapped(addr, pages(1)));
    }

    #[test]
    fn test_map_argument_errors() {
        let mut space = make_space();
        let cases = [
            (RW, MapFlags::SHARED | MapFlags::ANONYMOUS, Error::NotSupported),
            (RW, MapFlags::ANONYMOUS, Error::InvalidArgument),
            (RW, MapFlags::PRIVATE, Error::NotSupported),
            (RW, ANON | MapFlags::from_bits_retain(0x100), Error::InvalidArgument),
            (RW | Prot::EXEC, ANON, Error::NotSupported),
            (Prot::from_bits_retain(0x8), ANON, Error::InvalidArgument),
        ];
        for (prot, flags, err) in cases {
            assert_eq!(space.map(0, pages(1), prot, flags), Err(err), "{prot:?} {flags:?}");
        }
        assert_eq!(space.map(0, 0, RW, ANON), Err(Error::InvalidArgument));
        assert_eq!(space.map(0, MAX_ADDRESS + 1, RW, ANON), Err(Error::OutOfMemory));
        assert_eq!(space.bitmap().count_set(), 0);
    }

    #[test]
    fn test_map_fixed() {
        let mut space = make_space();
        let fixed = ANON | MapFlags::FIXED;
        assert_eq!(space.map(pages(10), pages(2), RW, fixed), Ok(pages(10)));
        assert_eq!(space.memory().pages(), 12);

        // Overlap, unaligned, out of range, static heap.
        assert_eq!(space.map(pages(11), pages(2), RW, fixed), Err(Error::OutOfMemory));
        assert_eq!(space.map(pages(20) + 1, pages(1), RW, fixed), Err(Error::InvalidArgument));
        assert_eq!(space.map(MAX_ADDRESS, pages(1), RW, fixed), Err(Error::InvalidArgument));
        assert_eq!(space.map(0, pages(1), RW, fixed), Err(Error::OutOfMemory));

        // The next unpinned mapping still goes lowest-first.
        assert_eq!(space.map(pages(10), pages(1), RW, ANON), Ok(pages(4)));
    }

    #[test]
    fn test_map_growth_refused_leaves_bitmap() {
        let mut space = Box::new(AddressSpace::new(SimMemory::new(4, 6)));
        space.ensure_initialized();
        assert_eq!(space.map(0, pages(3), RW, ANON), Err(Error::OutOfMemory));
        assert_eq!(space.bitmap().count_set(), 4);
        assert_eq!(space.memory().pages(), 4);
        assert_eq!(space.map(0, pages(2), RW, ANON), Ok(pages(4)));
    }

    #[test]
    fn test_map_zeroes_reused_pages() {
        let mut space = make_space();
        let addr = space.map(0, pages(1), RW, ANON).unwrap();
        space.memory_mut().bytes_mut(addr, pages(1)).fill(0xEE);
        space.unmap(addr, pages(1)).unwrap();

        let again = space.map(0, pages(1), RW, ANON).unwrap();
        assert_eq!(again, addr);
        assert!(space.memory().bytes(again, pages(1)).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_unmap_errors() {
        let mut space = make_space();
        let addr = space.map(0, pages(2), RW, ANON).unwrap();

        assert_eq!(space.unmap(addr, 0), Err(Error::InvalidArgument));
        assert_eq!(space.unmap(addr + 1, pages(1)), Err(Error::InvalidArgument));
        assert_eq!(space.unmap(addr, pages(3)), Err(Error::InvalidArgument));
        assert_eq!(space.unmap(0, pages(1)), Err(Error::InvalidArgument));
        assert_eq!(space.unmap(MAX_ADDRESS, pages(1)), Err(Error::InvalidArgument));
        assert!(space.test_mapped(addr, pages(2)));

        // Partial unmap is fine; the length rounds up.
        assert_eq!(space.unmap(addr + pages(1), 1), Ok(()));
        assert!(space.test_mapped(addr, pages(1)));
        assert!(!space.test_mapped(addr + pages(1), pages(1)));
    }

    #[test]
    fn test_remap_argument_errors() {
        let mut space = make_space();
        let addr = space.map(0, pages(2), RW, ANON).unwrap();
        let may = RemapFlags::MAYMOVE;

        assert_eq!(space.remap(addr, pages(2), pages(4), RemapFlags::FIXED), Err(Error::NotSupported));
        assert_eq!(
            space.remap(addr, pages(2), pages(4), RemapFlags::from_bits_retain(0x4)),
            Err(Error::InvalidArgument)
        );
        assert_eq!(space.remap(addr, 0, pages(4), may), Err(Error::InvalidArgument));
        assert_eq!(space.remap(addr, pages(2), 0, may), Err(Error::InvalidArgument));
        assert_eq!(space.remap(addr, pages(2), MAX_ADDRESS + 1, may), Err(Error::OutOfMemory));
        assert_eq!(space.remap(addr + 1, pages(2), pages(4), may), Err(Error::InvalidArgument));
        assert_eq!(space.remap(addr, pages(3), pages(4), may), Err(Error::InvalidArgument));
        assert_eq!(space.remap(0, pages(1), pages(4), may), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_remap_same_length() {
        let mut space = make_space();
        let addr = space.map(0, pages(2), RW, ANON).unwrap();
        assert_eq!(space.remap(addr, pages(2), pages(2) - 10, RemapFlags::empty()), Ok(addr));
        assert!(space.test_mapped(addr, pages(2)));
    }

    #[test]
    fn test_remap_no_move_fails() {
        let mut space = make_space();
        let a = space.map(0, pages(1), RW, ANON).unwrap();
        let _b = space.map(0, pages(1), RW, ANON).unwrap();
        assert_eq!(space.remap(a, pages(1), pages(2), RemapFlags::empty()), Err(Error::OutOfMemory));
        assert!(space.test_mapped(a, pages(1)));
    }

    #[test]
    fn test_remap_moves_when_growth_refused() {
        // [4] a, [5] gap, [6] b, memory full at 7 pages.
        let mut space = Box::new(AddressSpace::new(SimMemory::new(4, 7)));
        let a = space.map(0, pages(1), RW, ANON).unwrap();
        let gap = space.map(0, pages(1), RW, ANON).unwrap();
        let b = space.map(0, pages(1), RW, ANON).unwrap();
        space.unmap(a, pages(1)).unwrap();
        space.unmap(gap, pages(1)).unwrap();
        assert_eq!(space.memory().pages(), 7);

        // b can't extend (memory is at its ceiling) but [4, 6) is free.
        space.memory_mut().bytes_mut(b, pages(1)).fill(0x42);
        let moved = space.remap(b, pages(1), pages(2), RemapFlags::MAYMOVE).unwrap();
        assert_eq!(moved, a);
        assert!(space.memory().bytes(moved, pages(1)).iter().all(|&x| x == 0x42));
        assert!(space.memory().bytes(moved + pages(1), pages(1)).iter().all(|&x| x == 0));
        assert!(!space.test_mapped(b, pages(1)));
    }

    /// Page counter only; reaches the whole address space without backing it.
    struct CountedMemory {
        pages: usize,
    }

    impl LinearMemory for CountedMemory {
        fn pages(&self) -> usize {
            self.pages
        }

        fn grow(&mut self, delta: usize) -> Option<usize> {
            let old = self.pages;
            let new = old.checked_add(delta)?;
            if new > MAX_ADDRESS / PAGE_SIZE {
                return None;
            }
            self.pages = new;
            Some(old)
        }

        fn zero(&mut self, _addr: usize, _len: usize) {}

        fn copy(&mut self, _src: usize, _dst: usize, _len: usize) {}
    }

    #[test]
    fn test_remap_at_top_never_grows_in_place() {
        let mut space = Box::new(AddressSpace::new(CountedMemory { pages: 1 }));
        let top = MAX_ADDRESS - PAGE_SIZE;
        let fixed = ANON | MapFlags::FIXED;
        assert_eq!(space.map(top, pages(1), RW, fixed), Ok(top));
        assert_eq!(space.memory().pages(), MAX_ADDRESS / PAGE_SIZE);

        assert_eq!(
            space.remap(top, pages(1), pages(2), RemapFlags::empty()),
            Err(Error::OutOfMemory)
        );
        assert!(space.test_mapped(top, pages(1)));

        // Moves to the lowest free page above the one-page static heap.
        assert_eq!(
            space.remap(top, pages(1), pages(2), RemapFlags::MAYMOVE),
            Ok(pages(1))
        );
        assert!(space.test_mapped(pages(1), pages(2)));
        assert!(!space.test_mapped(top, pages(1)));
        assert_eq!(space.map(0, MAX_ADDRESS, RW, ANON), Err(Error::OutOfMemory));
    }

    #[test]
    fn test_advise() {
        let mut space = make_space();
        let addr = space.map(0, pages(3), RW, ANON).unwrap();
        let before = space.bitmap().count_set();
        for advice in [Advice::Normal, Advice::Random, Advice::Sequential, Advice::WillNeed, Advice::DontNeed] {
            assert_eq!(space.advise(addr, pages(3), advice), Ok(()));
        }
        assert_eq!(space.bitmap().count_set(), before);
        assert_eq!(space.advise(addr, pages(4), Advice::Normal), Err(Error::InvalidArgument));
        assert_eq!(space.advise(0, pages(1), Advice::Normal), Err(Error::InvalidArgument));
        assert_eq!(space.advise(addr, 0, Advice::Normal), Err(Error::InvalidArgument));
    }

    #[test]
    fn test_brk_before_mapping() {
        let mut space = make_space();
        assert_eq!(space.brk(0), pages(4));
        assert_eq!(space.brk(pages(6) + 1), pages(4));
        assert_eq!(space.brk(pages(3)), pages(4));
        assert_eq!(space.brk(pages(6)), pages(6));
        assert_eq!(space.brk(pages(100)), pages(6));

        // The boundary covers the brk heap.
        let addr = space.map(0, pages(1), RW, ANON).unwrap();
        assert_eq!(addr, pages(6));
        assert!(!space.test_mapped(pages(5), pages(1)));
    }

    #[test]
    fn test_brk_with_hint_below_break() {
        let mut space = Box::new(AddressSpace::new(SimMemory::new(2, 64).with_heap_base(pages(1))));
        assert_eq!(space.brk(pages(5)), pages(5));
        assert_eq!(space.ensure_initialized(), pages(5));
    }

    #[test]
    fn test_brk_frozen_after_mapping() {
        let mut space = make_space();
        let addr = space.map(0, pages(1), RW, ANON).unwrap();
        assert_eq!(space.brk(pages(10)), pages(5));
        assert_eq!(space.memory().pages(), 5);
        assert!(space.test_mapped(addr, pages(1)));
    }

    #[test]
    fn test_mapper_locks_per_call() {
        let mapper = Box::new(Mapper::new(SimMemory::new(4, 64)));
        let addr = mapper.map(0, pages(2), RW, ANON).unwrap();
        assert!(mapper.test_mapped(addr, pages(2)));
        assert!(!mapper.lock().bitmap().is_set(addr / PAGE_SIZE + 2));
        mapper.unmap(addr, pages(2)).unwrap();
        assert!(!mapper.test_mapped(addr, pages(2)));
    }
}
