//! Syscall-style entry points: raw integer arguments in, an address or a
//! negated errno out.
//!
//! These decode Linux numeric arguments into the typed ones and fold
//! `Result` back into the single-`isize` return convention libc expects.

use crate::error::errno::ENOSYS;
use crate::error::{Error, Result};
use crate::futex::{self, UnknownOp};
use crate::mman::{Advice, MapFlags, Prot, RemapFlags};
use crate::platform::LinearMemory;
use crate::space::Mapper;
use core::sync::atomic::AtomicI32;

#[inline]
fn ret(result: Result<usize>) -> isize {
    match result {
        Ok(value) => value as isize,
        Err(err) => -(err.errno() as isize),
    }
}

/// `mmap(2)`. The descriptor is ignored; a non-zero offset means a file
/// mapping, which is not supported.
pub fn mmap<M: LinearMemory>(
    space: &Mapper<M>,
    addr: usize,
    len: usize,
    prot: i32,
    flags: i32,
    fd: i32,
    offset: i64,
) -> isize {
    let _ = fd;
    if offset != 0 {
        return ret(Err(Error::NotSupported));
    }
    ret(space.map(
        addr,
        len,
        Prot::from_bits_retain(prot),
        MapFlags::from_bits_retain(flags),
    ))
}

/// `munmap(2)`.
pub fn munmap<M: LinearMemory>(space: &Mapper<M>, addr: usize, len: usize) -> isize {
    ret(space.unmap(addr, len).map(|()| 0))
}

/// `mremap(2)` without a new-address argument (`MREMAP_FIXED` is refused).
pub fn mremap<M: LinearMemory>(
    space: &Mapper<M>,
    old_addr: usize,
    old_len: usize,
    new_len: usize,
    flags: i32,
) -> isize {
    ret(space.remap(
        old_addr,
        old_len,
        new_len,
        RemapFlags::from_bits_retain(flags),
    ))
}

/// `madvise(2)`. Unknown advice is `-EINVAL` even for an unmapped range.
pub fn madvise<M: LinearMemory>(space: &Mapper<M>, addr: usize, len: usize, advice: i32) -> isize {
    ret(Advice::try_from(advice).and_then(|advice| space.advise(addr, len, advice).map(|()| 0)))
}

/// `brk(2)`: always returns the resulting break.
pub fn brk<M: LinearMemory>(space: &Mapper<M>, new_break: usize) -> isize {
    space.brk(new_break) as isize
}

/// `futex(2)`, wait and wake only. Other ops are `-ENOSYS`.
pub fn futex(word: &AtomicI32, op: i32, val: i32) -> isize {
    match futex::futex(word, op, val) {
        Ok(value) => value as isize,
        Err(UnknownOp(_)) => -(ENOSYS as isize),
    }
}
