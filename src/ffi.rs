//! C-ABI syscall exports over the process-wide address space.
//!
//! Gated behind `features = ["ffi"]` and only built for wasm32, where a
//! libc links these in place of real system calls. Every argument arrives
//! as a C `long` and is reinterpreted the way the kernel would: addresses
//! and lengths as unsigned, flags and values as `int`.

use crate::space::ADDRESS_SPACE;
use crate::syscall;
use core::ffi::c_long;
use core::sync::atomic::AtomicI32;

#[unsafe(no_mangle)]
pub extern "C" fn __syscall_mmap(
    addr: c_long,
    len: c_long,
    prot: c_long,
    flags: c_long,
    fd: c_long,
    offset: c_long,
) -> c_long {
    syscall::mmap(
        &ADDRESS_SPACE,
        addr as usize,
        len as usize,
        prot as i32,
        flags as i32,
        fd as i32,
        offset as i64,
    ) as c_long
}

#[unsafe(no_mangle)]
pub extern "C" fn __syscall_munmap(addr: c_long, len: c_long) -> c_long {
    syscall::munmap(&ADDRESS_SPACE, addr as usize, len as usize) as c_long
}

#[unsafe(no_mangle)]
pub extern "C" fn __syscall_mremap(
    old_addr: c_long,
    old_len: c_long,
    new_len: c_long,
    flags: c_long,
) -> c_long {
    syscall::mremap(
        &ADDRESS_SPACE,
        old_addr as usize,
        old_len as usize,
        new_len as usize,
        flags as i32,
    ) as c_long
}

#[unsafe(no_mangle)]
pub extern "C" fn __syscall_madvise(addr: c_long, len: c_long, advice: c_long) -> c_long {
    syscall::madvise(&ADDRESS_SPACE, addr as usize, len as usize, advice as i32) as c_long
}

#[unsafe(no_mangle)]
pub extern "C" fn __syscall_brk(new_break: c_long) -> c_long {
    syscall::brk(&ADDRESS_SPACE, new_break as usize) as c_long
}

/// # Safety
/// `addr` must point to a live, 4-byte aligned futex word.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __syscall_futex(addr: c_long, op: c_long, val: c_long) -> c_long {
    let word = unsafe { &*(addr as usize as *const AtomicI32) };
    syscall::futex(word, op as i32, val as i32) as c_long
}
