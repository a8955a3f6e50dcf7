#![cfg_attr(not(test), no_std)]

//! linmap: POSIX-style memory mapping on top of a grow-only linear memory.
//!
//! Targets such as WebAssembly have no kernel and no virtual memory: the only
//! primitive is a single linear buffer that can be grown a page at a time and
//! never shrunk. This crate emulates `mmap`/`munmap`/`mremap`/`madvise` on it:
//! - A fixed-size page bitmap records which pages are claimed
//! - Pages below the heap boundary belong to the static heap and are never handed out
//! - New mappings take the lowest-addressed free run (bottom-up first fit)
//! - Linear memory is grown before any page is marked in use
//!
//! It also carries the `futex` wait/wake stand-ins that lock primitives
//! need on a target with a single execution context.
//!
//! # Usage
//!
//! ```ignore
//! use linmap::{MapFlags, Prot, ADDRESS_SPACE};
//!
//! let addr = ADDRESS_SPACE.map(0, 1 << 20, Prot::READ | Prot::WRITE,
//!                              MapFlags::PRIVATE | MapFlags::ANONYMOUS)?;
//! ```

#[cfg(not(target_arch = "wasm32"))]
extern crate alloc;

pub mod bitmap;
pub mod config;
pub mod error;
#[cfg(all(feature = "ffi", target_arch = "wasm32"))]
pub mod ffi;
pub mod futex;
mod macros;
pub mod mman;
pub mod platform;
pub mod space;
#[cfg(feature = "stats")]
pub mod stats;
pub mod sync;
pub mod syscall;

pub use config::{MAX_ADDRESS, PAGE_SIZE};
pub use error::{Error, Result};
pub use mman::{Advice, MapFlags, Prot, RemapFlags};
pub use platform::LinearMemory;
pub use space::{AddressSpace, Mapper};

#[cfg(target_arch = "wasm32")]
pub use space::ADDRESS_SPACE;
