//! Wait/wake stand-ins for a target that cannot block.
//!
//! With a single execution context nothing else can ever change a futex
//! word or deliver a wake-up. A wait whose condition still holds could only
//! hang forever, which means the lock guarding that word is corrupt or was
//! left held by this same context; that is treated as fatal. A wait whose
//! condition already changed returns immediately, and a wake has nobody to
//! wake.

use core::sync::atomic::{AtomicI32, Ordering};

/// Linux futex op codes accepted by [`futex`].
pub const FUTEX_WAIT: i32 = 0;
pub const FUTEX_WAKE: i32 = 1;
/// Process-private flag; meaningless with one address space and ignored.
pub const FUTEX_PRIVATE: i32 = 128;

/// Result of [`futex`] for an op other than wait or wake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownOp(pub i32);

/// Wait until `word` no longer holds `expected`.
///
/// Returns immediately if it already differs. Otherwise the wait could
/// never end and [`unsatisfiable_wait`] aborts.
pub fn wait(word: &AtomicI32, expected: i32) {
    if word.load(Ordering::SeqCst) == expected {
        unsatisfiable_wait(word, expected);
    }
}

/// Wake up to `count` waiters on `word`. There are never any; returns 0.
pub fn wake(_word: &AtomicI32, _count: i32) -> i32 {
    0
}

/// Decode a raw futex op and run it. `val` is the expected value for a wait
/// and the waiter count for a wake.
pub fn futex(word: &AtomicI32, op: i32, val: i32) -> Result<i32, UnknownOp> {
    match op & !FUTEX_PRIVATE {
        FUTEX_WAIT => {
            wait(word, val);
            Ok(0)
        }
        FUTEX_WAKE => Ok(wake(word, val)),
        other => Err(UnknownOp(other)),
    }
}

/// The one unrecoverable condition in this crate: a wait nothing can end.
///
/// This is a programming error (or lock corruption), not an operational
/// failure, so it never surfaces as an [`crate::Error`]. On wasm32 it traps;
/// elsewhere it panics.
#[cold]
#[inline(never)]
pub fn unsatisfiable_wait(word: &AtomicI32, expected: i32) -> ! {
    log::error!(
        "futex wait on {:p} can never be woken (value still {})",
        word,
        expected
    );
    #[cfg(target_arch = "wasm32")]
    core::arch::wasm32::unreachable();
    #[cfg(not(target_arch = "wasm32"))]
    panic!("futex wait on {:p} can never be woken", word);
}
