//! The lock that serializes every mapping operation.
//!
//! `std::sync::Mutex` is unavailable (`no_std`) and the lock must be usable
//! in a `static`, so this is a test-and-set spinlock with an RAII guard.
//!
//! On wasm32 without the `atomics` target feature there is only one
//! execution context. A held lock can then only mean the current call stack
//! re-entered a mapping operation, and spinning would hang forever, so that
//! case is fatal instead.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// True when nothing but the current call stack can ever release a lock.
const SINGLE_CONTEXT: bool = cfg!(all(target_arch = "wasm32", not(target_feature = "atomics")));

/// A mutex that uses a spinlock for synchronization.
/// Does not allocate and can be used in a `static`.
pub struct SpinMutex<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for SpinMutex<T> {}
unsafe impl<T: Send> Sync for SpinMutex<T> {}

impl<T> SpinMutex<T> {
    pub const fn new(val: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(val),
        }
    }

    #[inline]
    pub fn lock(&self) -> SpinMutexGuard<'_, T> {
        if !self.acquire() {
            self.lock_slow();
        }
        SpinMutexGuard { mutex: self }
    }

    #[inline]
    fn acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[cold]
    fn lock_slow(&self) {
        if SINGLE_CONTEXT {
            reentered();
        }
        loop {
            // Spin while locked (read-only, doesn't invalidate cache line)
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
            if self.acquire() {
                return;
            }
        }
    }
}

#[cold]
#[inline(never)]
fn reentered() -> ! {
    log::error!("address space lock re-entered from its own call stack");
    panic!("address space lock re-entered");
}

/// RAII guard for `SpinMutex`. Unlocks on drop.
pub struct SpinMutexGuard<'a, T> {
    mutex: &'a SpinMutex<T>,
}

impl<T> Deref for SpinMutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for SpinMutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for SpinMutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        self.mutex.locked.store(false, Ordering::Release);
    }
}
