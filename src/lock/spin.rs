//! Spinlock strategy.
//!
//! Exclusive-only, and busy-waits instead of blocking: a contending thread
//! burns CPU until the holder releases. Appropriate only for very short
//! critical sections; on an oversubscribed system a descheduled holder can
//! leave waiters spinning for a full scheduler quantum.

#![allow(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use crate::lock::LockStrategy;

/// A busy-waiting exclusive lock strategy.
#[derive(Debug)]
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    /// Creates an unlocked spinlock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    fn acquire(&self) -> SpinSection<'_> {
        loop {
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return SpinSection { lock: self };
            }
            // Spin on a plain load to keep the cache line shared while the
            // lock is held.
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: only one thread wins the false-to-true exchange at a time, and
// the flag resets only when the section's guard drops, so no two sections
// ever overlap.
unsafe impl LockStrategy for SpinLock {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.acquire();
        f()
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.acquire();
        f()
    }
}

/// Releases the spinlock on drop, including on unwind.
#[must_use = "section is released immediately if not held"]
struct SpinSection<'a> {
    lock: &'a SpinLock,
}

impl Drop for SpinSection<'_> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
