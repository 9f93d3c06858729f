//! Reader-writer lock strategy.
//!
//! Wraps a `pthread_rwlock_t`. This is the one strategy with two real
//! acquisition modes: read sections may overlap each other, write sections
//! exclude everything. It is also the one strategy that owns a kernel
//! resource, so construction is fallible and drop must release the resource
//! exactly once.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;

use crate::lock::LockStrategy;

/// Error returned when the OS fails to initialize a reader-writer lock.
///
/// Carries the nonzero return code from `pthread_rwlock_init` (an errno
/// value, typically `EAGAIN` or `ENOMEM` under resource exhaustion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RwLockInitError(i32);

impl RwLockInitError {
    /// Returns the raw OS error code.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RwLockInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rwlock initialization failed (os error {})", self.0)
    }
}

impl std::error::Error for RwLockInitError {}

/// A reader-writer lock strategy backed by the OS primitive.
pub struct RwStrategy {
    // Boxed: the pthread object must not move once initialized.
    raw: Box<UnsafeCell<libc::pthread_rwlock_t>>,
}

// The pthread rwlock is designed for cross-thread acquire/release; all
// access to the raw object goes through its own synchronized entry points.
unsafe impl Send for RwStrategy {}
unsafe impl Sync for RwStrategy {}

impl RwStrategy {
    /// Initializes a new OS reader-writer lock.
    ///
    /// Fails if the OS cannot allocate the lock; a failed initialization
    /// never produces a usable instance.
    pub fn new() -> Result<Self, RwLockInitError> {
        // SAFETY: pthread_rwlock_t is a plain C struct; the zeroed bytes are
        // only a placeholder until pthread_rwlock_init overwrites them.
        let raw = Box::new(UnsafeCell::new(unsafe { std::mem::zeroed() }));
        // SAFETY: `raw` points to writable storage sized for the lock, and a
        // null attribute pointer requests the default lock kind.
        let res = unsafe { libc::pthread_rwlock_init(raw.get(), std::ptr::null()) };
        if res != 0 {
            // Nothing to destroy: a failed init never created the object.
            return Err(RwLockInitError(res));
        }
        Ok(Self { raw })
    }

    fn read_section(&self) -> RwSection<'_> {
        // SAFETY: the lock was initialized in new() and not yet destroyed.
        let res = unsafe { libc::pthread_rwlock_rdlock(self.raw.get()) };
        // A nonzero code (e.g. EAGAIN on reader-count overflow) means the
        // section was never acquired; entering it anyway would run unlocked.
        assert_eq!(res, 0, "rwlock rdlock failed (os error {res})");
        RwSection { lock: self }
    }

    fn write_section(&self) -> RwSection<'_> {
        // SAFETY: the lock was initialized in new() and not yet destroyed.
        let res = unsafe { libc::pthread_rwlock_wrlock(self.raw.get()) };
        assert_eq!(res, 0, "rwlock wrlock failed (os error {res})");
        RwSection { lock: self }
    }
}

impl fmt::Debug for RwStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("RwStrategy { .. }")
    }
}

impl Drop for RwStrategy {
    fn drop(&mut self) {
        // SAFETY: exclusive ownership at drop; the lock is initialized and
        // this is the only destroy call it will ever see.
        let res = unsafe { libc::pthread_rwlock_destroy(self.raw.get()) };
        if res != 0 {
            // A failing destroy means the lock was still held or already
            // invalid; the process state is undefined past this point.
            std::process::abort();
        }
    }
}

// SAFETY: the OS primitive grants write sections exclusively and admits
// read sections only while no writer holds or is granted the lock.
unsafe impl LockStrategy for RwStrategy {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.read_section();
        f()
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.write_section();
        f()
    }
}

/// Unlocks on drop. Read and write sections release through the same call.
#[must_use = "section is released immediately if not held"]
struct RwSection<'a> {
    lock: &'a RwStrategy,
}

impl Drop for RwSection<'_> {
    fn drop(&mut self) {
        // SAFETY: this guard's existence proves the calling thread holds the
        // lock in exactly one mode.
        let res = unsafe { libc::pthread_rwlock_unlock(self.lock.raw.get()) };
        assert_eq!(res, 0, "rwlock unlock failed (os error {res})");
    }
}
