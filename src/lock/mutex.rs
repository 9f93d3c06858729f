//! Plain mutex lock strategy.
//!
//! Exclusive-only: read and write sections collapse to the same acquisition.
//! The underlying mutex does not poison, so a panic inside a section unwinds
//! to the caller unchanged and the lock is usable afterwards.

#![allow(unsafe_code)]

use parking_lot::Mutex;

use crate::lock::LockStrategy;

/// A plain mutual-exclusion lock strategy.
#[derive(Debug, Default)]
pub struct MutexLock {
    inner: Mutex<()>,
}

impl MutexLock {
    /// Creates an unlocked mutex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// SAFETY: both section kinds hold the one mutex for their whole duration,
// so no two sections ever overlap.
unsafe impl LockStrategy for MutexLock {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.inner.lock();
        f()
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.inner.lock();
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_closure_result() {
        let mutex = MutexLock::new();
        assert_eq!(mutex.with_write(|| "done"), "done");
    }

    #[test]
    fn released_on_panic() {
        let mutex = MutexLock::new();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            mutex.with_write(|| panic!("boom"));
        }));
        assert!(unwound.is_err());

        assert_eq!(mutex.with_read(|| 1), 1);
    }
}
