//! Counting-semaphore lock strategy.
//!
//! A blocking counting semaphore with the lock contract layered on top: a
//! critical section drains the *entire* permit count before it runs and
//! returns it afterwards, so sections are exclusive at any configuration.
//! One permit is the canonical configuration and the guarded container's
//! default; larger counts only change what [`available_permits`] reports
//! between sections.
//!
//! The semaphore has a single acquisition mode, so read and write sections
//! are the same exclusive acquisition and reads never overlap.
//!
//! [`available_permits`]: SemaphoreLock::available_permits

#![allow(unsafe_code)]

use parking_lot::{Condvar, Mutex};

use crate::lock::LockStrategy;

/// A counting semaphore usable as a lock strategy.
#[derive(Debug)]
pub struct SemaphoreLock {
    /// Number of available permits.
    permits: Mutex<usize>,
    /// Signaled whenever the permits are returned.
    available: Condvar,
    /// Initial permit count.
    max_permits: usize,
}

impl SemaphoreLock {
    /// Creates a semaphore with `permits` tokens.
    ///
    /// Every critical section takes all of them, so the lock is exclusive
    /// regardless of the count. `SemaphoreLock::new(1)` is the canonical
    /// configuration.
    ///
    /// # Panics
    ///
    /// Panics if `permits` is zero: a zero-permit semaphore has nothing to
    /// drain and could not exclude anything.
    #[must_use]
    pub fn new(permits: usize) -> Self {
        assert!(permits >= 1, "semaphore needs at least one permit");
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
            max_permits: permits,
        }
    }

    /// Returns the number of permits currently available.
    ///
    /// Zero while a critical section is running, `max_permits` otherwise.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        *self.permits.lock()
    }

    /// Returns the initial permit count.
    #[must_use]
    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    /// Blocks until every permit is available and takes them all at once.
    ///
    /// Draining is all-or-nothing under one state lock, so two contending
    /// sections can never split the permits between them and deadlock.
    fn acquire(&self) -> SemaphoreSection<'_> {
        let mut permits = self.permits.lock();
        while *permits != self.max_permits {
            self.available.wait(&mut permits);
        }
        *permits = 0;
        SemaphoreSection { semaphore: self }
    }
}

impl Default for SemaphoreLock {
    /// One permit: a mutual exclusion lock.
    fn default() -> Self {
        Self::new(1)
    }
}

// SAFETY: a section drains all permits before running and no permit exists
// to admit a second section until the guard returns them, so write sections
// never overlap anything.
unsafe impl LockStrategy for SemaphoreLock {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.acquire();
        f()
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.acquire();
        f()
    }
}

/// Returns the permits on drop, so release happens on unwind too.
#[must_use = "section is released immediately if not held"]
struct SemaphoreSection<'a> {
    semaphore: &'a SemaphoreLock,
}

impl Drop for SemaphoreSection<'_> {
    fn drop(&mut self) {
        let mut permits = self.semaphore.permits.lock();
        *permits = self.semaphore.max_permits;
        self.semaphore.available.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn permits_drained_during_section_and_returned_after() {
        let sem = SemaphoreLock::new(1);
        assert_eq!(sem.available_permits(), 1);

        sem.with_write(|| {
            assert_eq!(sem.available_permits(), 0);
        });

        assert_eq!(sem.available_permits(), 1);
    }

    #[test]
    fn returns_closure_result() {
        let sem = SemaphoreLock::new(1);
        let n = sem.with_read(|| 7_u32);
        assert_eq!(n, 7);
    }

    #[test]
    #[should_panic(expected = "at least one permit")]
    fn zero_permits_rejected() {
        let _ = SemaphoreLock::new(0);
    }

    #[test]
    fn permits_returned_on_panic() {
        let sem = SemaphoreLock::new(1);

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sem.with_write(|| panic!("boom"));
        }));
        assert!(unwound.is_err());

        // The permits came back; a later section still runs.
        assert_eq!(sem.available_permits(), 1);
        assert_eq!(sem.with_write(|| 1), 1);
    }

    #[test]
    fn multi_permit_sections_stay_exclusive() {
        let sem = Arc::new(SemaphoreLock::new(2));
        let in_section = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..2 {
            let sem = Arc::clone(&sem);
            let in_section = Arc::clone(&in_section);
            let peak = Arc::clone(&peak);
            handles.push(thread::spawn(move || {
                sem.with_write(|| {
                    let now = in_section.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(20));
                    in_section.fetch_sub(1, Ordering::SeqCst);
                });
            }));
        }
        for handle in handles {
            handle.join().expect("thread failed");
        }

        assert_eq!(
            peak.load(Ordering::SeqCst),
            1,
            "two write sections overlapped"
        );
        assert_eq!(sem.available_permits(), 2);
    }
}
