//! Serial-queue lock strategy.
//!
//! Models a labeled serial execution context: critical sections execute on
//! the calling thread, one at a time, in arrival (FIFO) order. The fairness
//! comes from the fair mutex underneath; the label exists for diagnostics
//! only and carries no identity semantics.
//!
//! The queue has a single mode, so read and write sections collapse to the
//! same serialization.

#![allow(unsafe_code)]

use parking_lot::FairMutex;

use crate::lock::LockStrategy;

/// A labeled FIFO serial execution context.
pub struct QueueLock {
    label: String,
    serial: FairMutex<()>,
}

impl QueueLock {
    /// Creates a serial queue with a diagnostic label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            serial: FairMutex::new(()),
        }
    }

    /// Returns the queue's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for QueueLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueLock")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

// SAFETY: both section kinds hold the one fair mutex for their whole
// duration, so no two sections ever overlap.
unsafe impl LockStrategy for QueueLock {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.serial.lock();
        f()
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self.serial.lock();
        f()
    }
}
