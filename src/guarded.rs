//! The guarded container: one value, one lock strategy.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;

use crate::lock::{LockStrategy, SemaphoreLock};

/// A value that can only be touched inside a critical section.
///
/// `Guarded` owns exactly one value and one lock strategy, chosen at
/// construction. Every read goes through [`with`](Self::with), every
/// mutation through [`update`](Self::update); both delegate the critical
/// section to the strategy, so the container stays correct no matter which
/// strategy is plugged in.
///
/// Concurrent `update` calls are mutually exclusive and linearize in some
/// unspecified order. Concurrent `with` calls overlap only under
/// [`RwStrategy`](crate::RwStrategy); every other strategy serializes them
/// too, which is stronger than necessary but never wrong.
///
/// # Sharp edge
///
/// Borrow rules stop a `with` closure from leaking its `&T` out of the
/// section, but a value with reference semantics inside `T` (say an
/// `Arc<Mutex<_>>` clone) can still be mutated after the section ends. The
/// lock covers the stored value, not everything reachable from it.
pub struct Guarded<T, L = SemaphoreLock> {
    lock: L,
    value: UnsafeCell<T>,
}

// Like a reader-writer lock over T: handing out &T to several reader
// threads at once requires T: Sync, and &mut T crossing threads requires
// T: Send.
unsafe impl<T: Send, L: Send> Send for Guarded<T, L> {}
unsafe impl<T: Send + Sync, L: Sync> Sync for Guarded<T, L> {}

impl<T> Guarded<T> {
    /// Wraps `value` behind the default strategy, a one-permit
    /// [`SemaphoreLock`].
    ///
    /// No critical section is taken here: no other reference to the value
    /// can exist yet.
    pub fn new(value: T) -> Self {
        Self::with_lock(value, SemaphoreLock::default())
    }
}

impl<T, L: LockStrategy> Guarded<T, L> {
    /// Wraps `value` behind a caller-chosen lock strategy.
    pub fn with_lock(value: T, lock: L) -> Self {
        Self {
            lock,
            value: UnsafeCell::new(value),
        }
    }

    /// Read-modify-writes the value inside one exclusive critical section.
    ///
    /// The closure gets `&mut T` and the lock is held for its entire
    /// execution, including whatever work computes the new value. That span
    /// is the point: "read old, compute, write new" becomes a single atomic
    /// unit, so no other thread can slip in between the read and the write.
    ///
    /// Returns the closure's result, so a `Result`-returning closure
    /// propagates its error to the caller unchanged. A panic in the closure
    /// unwinds to the caller with the lock released.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.lock.with_write(|| {
            // SAFETY: the LockStrategy contract makes write sections
            // exclusive, so this is the only live reference to the value.
            f(unsafe { &mut *self.value.get() })
        })
    }

    /// Computes a derived value inside a shared critical section.
    ///
    /// The closure gets `&T` and cannot mutate the stored value. Under
    /// [`RwStrategy`](crate::RwStrategy) several `with` calls may run
    /// concurrently.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.lock.with_read(|| {
            // SAFETY: the LockStrategy contract excludes writers from read
            // sections; anything running concurrently also takes only &T.
            f(unsafe { &*self.value.get() })
        })
    }

    /// Clones the current value out of a shared critical section.
    ///
    /// "Unsafe" in the contract sense, not the memory sense: the copy is
    /// coherent at the moment the lock is held, and stale the moment it is
    /// released. Useful for diagnostics and tests; do not build invariants
    /// on what the value is *after* this returns.
    pub fn unsafe_read(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Returns the value without locking.
    ///
    /// Safe because `&mut self` proves no other thread holds any reference
    /// to this container.
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Consumes the container and returns the value. No lock needed.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T, L> fmt::Debug for Guarded<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reading the value here would take the lock inside Debug; don't.
        f.pad("Guarded { .. }")
    }
}
