//! Lock strategies: interchangeable critical-section providers.
//!
//! A [`LockStrategy`] knows how to take a shared or exclusive critical
//! section and run a closure inside it. The guarded container delegates
//! every access to its strategy, so the container's correctness never
//! depends on which concrete strategy is plugged in.
//!
//! # Contract
//!
//! Both operations acquire before calling the closure, invoke it exactly
//! once on the calling thread, and release on every exit path, including
//! panic unwind. Whatever the closure returns (or panics with) passes
//! through unchanged; a strategy adds no retry, suppression, or logging of
//! its own.
//!
//! Strategies backed by a primitive with a single acquisition mode must map
//! *both* operations to that exclusive mode: correctness outranks read-read
//! parallelism. Only [`RwStrategy`] lets concurrent reads overlap.

#![allow(unsafe_code)]

mod mutex;
mod queue;
mod rwlock;
mod semaphore;
mod spin;

pub use mutex::MutexLock;
pub use queue::QueueLock;
pub use rwlock::{RwLockInitError, RwStrategy};
pub use semaphore::SemaphoreLock;
pub use spin::SpinLock;

use std::sync::Arc;

/// A provider of shared and exclusive critical sections.
///
/// Implementations wrap one existing lock primitive and normalize it to this
/// interface. Acquisition has no timeout: the calling thread blocks (or
/// busy-waits, for [`SpinLock`]) until the primitive grants the section.
///
/// # Safety
///
/// The guarded container derives `&mut T` inside [`with_write`] and `&T`
/// inside [`with_read`], so the container's memory safety rests entirely on
/// this trait. An implementation must guarantee, per instance:
///
/// - a `with_write` section never overlaps any other section, read or
///   write;
/// - a `with_read` section never overlaps a `with_write` section.
///
/// An implementation that lets two write sections overlap hands safe code
/// two aliasing `&mut T`, which is undefined behavior.
///
/// [`with_write`]: Self::with_write
/// [`with_read`]: Self::with_read
pub unsafe trait LockStrategy {
    /// Runs `f` inside a shared (read) critical section and returns its
    /// result.
    ///
    /// Strategies without a distinct shared mode serialize this against
    /// everything else, which is stronger than required but never wrong.
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Runs `f` inside an exclusive (write) critical section and returns
    /// its result.
    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// A shared strategy handle.
///
/// One strategy instance normally belongs to exactly one container, but a
/// primitive that supports shared ownership may legally back several
/// containers through an `Arc`.
// SAFETY: every section is delegated to the one inner strategy, which
// upholds the exclusivity contract across all clones of the handle.
unsafe impl<L: LockStrategy> LockStrategy for Arc<L> {
    fn with_read<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).with_read(f)
    }

    fn with_write<R>(&self, f: impl FnOnce() -> R) -> R {
        (**self).with_write(f)
    }
}
