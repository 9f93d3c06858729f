//! A guarded value with pluggable lock strategies.
//!
//! [`Guarded`] owns a single mutable value and only hands it out inside a
//! critical section taken through its lock strategy. The classic failure this
//! prevents is the read-then-write race: two threads both read a counter,
//! both compute `old + 1`, and one increment is lost. With [`Guarded`], the
//! whole read-compute-write sequence runs under one lock acquisition.
//!
//! # Lock strategies
//!
//! The strategy is chosen at construction and fixed for the container's
//! lifetime. All strategies implement [`LockStrategy`]:
//!
//! - [`SemaphoreLock`]: counting semaphore; one permit gives mutual
//!   exclusion (the default).
//! - [`QueueLock`]: labeled FIFO serial execution context.
//! - [`RwStrategy`]: OS reader-writer lock; the only strategy that lets
//!   concurrent reads overlap.
//! - [`MutexLock`]: plain exclusive mutex.
//! - [`SpinLock`]: busy-waiting exclusive lock for very short sections.
//!
//! # Example
//!
//! ```
//! use guarded::Guarded;
//!
//! let count = Guarded::new(0_u64);
//!
//! // Read old, compute, write new: one atomic unit.
//! count.update(|c| *c += 1);
//!
//! let doubled = count.with(|c| *c * 2);
//! assert_eq!(doubled, 2);
//! ```
//!
//! Any strategy can be injected without changing the container's contract:
//!
//! ```
//! use guarded::{Guarded, RwStrategy};
//!
//! let cache = Guarded::with_lock(String::from("warm"), RwStrategy::new()?);
//! assert_eq!(cache.with(|s| s.len()), 4);
//! # Ok::<(), guarded::RwLockInitError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod guarded;
pub mod lock;

pub use guarded::Guarded;
pub use lock::{
    LockStrategy, MutexLock, QueueLock, RwLockInitError, RwStrategy, SemaphoreLock, SpinLock,
};
