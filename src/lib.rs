//! twolock - bounded MPMC ring queue in three lock disciplines
//!
//! The same fixed-capacity circular buffer, offered three ways:
//!
//! - [`SplitQueue`]: the two-lock design. Producers serialize on a tail lock,
//!   consumers on a head lock, and the live count is an atomic shared by both
//!   sides, so a producer and a consumer never block each other.
//! - [`CoarseQueue`]: one mutex around the whole ring; the correctness
//!   baseline.
//! - [`SeqQueue`]: no synchronization at all; single-threaded baseline and
//!   throughput ceiling.
//!
//! Every operation is non-blocking: enqueue on a full queue and dequeue on an
//! empty queue fail immediately and the caller decides whether to spin, back
//! off, or give up.
#![warn(missing_docs)]

use core::fmt;

mod coarse;
mod seq;
mod split;
mod sync;

pub use coarse::CoarseQueue;
pub use seq::SeqQueue;
pub use split::SplitQueue;

/// The queue was full (or the handle absent); the rejected value is handed
/// back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueError<T>(pub T);

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}

impl<T: fmt::Debug> std::error::Error for EnqueueError<T> {}

/// The queue was empty (or the handle absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DequeueError;

impl fmt::Display for DequeueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is empty")
    }
}

impl std::error::Error for DequeueError {}

/// Common interface of the concurrent queue variants.
///
/// Callers that only need the queue contract stay generic over this trait and
/// are agnostic to the lock discipline behind it; the benchmark and test
/// drivers in this repository work that way.
pub trait ConcurrentQueue<T>: Send + Sync {
    /// Attempts to add `value` at the back of the queue.
    fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>>;

    /// Attempts to remove the front element.
    fn dequeue(&self) -> Result<T, DequeueError>;

    /// Number of live elements. May be transiently stale under concurrency.
    fn len(&self) -> usize;

    /// Fixed capacity given at construction.
    fn capacity(&self) -> usize;

    /// True when no elements are live.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the queue holds `capacity` elements.
    fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }
}

/// An absent handle behaves as a total function: enqueue and dequeue fail,
/// and the queue reads as permanently empty, never full, with zero capacity.
impl<T, Q: ConcurrentQueue<T>> ConcurrentQueue<T> for Option<Q> {
    fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        match self {
            Some(queue) => queue.enqueue(value),
            None => Err(EnqueueError(value)),
        }
    }

    fn dequeue(&self) -> Result<T, DequeueError> {
        match self {
            Some(queue) => queue.dequeue(),
            None => Err(DequeueError),
        }
    }

    fn len(&self) -> usize {
        self.as_ref().map_or(0, Q::len)
    }

    fn capacity(&self) -> usize {
        self.as_ref().map_or(0, Q::capacity)
    }

    fn is_empty(&self) -> bool {
        self.as_ref().map_or(true, Q::is_empty)
    }

    fn is_full(&self) -> bool {
        self.as_ref().map_or(false, Q::is_full)
    }
}
