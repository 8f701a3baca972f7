//! Coarse-lock variant: one mutex serializes every operation.

use crate::sync::{lock, Mutex};
use crate::{ConcurrentQueue, DequeueError, EnqueueError};

struct Ring<T> {
    buffer: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

/// Bounded MPMC FIFO guarded by a single mutex.
///
/// Correct under any number of producers and consumers, but every operation
/// serializes against every other, so the whole queue admits one operation at
/// a time. [`SplitQueue`](crate::SplitQueue) relaxes exactly that.
pub struct CoarseQueue<T> {
    ring: Mutex<Ring<T>>,
    capacity: usize,
}

impl<T> CoarseQueue<T> {
    /// Creates a queue holding at most `capacity` elements.
    ///
    /// Returns `None` when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let buffer = (0..capacity).map(|_| None).collect();
        Some(CoarseQueue {
            ring: Mutex::new(Ring {
                buffer,
                head: 0,
                tail: 0,
                len: 0,
            }),
            capacity,
        })
    }

    /// Adds `value` at the back, or hands it back if the queue is full.
    pub fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        let mut guard = lock(&self.ring);
        let ring = &mut *guard;
        if ring.len == self.capacity {
            return Err(EnqueueError(value));
        }
        ring.buffer[ring.tail] = Some(value);
        ring.tail = (ring.tail + 1) % self.capacity;
        ring.len += 1;
        Ok(())
    }

    /// Removes and returns the front element.
    pub fn dequeue(&self) -> Result<T, DequeueError> {
        let mut guard = lock(&self.ring);
        let ring = &mut *guard;
        if ring.len == 0 {
            return Err(DequeueError);
        }
        let value = ring.buffer[ring.head].take().expect("occupied slot at head");
        ring.head = (ring.head + 1) % self.capacity;
        ring.len -= 1;
        Ok(value)
    }

    /// Number of live elements. Takes the lock.
    pub fn len(&self) -> usize {
        lock(&self.ring).len
    }

    /// True when no elements are live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Fixed capacity given at construction. Immutable, so no lock is taken.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Send> ConcurrentQueue<T> for CoarseQueue<T> {
    fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        CoarseQueue::enqueue(self, value)
    }

    fn dequeue(&self) -> Result<T, DequeueError> {
        CoarseQueue::dequeue(self)
    }

    fn len(&self) -> usize {
        CoarseQueue::len(self)
    }

    fn capacity(&self) -> usize {
        CoarseQueue::capacity(self)
    }
}
