//! Sequential baseline: the ring state machine with no synchronization.

use crate::{DequeueError, EnqueueError};

/// Bounded FIFO ring for single-threaded use.
///
/// Shares its data model with [`CoarseQueue`](crate::CoarseQueue) and
/// [`SplitQueue`](crate::SplitQueue) but takes `&mut self` and pays no
/// locking cost, which makes it both a throughput ceiling and a correctness
/// oracle for the concurrent variants.
pub struct SeqQueue<T> {
    buffer: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> SeqQueue<T> {
    /// Creates a queue holding at most `capacity` elements.
    ///
    /// Returns `None` when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let buffer = (0..capacity).map(|_| None).collect();
        Some(SeqQueue {
            buffer,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Adds `value` at the back, or hands it back if the queue is full.
    pub fn enqueue(&mut self, value: T) -> Result<(), EnqueueError<T>> {
        if self.len == self.buffer.len() {
            return Err(EnqueueError(value));
        }
        self.buffer[self.tail] = Some(value);
        self.tail = (self.tail + 1) % self.buffer.len();
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the front element.
    pub fn dequeue(&mut self) -> Result<T, DequeueError> {
        if self.len == 0 {
            return Err(DequeueError);
        }
        let value = self.buffer[self.head].take().expect("occupied slot at head");
        self.head = (self.head + 1) % self.buffer.len();
        self.len -= 1;
        Ok(value)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no elements are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }

    /// Fixed capacity given at construction.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
