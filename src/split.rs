//! Split-lock variant: the two-lock queue.
//!
//! Producers serialize on the tail lock and consumers on the head lock; the
//! live count is the one field both sides mutate, maintained with atomic
//! increments and decrements rather than either lock. A producer and a
//! consumer can always run their critical sections at the same time; only
//! same-role callers queue up.
//!
//! The count read under a lock may be stale by the other side's in-flight
//! operation. That staleness is benign: the check only ever admits the single
//! lock holder, so the capacity bound cannot be overshot and an empty queue
//! cannot be over-drained.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use crossbeam_utils::CachePadded;

use crate::sync::{lock, AtomicUsize, Mutex, Ordering};
use crate::{ConcurrentQueue, DequeueError, EnqueueError};

/// Bounded MPMC FIFO with independent producer and consumer locks.
pub struct SplitQueue<T> {
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    capacity: usize,
    /// Next slot to fill; owned by whoever holds the producer lock.
    tail: CachePadded<Mutex<usize>>,
    /// Next element to remove; owned by whoever holds the consumer lock.
    head: CachePadded<Mutex<usize>>,
    /// Live element count; the only field shared by both lock domains.
    len: CachePadded<AtomicUsize>,
}

unsafe impl<T: Send> Send for SplitQueue<T> {}
unsafe impl<T: Send> Sync for SplitQueue<T> {}

impl<T> SplitQueue<T> {
    /// Creates a queue holding at most `capacity` elements.
    ///
    /// Returns `None` when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let buffer = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        Some(SplitQueue {
            buffer,
            capacity,
            tail: CachePadded::new(Mutex::new(0)),
            head: CachePadded::new(Mutex::new(0)),
            len: CachePadded::new(AtomicUsize::new(0)),
        })
    }

    /// Adds `value` at the back, or hands it back if the queue is full.
    ///
    /// Contends only with other producers, never with consumers.
    pub fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        let mut tail = lock(&self.tail);
        // Acquire pairs with the Release in `dequeue`: once a freed slot is
        // visible through `len`, the consumer's read of it has completed.
        if self.len.load(Ordering::Acquire) == self.capacity {
            return Err(EnqueueError(value));
        }
        unsafe { (*self.buffer[*tail].get()).write(value) };
        *tail = (*tail + 1) % self.capacity;
        // Release publishes the slot write before the new count is visible.
        self.len.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Removes and returns the front element.
    ///
    /// Contends only with other consumers, never with producers.
    pub fn dequeue(&self) -> Result<T, DequeueError> {
        let mut head = lock(&self.head);
        // Acquire pairs with the Release in `enqueue`: the slot write is
        // complete before a non-zero count is observed.
        if self.len.load(Ordering::Acquire) == 0 {
            return Err(DequeueError);
        }
        let value = unsafe { (*self.buffer[*head].get()).assume_init_read() };
        *head = (*head + 1) % self.capacity;
        // Release publishes the slot read before the slot is handed back.
        self.len.fetch_sub(1, Ordering::Release);
        Ok(value)
    }

    /// Number of live elements, read without taking either lock.
    ///
    /// Under concurrency the value may already be stale when returned, but it
    /// was exact at some instant.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// True when no elements are live. Lock-free, same staleness as [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the queue is at capacity. Lock-free, same staleness as [`len`](Self::len).
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Fixed capacity given at construction.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Send> ConcurrentQueue<T> for SplitQueue<T> {
    fn enqueue(&self, value: T) -> Result<(), EnqueueError<T>> {
        SplitQueue::enqueue(self, value)
    }

    fn dequeue(&self) -> Result<T, DequeueError> {
        SplitQueue::dequeue(self)
    }

    fn len(&self) -> usize {
        SplitQueue::len(self)
    }

    fn capacity(&self) -> usize {
        SplitQueue::capacity(self)
    }
}

impl<T> Drop for SplitQueue<T> {
    fn drop(&mut self) {
        let head = *lock(&self.head);
        let len = self.len.load(Ordering::Acquire);
        for i in 0..len {
            let idx = (head + i) % self.capacity;
            unsafe { (*self.buffer[idx].get()).assume_init_drop() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_roundtrip() {
        let q = SplitQueue::with_capacity(4).unwrap();
        for i in 0..4 {
            q.enqueue(i).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.enqueue(99), Err(EnqueueError(99)));
        for i in 0..4 {
            assert_eq!(q.dequeue(), Ok(i));
        }
        assert_eq!(q.dequeue(), Err(DequeueError));
    }

    #[test]
    fn wraparound() {
        let q = SplitQueue::with_capacity(3).unwrap();
        q.enqueue(10).unwrap();
        q.enqueue(20).unwrap();
        q.enqueue(30).unwrap();
        assert_eq!(q.dequeue(), Ok(10));
        q.enqueue(40).unwrap();
        assert!(q.is_full());
        assert_eq!(q.dequeue(), Ok(20));
        assert_eq!(q.dequeue(), Ok(30));
        assert_eq!(q.dequeue(), Ok(40));
        assert!(q.is_empty());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(SplitQueue::<i32>::with_capacity(0).is_none());
    }
}
