//! Producer/consumer walkthrough over the split-lock queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use twolock::SplitQueue;

const PRODUCERS: usize = 4;
const CONSUMERS: usize = 4;
const ITEMS_PER_PRODUCER: usize = 1000;

fn main() {
    let total = PRODUCERS * ITEMS_PER_PRODUCER;
    let queue = Arc::new(SplitQueue::<usize>::with_capacity(128).expect("capacity > 0"));
    let consumed = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();

    for p in 0..PRODUCERS {
        let q = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..ITEMS_PER_PRODUCER {
                let value = p * ITEMS_PER_PRODUCER + i;
                // Non-blocking enqueue: spin until a slot frees up.
                while q.enqueue(value).is_err() {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    for _ in 0..CONSUMERS {
        let q = Arc::clone(&queue);
        let consumed = Arc::clone(&consumed);
        handles.push(thread::spawn(move || {
            while consumed.load(Ordering::Relaxed) < total {
                if q.dequeue().is_ok() {
                    consumed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    println!("produced: {}", total);
    println!("consumed: {}", consumed.load(Ordering::Relaxed));
    println!("empty? {}", queue.is_empty());
}
