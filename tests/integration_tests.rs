use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use twolock::{CoarseQueue, ConcurrentQueue, DequeueError, EnqueueError, SeqQueue, SplitQueue};

/// Drives `producers` x `items_per_producer` uniquely tagged values through
/// the queue with `consumers` draining threads, then checks conservation:
/// every value delivered exactly once, nothing dropped, final state empty.
fn check_conservation<Q>(
    queue: Arc<Q>,
    producers: usize,
    consumers: usize,
    items_per_producer: usize,
) where
    Q: ConcurrentQueue<usize> + 'static,
{
    let total = producers * items_per_producer;
    let consumed = Arc::new(AtomicUsize::new(0));
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();

    for p in 0..producers {
        let q = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..items_per_producer {
                let value = p * items_per_producer + i;
                while q.enqueue(value).is_err() {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    for _ in 0..consumers {
        let q = Arc::clone(&queue);
        let consumed = Arc::clone(&consumed);
        let delivered = Arc::clone(&delivered);
        handles.push(thread::spawn(move || {
            let mut local = Vec::new();
            loop {
                match q.dequeue() {
                    Ok(value) => {
                        local.push(value);
                        consumed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(_) => {
                        if consumed.load(Ordering::Relaxed) >= total {
                            break;
                        }
                        std::hint::spin_loop();
                    }
                }
            }
            delivered.lock().unwrap().extend(local);
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered.len(), total);
    let unique: HashSet<usize> = delivered.iter().copied().collect();
    assert_eq!(unique.len(), total, "a value was delivered twice");
    assert_eq!(
        delivered.iter().sum::<usize>(),
        (0..total).sum::<usize>(),
        "delivered values do not match enqueued values"
    );
    assert_eq!(queue.len(), 0);
    assert!(queue.is_empty());
}

#[test]
fn seq_fifo_order() {
    let mut queue = SeqQueue::with_capacity(16).unwrap();
    for i in 0..10 {
        queue.enqueue(i).unwrap();
    }
    for i in 0..10 {
        assert_eq!(queue.dequeue(), Ok(i));
    }
}

#[test]
fn coarse_fifo_order() {
    let queue = CoarseQueue::with_capacity(16).unwrap();
    for i in 0..10 {
        queue.enqueue(i).unwrap();
    }
    for i in 0..10 {
        assert_eq!(queue.dequeue(), Ok(i));
    }
}

#[test]
fn split_fifo_order() {
    let queue = SplitQueue::with_capacity(16).unwrap();
    for i in 0..10 {
        queue.enqueue(i).unwrap();
    }
    for i in 0..10 {
        assert_eq!(queue.dequeue(), Ok(i));
    }
}

#[test]
fn full_queue_rejects_without_mutating() {
    let queue = SplitQueue::with_capacity(4).unwrap();
    for i in 0..4 {
        assert!(queue.enqueue(i).is_ok());
    }
    assert!(queue.is_full());
    assert_eq!(queue.enqueue(99), Err(EnqueueError(99)));
    assert_eq!(queue.len(), 4);
    for i in 0..4 {
        assert_eq!(queue.dequeue(), Ok(i));
    }
}

#[test]
fn drained_queue_rejects_dequeue() {
    let queue = CoarseQueue::with_capacity(4).unwrap();
    queue.enqueue(1).unwrap();
    queue.enqueue(2).unwrap();
    assert_eq!(queue.dequeue(), Ok(1));
    assert_eq!(queue.dequeue(), Ok(2));
    assert!(queue.is_empty());
    assert_eq!(queue.dequeue(), Err(DequeueError));
}

#[test]
fn coarse_wraparound() {
    let queue = CoarseQueue::with_capacity(3).unwrap();
    queue.enqueue(10).unwrap();
    queue.enqueue(20).unwrap();
    queue.enqueue(30).unwrap();
    assert!(queue.is_full());
    assert_eq!(queue.dequeue(), Ok(10));
    queue.enqueue(40).unwrap();
    assert!(queue.is_full());
    assert_eq!(queue.dequeue(), Ok(20));
    assert_eq!(queue.dequeue(), Ok(30));
    assert_eq!(queue.dequeue(), Ok(40));
    assert!(queue.is_empty());
}

#[test]
fn capacity_is_reported_unchanged() {
    let queue = SplitQueue::<i32>::with_capacity(1024).unwrap();
    assert_eq!(queue.capacity(), 1024);
    let queue = CoarseQueue::<i32>::with_capacity(7).unwrap();
    assert_eq!(queue.capacity(), 7);
    let queue = SeqQueue::<i32>::with_capacity(1).unwrap();
    assert_eq!(queue.capacity(), 1);
}

#[test]
fn len_tracks_operations() {
    let queue = SplitQueue::with_capacity(8).unwrap();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);

    queue.enqueue(1).unwrap();
    queue.enqueue(2).unwrap();
    assert_eq!(queue.len(), 2);
    assert!(!queue.is_empty());
    assert!(!queue.is_full());

    queue.dequeue().unwrap();
    assert_eq!(queue.len(), 1);
}

#[test]
fn zero_capacity_rejected_everywhere() {
    assert!(SeqQueue::<i32>::with_capacity(0).is_none());
    assert!(CoarseQueue::<i32>::with_capacity(0).is_none());
    assert!(SplitQueue::<i32>::with_capacity(0).is_none());
}

#[test]
fn absent_handle_defaults() {
    let queue: Option<SplitQueue<i32>> = None;
    assert_eq!(queue.enqueue(7), Err(EnqueueError(7)));
    assert_eq!(queue.dequeue(), Err(DequeueError));
    assert!(queue.is_empty());
    assert!(!queue.is_full());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.capacity(), 0);
}

#[test]
fn present_handle_passes_through() {
    let queue = Some(CoarseQueue::with_capacity(2).unwrap());
    assert!(queue.enqueue(1).is_ok());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.dequeue(), Ok(1));
}

#[test]
fn rejected_value_is_handed_back() {
    let queue = SplitQueue::with_capacity(2).unwrap();
    queue.enqueue("first".to_string()).unwrap();
    queue.enqueue("second".to_string()).unwrap();
    match queue.enqueue("third".to_string()) {
        Err(EnqueueError(value)) => assert_eq!(value, "third"),
        Ok(()) => panic!("enqueue on a full queue must fail"),
    }
}

#[test]
fn split_spsc_preserves_order() {
    let queue = Arc::new(SplitQueue::with_capacity(128).unwrap());
    let q_send = Arc::clone(&queue);
    let q_recv = Arc::clone(&queue);

    let producer = thread::spawn(move || {
        for i in 0..10_000usize {
            while q_send.enqueue(i).is_err() {
                std::hint::spin_loop();
            }
        }
    });

    let consumer = thread::spawn(move || {
        for i in 0..10_000usize {
            loop {
                match q_recv.dequeue() {
                    Ok(value) => {
                        assert_eq!(value, i);
                        break;
                    }
                    Err(_) => std::hint::spin_loop(),
                }
            }
        }
    });

    producer.join().unwrap();
    consumer.join().unwrap();
}

#[test]
fn split_mpsc_preserves_per_producer_order() {
    const PRODUCERS: usize = 4;
    const ITEMS: usize = 2_500;

    let queue = Arc::new(SplitQueue::with_capacity(64).unwrap());
    let mut handles = Vec::new();

    for p in 0..PRODUCERS {
        let q = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..ITEMS {
                while q.enqueue(p * ITEMS + i).is_err() {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    let q = Arc::clone(&queue);
    let consumer = thread::spawn(move || {
        let mut last_seen = [None::<usize>; PRODUCERS];
        for _ in 0..PRODUCERS * ITEMS {
            loop {
                match q.dequeue() {
                    Ok(value) => {
                        let producer = value / ITEMS;
                        if let Some(previous) = last_seen[producer] {
                            assert!(previous < value, "producer {producer} order violated");
                        }
                        last_seen[producer] = Some(value);
                        break;
                    }
                    Err(_) => std::hint::spin_loop(),
                }
            }
        }
    });

    for h in handles {
        h.join().unwrap();
    }
    consumer.join().unwrap();
}

#[test]
fn split_mpmc_conservation() {
    let queue = Arc::new(SplitQueue::with_capacity(128).unwrap());
    check_conservation(queue, 4, 4, 2_500);
}

#[test]
fn coarse_mpmc_conservation() {
    let queue = Arc::new(CoarseQueue::with_capacity(128).unwrap());
    check_conservation(queue, 4, 4, 2_500);
}

#[test]
fn split_mpmc_capacity_one() {
    let queue = Arc::new(SplitQueue::with_capacity(1).unwrap());
    check_conservation(queue, 2, 2, 1_000);
}

#[test]
fn coarse_mpmc_capacity_one() {
    let queue = Arc::new(CoarseQueue::with_capacity(1).unwrap());
    check_conservation(queue, 2, 2, 1_000);
}

#[test]
fn split_drops_live_elements() {
    static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct DropCounter;

    impl Drop for DropCounter {
        fn drop(&mut self) {
            DROP_COUNT.fetch_add(1, Ordering::Relaxed);
        }
    }

    {
        let queue = SplitQueue::with_capacity(8).unwrap();
        for _ in 0..5 {
            queue.enqueue(DropCounter).unwrap();
        }
        // Two dequeued and dropped here; the queue still owns three.
        drop(queue.dequeue().unwrap());
        drop(queue.dequeue().unwrap());
    }

    assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 5);
}

#[test]
fn coarse_drops_live_elements() {
    static DROP_COUNT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct DropCounter;

    impl Drop for DropCounter {
        fn drop(&mut self) {
            DROP_COUNT.fetch_add(1, Ordering::Relaxed);
        }
    }

    {
        let queue = CoarseQueue::with_capacity(8).unwrap();
        for _ in 0..5 {
            queue.enqueue(DropCounter).unwrap();
        }
    }

    assert_eq!(DROP_COUNT.load(Ordering::Relaxed), 5);
}

#[test]
fn seq_matches_concurrent_variants_as_oracle() {
    // Same operation script against all three variants; results must agree.
    let script: Vec<Option<u32>> = vec![
        Some(1),
        Some(2),
        None,
        Some(3),
        None,
        None,
        None,
        Some(4),
        Some(5),
        Some(6),
        Some(7),
        None,
    ];

    let mut seq = SeqQueue::with_capacity(3).unwrap();
    let coarse = CoarseQueue::with_capacity(3).unwrap();
    let split = SplitQueue::with_capacity(3).unwrap();

    for step in script {
        match step {
            Some(value) => {
                let expected = seq.enqueue(value).is_ok();
                assert_eq!(coarse.enqueue(value).is_ok(), expected);
                assert_eq!(split.enqueue(value).is_ok(), expected);
            }
            None => {
                let expected = seq.dequeue().ok();
                assert_eq!(coarse.dequeue().ok(), expected);
                assert_eq!(split.dequeue().ok(), expected);
            }
        }
        assert_eq!(coarse.len(), seq.len());
        assert_eq!(split.len(), seq.len());
    }
}
