//! CSV benchmark grid: one line per (impl, capacity, P, C) cell, suitable for
//! plotting. Same harness as `benchmark_table`, machine-readable output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use twolock::{CoarseQueue, ConcurrentQueue, SplitQueue};

const CAPACITIES: [usize; 3] = [64, 256, 1024];
const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];
const ITEMS: usize = 100_000;

fn main() {
    println!("impl,cap,P,C,items,time_s,throughput_ops_per_s");
    for &cap in &CAPACITIES {
        for &pc in &THREAD_COUNTS {
            let queue = Arc::new(SplitQueue::<usize>::with_capacity(cap).expect("capacity > 0"));
            print_line("split", cap, pc, run_once(queue, pc, pc));

            let queue = Arc::new(CoarseQueue::<usize>::with_capacity(cap).expect("capacity > 0"));
            print_line("coarse", cap, pc, run_once(queue, pc, pc));
        }
    }
}

fn run_once<Q>(queue: Arc<Q>, producers: usize, consumers: usize) -> Duration
where
    Q: ConcurrentQueue<usize> + 'static,
{
    let total = producers * ITEMS;
    let consumed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();
    let mut handles = Vec::new();

    for p in 0..producers {
        let q = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            for i in 0..ITEMS {
                while q.enqueue(p * ITEMS + i).is_err() {
                    std::hint::spin_loop();
                }
            }
        }));
    }

    for _ in 0..consumers {
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

    start.elapsed()
}

fn print_line(name: &str, cap: usize, pc: usize, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    // enqueue + dequeue both count as operations
    let ops = (2 * pc * ITEMS) as f64 / secs;
    println!("{},{},{},{},{},{:.6},{:.1}", name, cap, pc, pc, ITEMS, secs, ops);
}
