//! Worker-pool demo: jobs flow in through one queue, results out through
//! another, with the producer and workers meeting only at the queues.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use twolock::CoarseQueue;

const NUM_WORKERS: usize = 4;
const NUM_JOBS: usize = 20;

fn main() {
    println!("Work Queue Example\n");

    let jobs = Arc::new(CoarseQueue::<String>::with_capacity(8).expect("capacity > 0"));
    let results = Arc::new(CoarseQueue::<String>::with_capacity(8).expect("capacity > 0"));
    let all_enqueued = Arc::new(AtomicBool::new(false));

    let jobs_tx = Arc::clone(&jobs);
    let enqueued_flag = Arc::clone(&all_enqueued);
    let producer = thread::spawn(move || {
        for i in 0..NUM_JOBS {
            let mut job = format!("job-{:02}", i);
            // The full error hands the job back, so the retry loop reuses it.
            loop {
                match jobs_tx.enqueue(job) {
                    Ok(()) => break,
                    Err(rejected) => {
                        job = rejected.0;
                        thread::sleep(Duration::from_millis(5));
                    }
                }
            }
            println!("enqueued job-{:02}", i);
        }
        enqueued_flag.store(true, Ordering::Release);
        println!("all jobs enqueued");
    });

    let mut workers = Vec::new();
    for worker_id in 0..NUM_WORKERS {
        let jobs_rx = Arc::clone(&jobs);
        let results_tx = Arc::clone(&results);
        let enqueued_flag = Arc::clone(&all_enqueued);

        workers.push(thread::spawn(move || {
            let mut processed = 0;
            loop {
                match jobs_rx.dequeue() {
                    Ok(job) => {
                        thread::sleep(Duration::from_millis(20));
                        let mut result = format!("{} done by worker {}", job, worker_id);
                        loop {
                            match results_tx.enqueue(result) {
                                Ok(()) => break,
                                Err(rejected) => {
                                    result = rejected.0;
                                    thread::sleep(Duration::from_millis(5));
                                }
                            }
                        }
                        processed += 1;
                    }
                    Err(_) => {
                        if enqueued_flag.load(Ordering::Acquire) && jobs_rx.is_empty() {
                            break;
                        }
                        thread::sleep(Duration::from_millis(5));
                    }
                }
            }
            println!("worker {} finished ({} jobs)", worker_id, processed);
        }));
    }

    let results_rx = Arc::clone(&results);
    let collector = thread::spawn(move || {
        let mut collected = 0;
        while collected < NUM_JOBS {
            match results_rx.dequeue() {
                Ok(result) => {
                    println!("result: {}", result);
                    collected += 1;
                }
                Err(_) => thread::sleep(Duration::from_millis(5)),
            }
        }
        println!("all results collected");
    });

    producer.join().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }
    collector.join().unwrap();
}
