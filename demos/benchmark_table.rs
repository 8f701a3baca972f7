//! Multi-trial benchmark table: both concurrent variants over a grid of
//! capacities and thread counts, plus the sequential baseline, printed as
//! human-readable tables. Use `bench_csv` for machine-readable output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use twolock::{CoarseQueue, ConcurrentQueue, SeqQueue, SplitQueue};

const CAPACITIES: [usize; 3] = [64, 256, 1024];
const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];
const ITEMS: usize = 100_000;
const TRIALS: usize = 5;

struct TrialStats {
    avg: Duration,
    min: Duration,
    max: Duration,
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║ twolock benchmark: {} items per producer, {} trials per cell ║", ITEMS, TRIALS);
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    print_header();
    for &cap in &CAPACITIES {
        for &pc in &THREAD_COUNTS {
            let stats = run_trials(|| {
                Arc::new(SplitQueue::<usize>::with_capacity(cap).expect("capacity > 0"))
            }, pc, pc);
            print_row("split", cap, pc, pc, &stats);

            let stats = run_trials(|| {
                Arc::new(CoarseQueue::<usize>::with_capacity(cap).expect("capacity > 0"))
            }, pc, pc);
            print_row("coarse", cap, pc, pc, &stats);
        }
    }
    print_footer();
    println!();

    print_header_seq();
    for &cap in &CAPACITIES {
        let stats = run_seq_trials(cap);
        print_row_seq("seq", cap, &stats);
    }
    print_footer_seq();
}

/// One concurrent run: P producers push P*ITEMS tagged values, C consumers
/// drain until everything is accounted for.
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

fn run_trials<Q, F>(make_queue: F, producers: usize, consumers: usize) -> TrialStats
where
    Q: ConcurrentQueue<usize> + 'static,
    F: Fn() -> Arc<Q>,
{
    let times: Vec<Duration> = (0..TRIALS)
        .map(|_| run_once(make_queue(), producers, consumers))
        .collect();
    summarize(&times)
}

/// Sequential baseline: fill-to-capacity / drain batches until ITEMS values
/// have passed through.
fn run_seq_trials(cap: usize) -> TrialStats {
    let times: Vec<Duration> = (0..TRIALS)
        .map(|_| {
            let mut queue = SeqQueue::<usize>::with_capacity(cap).expect("capacity > 0");
            let start = Instant::now();
            let mut remaining = ITEMS;
            while remaining > 0 {
                let batch = remaining.min(cap);
                for i in 0..batch {
                    queue.enqueue(i).expect("queue has room");
                }
                for _ in 0..batch {
                    queue.dequeue().expect("queue has elements");
                }
                remaining -= batch;
            }
            start.elapsed()
        })
        .collect();
    summarize(&times)
}

fn summarize(times: &[Duration]) -> TrialStats {
    let total: Duration = times.iter().sum();
    TrialStats {
        avg: total / times.len() as u32,
        min: times.iter().min().copied().unwrap_or_default(),
        max: times.iter().max().copied().unwrap_or_default(),
    }
}

fn print_header() {
    println!("┌──────────┬──────┬───┬───┬────────┬────────┬────────────┬────────────┬────────────┬──────────────────────┐");
    println!("│ impl     │ cap  │ P │ C │ items  │ trials │ time_avg_s │ time_min_s │ time_max_s │ throughput_ops_per_s │");
    println!("├──────────┼──────┼───┼───┼────────┼────────┼────────────┼────────────┼────────────┼──────────────────────┤");
}

fn print_row(name: &str, cap: usize, producers: usize, consumers: usize, stats: &TrialStats) {
    // enqueue + dequeue both count as operations
    let ops = (2 * producers * ITEMS) as f64 / stats.avg.as_secs_f64();
    println!(
        "│ {:<8} │ {:>4} │ {:>1} │ {:>1} │ {:>6} │ {:>6} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>20.1} │",
        name,
        cap,
        producers,
        consumers,
        ITEMS,
        TRIALS,
        stats.avg.as_secs_f64(),
        stats.min.as_secs_f64(),
        stats.max.as_secs_f64(),
        ops,
    );
}

fn print_footer() {
    println!("└──────────┴──────┴───┴───┴────────┴────────┴────────────┴────────────┴────────────┴──────────────────────┘");
}

fn print_header_seq() {
    println!("┌──────────┬──────┬────────┬────────┬────────────┬────────────┬────────────┬──────────────────────┐");
    println!("│ impl     │ cap  │ items  │ trials │ time_avg_s │ time_min_s │ time_max_s │ throughput_ops_per_s │");
    println!("├──────────┼──────┼────────┼────────┼────────────┼────────────┼────────────┼──────────────────────┤");
}

fn print_row_seq(name: &str, cap: usize, stats: &TrialStats) {
    let ops = (2 * ITEMS) as f64 / stats.avg.as_secs_f64();
    println!(
        "│ {:<8} │ {:>4} │ {:>6} │ {:>6} │ {:>10.4} │ {:>10.4} │ {:>10.4} │ {:>20.1} │",
        name,
        cap,
        ITEMS,
        TRIALS,
        stats.avg.as_secs_f64(),
        stats.min.as_secs_f64(),
        stats.max.as_secs_f64(),
        ops,
    );
}

fn print_footer_seq() {
    println!("└──────────┴──────┴────────┴────────┴────────────┴────────────┴────────────┴──────────────────────┘");
}
