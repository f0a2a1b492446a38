//! Producer-side latency benchmark for the SPSC ring.
//!
//! One producer (this thread) and one consumer (background thread) share a
//! 1024-slot ring of 64-byte records. The producer busy-polls claim + commit
//! and records the wall-clock cost of each write; the consumer drains with
//! peek + pop until the shutdown flag flips.
//!
//! Usage: `latency [iterations]` (default 10M)

use spscring::{channel, Backoff, Config};
use std::hint;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// 64-byte record: two header words plus opaque padding.
#[repr(C)]
#[derive(Clone, Copy)]
struct Payload {
    id: u64,
    ts_sent: u64,
    data: [u8; 48],
}

const DEFAULT_OPS: usize = 10_000_000;
const RING_BITS: u8 = 10; // 1024 slots

fn print_stats(latencies: &[f64]) {
    if latencies.is_empty() {
        println!("no samples recorded");
        return;
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pct = |p: f64| sorted[((sorted.len() as f64 * p) as usize).min(sorted.len() - 1)];

    println!("\n[Latency Statistics (ns)]");
    println!("-------------------------");
    println!("  Min: {:.1}", sorted[0]);
    println!("  P50: {:.1}", pct(0.50));
    println!("  P99: {:.1}", pct(0.99));
    println!("  P99.9: {:.1}", pct(0.999));
    println!("  Max: {:.1}", sorted[sorted.len() - 1]);

    let sum: f64 = sorted.iter().sum();
    println!("  Avg: {:.1}", sum / sorted.len() as f64);
}

fn main() {
    let ops = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_OPS);

    let (mut producer, mut consumer) = channel::<Payload>(Config::new(RING_BITS));
    let running = Arc::new(AtomicBool::new(true));
    let mut latencies: Vec<f64> = Vec::with_capacity(ops);

    let reader = {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            // Emulate minimal processing so the reads are not optimized out
            let mut checksum = 0u64;
            while running.load(Ordering::Relaxed) {
                if let Some(record) = consumer.peek() {
                    checksum ^= record.id ^ record.ts_sent ^ u64::from(record.data[0]);
                    consumer.pop();
                } else {
                    hint::spin_loop();
                }
            }
            // Drain whatever the producer committed after the flag check
            while let Some(record) = consumer.try_pop() {
                checksum ^= record.id;
            }
            hint::black_box(checksum);
        })
    };

    println!("[*] Warming up...");
    thread::sleep(Duration::from_secs(1));

    println!("[*] Running {ops} iterations...");
    let epoch = Instant::now();

    for i in 0..ops {
        let t1 = Instant::now();

        let mut wait = Backoff::new();
        loop {
            if let Some(mut slot) = producer.claim_for_write() {
                // Populate the 64-byte record in place, skipping the stack
                // copy a whole-struct write would cost on the hot path.
                let record = slot.as_mut_ptr();
                // SAFETY: every field is written before the unchecked commit
                unsafe {
                    ptr::addr_of_mut!((*record).id).write(i as u64);
                    ptr::addr_of_mut!((*record).ts_sent)
                        .write(epoch.elapsed().as_nanos() as u64);
                    ptr::addr_of_mut!((*record).data).write([0; 48]);
                    slot.commit_unchecked();
                }
                break;
            }
            wait.spin();
        }

        // Single-sided measurement: claim + populate + commit overhead on
        // the producer's critical path, not round-trip delivery time.
        latencies.push(t1.elapsed().as_nanos() as f64);
    }

    running.store(false, Ordering::Relaxed);
    reader.join().expect("consumer thread panicked");

    print_stats(&latencies);
}
