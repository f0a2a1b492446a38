use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spscring::{channel, Config};
use std::thread;

const MESSAGES: u64 = 1_000_000;

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc_ring");
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("two_thread_transfer", |b| {
        b.iter(|| {
            let (mut producer, mut consumer) = channel::<u64>(Config::new(10));

            // Producer thread
            let writer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    loop {
                        if let Some(mut slot) = producer.claim_for_write() {
                            slot.write(i);
                            slot.commit();
                            break;
                        }
                        std::hint::spin_loop();
                    }
                }
            });

            // Consumer on the bench thread
            let mut received = 0u64;
            while received < MESSAGES {
                match consumer.try_pop() {
                    Some(value) => {
                        black_box(value);
                        received += 1;
                    }
                    None => std::hint::spin_loop(),
                }
            }

            writer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(1));

    // Claim/commit plus peek/pop with no other thread in sight: the floor
    // cost of the protocol itself.
    group.bench_function("claim_commit_peek_pop", |b| {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(10));
        b.iter(|| {
            let mut slot = producer.claim_for_write().unwrap();
            slot.write(black_box(42u64));
            slot.commit();

            black_box(consumer.peek().unwrap());
            consumer.pop();
        });
    });

    group.bench_function("try_push_try_pop", |b| {
        let (mut producer, mut consumer) = channel::<u64>(Config::new(10));
        b.iter(|| {
            assert!(producer.try_push(black_box(42u64)));
            black_box(consumer.try_pop().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_spsc, bench_uncontended);
criterion_main!(benches);
