use std::num::Wrapping;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use costream::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const STEPS: usize = 10_000;

fn fib_stream() -> Stream<Wrapping<u64>> {
    Stream::fix(|s| cons(Wrapping(0), s + cons(Wrapping(1), s)))
}

fn fib_loop(n: usize) -> Wrapping<u64> {
    let (mut a, mut b) = (Wrapping(0u64), Wrapping(1u64));
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

fn bench_fib(c: &mut Criterion) {
    // Every iteration builds a fresh stream so nothing is memoized across runs.
    c.bench_function("fib_stream_fresh", |b| {
        b.iter_batched(
            fib_stream,
            |fib| {
                let mut cursor = fib.begin();
                cursor.try_advance_n(STEPS).unwrap();
                black_box(cursor.get());
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("fib_loop", |b| b.iter(|| black_box(fib_loop(black_box(STEPS)))));
}

fn bench_memoized_reads(c: &mut Criterion) {
    let fib = fib_stream();
    fib.begin().try_advance_n(STEPS).unwrap();

    c.bench_function("fib_stream_memoized", |b| {
        b.iter(|| {
            let mut cursor = fib.begin();
            cursor.try_advance_n(STEPS).unwrap();
            black_box(cursor.get());
        })
    });
}

fn bench_algebra(c: &mut Criterion) {
    // Seeded so the operand streams are the same on every run.
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let seeds: Vec<i64> = (0..4).map(|_| rng.random_range(1..1000)).collect();

    c.bench_function("zip_chain_fresh", |b| {
        b.iter_batched(
            || {
                let a = Stream::iterate(seeds[0], |x| (x * 17 + 3) % 1009);
                let b = Stream::iterate(seeds[1], |x| (x * 13 + 7) % 1013);
                let d = Stream::repeat(seeds[2]);
                (a + b) * d - Stream::repeat(seeds[3])
            },
            |sum| black_box(sum.begin().nth(STEPS)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_clone(c: &mut Criterion) {
    let fib = fib_stream();
    fib.begin().try_advance_n(STEPS).unwrap();

    c.bench_function("clone_forced_prefix", |b| b.iter(|| black_box(fib.clone())));
}

criterion_group!(
    benches,
    bench_fib,
    bench_memoized_reads,
    bench_algebra,
    bench_clone,
);
criterion_main!(benches);
