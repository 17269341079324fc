use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use epochcoin_lib::commands::generate_epoch;
use epochcoin_lib::{BatchProcessor, EcdsaVerifier, MaxFeeSelector, SelectionPolicy};

fn apply_batch_benchmark(c: &mut Criterion) {
    const COIN_COUNT: usize = 64;
    let (pool, candidates) = generate_epoch(7, COIN_COUNT, None);
    let verifier = EcdsaVerifier::new();
    let processor = BatchProcessor::new(&verifier);

    // Signature verification dominates, so throughput in candidates per
    // second is the number to watch here.
    let mut group = c.benchmark_group("Batch processing");
    group.throughput(Throughput::Elements(candidates.len() as u64));
    group.bench_function("apply in arrival order", |b| {
        b.iter(|| {
            let outcome = processor.apply(black_box(&candidates), black_box(&pool));
            black_box(outcome);
        })
    });
    group.finish();
}

fn greedy_selection_benchmark(c: &mut Criterion) {
    const COIN_COUNT: usize = 64;
    let (pool, candidates) = generate_epoch(7, COIN_COUNT, None);
    let verifier = EcdsaVerifier::new();
    let selector = MaxFeeSelector::new(&verifier, SelectionPolicy::GreedyByFee);

    let mut group = c.benchmark_group("Max-fee selection");
    group.throughput(Throughput::Elements(candidates.len() as u64));
    group.bench_function("greedy-by-fee select", |b| {
        b.iter(|| {
            let outcome = selector.select(black_box(&candidates), black_box(&pool));
            black_box(outcome);
        })
    });
    group.finish();
}

criterion_group!(benches, apply_batch_benchmark, greedy_selection_benchmark);

criterion_main!(benches);
