use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tagmatch::{
    BitTag, HammingMetric, MatchBin, Metric, RankedSelector, RouletteConfig, RouletteSelector,
    SlideMod, StreakMetric,
};

/// Deterministic pseudo-random tag material without an RNG dependency.
fn scrambled(index: u64) -> u64 {
    index.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(17)
}

fn populate_hamming(
    bin: &mut MatchBin<u64, HammingMetric, RankedSelector>,
    width: usize,
    count: usize,
) {
    for i in 0..count {
        bin.put(BitTag::from_u64(width, scrambled(i as u64)), i as u64);
    }
}

/// Benchmark the distance kernels on 64-bit tags
fn bench_metric_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("metric_kernels");

    let a = BitTag::from_u64(64, scrambled(1));
    let b = BitTag::from_u64(64, scrambled(2));

    let hamming = HammingMetric::new(64);
    group.bench_function("hamming_64", |bench| {
        bench.iter(|| hamming.distance(black_box(&a), black_box(&b)));
    });

    let streak = StreakMetric::new(64);
    group.bench_function("streak_64", |bench| {
        bench.iter(|| streak.distance(black_box(&a), black_box(&b)));
    });

    let slide = SlideMod::new(HammingMetric::new(64));
    group.bench_function("slide_hamming_64", |bench| {
        bench.iter(|| slide.distance(black_box(&a), black_box(&b)));
    });

    group.finish();
}

/// Benchmark ranked queries with different bin sizes
fn bench_query_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_scale");

    for &size in [100, 1_000, 10_000].iter() {
        let mut bin = MatchBin::new(HammingMetric::new(64), RankedSelector::new(None));
        populate_hamming(&mut bin, 64, size);
        let query = BitTag::from_u64(64, scrambled(999));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("entries_{}", size), |bench| {
            bench.iter(|| {
                let hits = bin.query_ids(black_box(&query), 10);
                black_box(hits);
            });
        });
    }

    group.finish();
}

/// Benchmark selector policies over the same candidate pool
fn bench_selector_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector_policies");
    let query = BitTag::from_u64(64, scrambled(999));

    let mut ranked = MatchBin::new(HammingMetric::new(64), RankedSelector::new(Some(0.75)));
    populate_hamming(&mut ranked, 64, 1_000);
    group.bench_function("ranked_1000", |bench| {
        bench.iter(|| {
            let hits = ranked.query_ids(black_box(&query), 10);
            black_box(hits);
        });
    });

    let mut roulette = MatchBin::new(
        HammingMetric::new(64),
        RouletteSelector::from_seed(RouletteConfig::default(), 0xBEEF).expect("valid config"),
    );
    for i in 0..1_000 {
        roulette.put(BitTag::from_u64(64, scrambled(i)), i);
    }
    group.bench_function("roulette_1000", |bench| {
        bench.iter(|| {
            let hits = roulette.query_ids(black_box(&query), 10);
            black_box(hits);
        });
    });

    group.finish();
}

/// Benchmark result limits on a fixed bin
fn bench_result_limits(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_limits");
    let mut bin = MatchBin::new(HammingMetric::new(64), RankedSelector::new(None));
    populate_hamming(&mut bin, 64, 1_000);
    let query = BitTag::from_u64(64, scrambled(999));

    for limit in [1, 5, 10, 100].iter() {
        group.bench_function(format!("limit_{}", limit), |bench| {
            bench.iter(|| {
                let hits = bin.query_ids(black_box(&query), *limit);
                black_box(hits);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_metric_kernels,
    bench_query_scale,
    bench_selector_policies,
    bench_result_limits
);
criterion_main!(benches);
