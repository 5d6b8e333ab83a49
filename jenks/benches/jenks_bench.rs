//! Benchmarks for natural breaks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use floodlens_jenks::{Subset, natural_breaks, natural_breaks_subset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Posting counts with a long tail, like real account activity.
fn generate_counts(count: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| {
            let x: f64 = rng.r#gen();
            (1.0 / (1.0 - x * 0.99)).floor()
        })
        .collect()
}

fn bench_breaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("jenks_breaks");

    for size in [100, 500, 1000].iter() {
        let data = generate_counts(*size);

        group.bench_with_input(BenchmarkId::new("classes_5", size), size, |b, _| {
            b.iter(|| black_box(natural_breaks(&data, 5)));
        });
    }

    group.finish();
}

fn bench_subset(c: &mut Criterion) {
    let mut group = c.benchmark_group("jenks_subset");
    let data = generate_counts(20_000);

    for strategy in [Subset::Average, Subset::Random] {
        group.bench_function(format!("{strategy:?}"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| black_box(natural_breaks_subset(&data, 5, 500, strategy, &mut rng)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_breaks, bench_subset);
criterion_main!(benches);
