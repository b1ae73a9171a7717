//! Criterion benchmarks for Delaunay (L6) and constrained Delaunay
//! (L7) over increasing point counts.
//! Results: by default under target/criterion; to store under
//! data/bench, run: CARGO_TARGET_DIR=data/bench cargo bench -p geom-core

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use geom_core::cdt::constrained_delaunay;
use geom_core::delaunay::delaunay;
use geom_core::geom2::Point;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(n: usize, seed: u64) -> Vec<Point<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Point::xy(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))).collect()
}

fn bench_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay");
    for &n in &[10usize, 50, 200, 500] {
        group.bench_with_input(BenchmarkId::new("bowyer_watson", n), &n, |b, &n| {
            b.iter_batched(|| random_points(n, 99), |pts| delaunay(&pts).unwrap(), BatchSize::LargeInput)
        });
    }
    group.finish();
}

fn bench_constrained_delaunay(c: &mut Criterion) {
    let mut group = c.benchmark_group("constrained_delaunay");
    for &n in &[10usize, 50, 200] {
        group.bench_with_input(BenchmarkId::new("square_with_diagonal", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut pts = vec![Point::xy(0.0, 0.0), Point::xy(100.0, 0.0), Point::xy(100.0, 100.0), Point::xy(0.0, 100.0)];
                    pts.extend(random_points(n, 13));
                    pts
                },
                |pts| constrained_delaunay(&pts, &[(0, 2)]).unwrap(),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_delaunay, bench_constrained_delaunay);
criterion_main!(benches);
