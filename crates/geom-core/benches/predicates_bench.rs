//! Criterion benchmarks for the L3 adaptive predicates.
//! Focus sizes: input magnitude regimes where the stage-1 filter
//! always resolves vs. near-degenerate inputs that force stage 2/3.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geom_core::geom2::Point;
use geom_core::predicates::{in_circle, orientation};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_point(rng: &mut StdRng, scale: f64) -> Point<f64> {
    Point::xy(rng.gen_range(-scale..scale), rng.gen_range(-scale..scale))
}

fn bench_orientation(c: &mut Criterion) {
    let mut group = c.benchmark_group("orientation");
    for &scale in &[1.0, 1e6, 1e-6] {
        group.bench_with_input(BenchmarkId::new("well_separated", scale as i64), &scale, |b, &scale| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter_batched(
                || (random_point(&mut rng, scale), random_point(&mut rng, scale), random_point(&mut rng, scale)),
                |(a, bb, cc)| orientation(&a, &bb, &cc),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("near_collinear", |b| {
        let a = Point::xy(0.0, 0.0);
        let bb = Point::xy(1.0, 1.0);
        let cc = Point::xy(2.0, 2.0 + 1e-15);
        b.iter(|| orientation(&a, &bb, &cc))
    });
    group.finish();
}

fn bench_in_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("in_circle");
    group.bench_function("well_separated", |b| {
        let mut rng = StdRng::seed_from_u64(11);
        b.iter_batched(
            || {
                (
                    random_point(&mut rng, 10.0),
                    random_point(&mut rng, 10.0),
                    random_point(&mut rng, 10.0),
                    random_point(&mut rng, 10.0),
                )
            },
            |(a, bb, cc, d)| in_circle(&a, &bb, &cc, &d),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("near_cocircular", |b| {
        let a = Point::xy(0.0, 0.0);
        let bb = Point::xy(4.0, 0.0);
        let cc = Point::xy(0.0, 4.0);
        let d = Point::xy(4.0, 4.0 + 1e-14);
        b.iter(|| in_circle(&a, &bb, &cc, &d))
    });
    group.finish();
}

criterion_group!(benches, bench_orientation, bench_in_circle);
criterion_main!(benches);
