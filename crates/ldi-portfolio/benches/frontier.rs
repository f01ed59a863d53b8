use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ldi_math::{Array, Matrix};
use ldi_portfolio::FrontierEngine;

fn universe(n: usize) -> (Array, Matrix) {
    let er = Array::from_vec((0..n).map(|i| 0.04 + 0.01 * i as f64).collect());
    let vols: Vec<f64> = (0..n).map(|i| 0.10 + 0.02 * i as f64).collect();
    let cov = Matrix::from_fn(n, n, |i, j| {
        let rho = if i == j { 1.0 } else { 0.3 };
        rho * vols[i] * vols[j]
    });
    (er, cov)
}

fn bench_frontier(c: &mut Criterion) {
    let engine = FrontierEngine::default();
    let mut group = c.benchmark_group("build_frontier");
    for n in [2usize, 5, 10] {
        let (er, cov) = universe(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| engine.build_frontier(black_box(20), &er, &cov))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frontier);
criterion_main!(benches);
