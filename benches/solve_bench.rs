use criterion::{criterion_group, criterion_main, Criterion};
use duffing::model::DuffingParams;
use duffing::sweep::sweep;
use duffing::{solve, SolveParams};
use std::hint::black_box;

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let p = SolveParams::new(1800.0, 100, 300.0, 0.0, 0.0, DuffingParams::default());

    group.bench_function("tmax_1800", |b| {
        b.iter(|| black_box(solve(black_box(&p)).map(|s| s.len())))
    });

    group.bench_function("tmax_1800_substeps_4", |b| {
        let p = p.with_substeps(4);
        b.iter(|| black_box(solve(black_box(&p)).map(|s| s.len())))
    });

    let drives: Vec<DuffingParams> = (1 ..= 8)
        .map(|i| DuffingParams::new(0.08 * i as f64, 0.02, 0.28))
        .collect();
    group.bench_function("sweep_8", |b| {
        b.iter(|| black_box(sweep(&p, &drives).len()))
    });

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
