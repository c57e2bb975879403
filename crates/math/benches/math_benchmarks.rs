//! Benchmarks for quadrant-math operations.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ndarray::Array2;
use quadrant_math::{Pca, rolling_mean, symmetric_eigen};
use rand::Rng;

fn random_matrix(rows: usize, cols: usize) -> Array2<f64> {
    let mut rng = rand::thread_rng();
    Array2::from_shape_fn((rows, cols), |_| rng.r#gen::<f64>() * 2.0 - 1.0)
}

fn bench_symmetric_eigen(c: &mut Criterion) {
    let mut group = c.benchmark_group("symmetric_eigen");

    for size in [4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let x = random_matrix(size * 4, size);
            let cov = x.t().dot(&x);
            b.iter(|| symmetric_eigen(black_box(&cov)).unwrap());
        });
    }

    group.finish();
}

fn bench_pca_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("pca_fit");

    for (months, variables) in [(60, 6), (240, 12), (480, 24)] {
        group.throughput(Throughput::Elements((months * variables) as u64));
        group.bench_with_input(
            BenchmarkId::new("two_components", format!("{months}_{variables}")),
            &(months, variables),
            |b, &(months, variables)| {
                let x = random_matrix(months, variables);
                let pca = Pca::new(2);
                b.iter(|| pca.fit(black_box(x.view())).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_rolling_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_mean");

    for size in [120, 1200, 12000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut rng = rand::thread_rng();
            let data: Vec<Option<f64>> = (0..size).map(|_| Some(rng.r#gen::<f64>())).collect();
            b.iter(|| rolling_mean(black_box(&data), 5));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_symmetric_eigen, bench_pca_fit, bench_rolling_mean);

criterion_main!(benches);
