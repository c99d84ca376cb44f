//! Benchmarks for the quadtree and IDTP gridding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spatia_algorithms::interpolation::{idtp, DataTuple, IdtpParams, Quadtree, SpatialIndex};
use spatia_core::Envelope;

fn create_samples(n: usize) -> Vec<DataTuple> {
    // Deterministic scatter over [0, 1000] x [0, 1000]
    (0..n)
        .map(|i| {
            let x = ((i * 7919) % 10007) as f64 / 10.007;
            let y = ((i * 104729) % 10009) as f64 / 10.009;
            let value = (x / 50.0).sin() * 100.0 + y / 10.0;
            DataTuple::new(x, y, value)
        })
        .collect()
}

fn bench_quadtree_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_query");

    for n in [1_000, 10_000, 100_000].iter() {
        let tree = Quadtree::from_items(create_samples(*n)).unwrap();
        let window = Envelope::new(450.0, 450.0, 550.0, 550.0);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| tree.query(black_box(&window)).unwrap().len())
        });
    }

    group.finish();
}

fn bench_idtp(c: &mut Criterion) {
    let mut group = c.benchmark_group("idtp");
    group.sample_size(10);

    let tree = Quadtree::from_items(create_samples(20_000)).unwrap();
    let params = IdtpParams {
        radius_x: Some(25.0),
        radius_y: Some(25.0),
        radius_increase_x: 25.0,
        radius_increase_y: 25.0,
        ..Default::default()
    };

    for size in [64, 128, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| idtp(black_box(&tree), size, size, params.clone()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_quadtree_query, bench_idtp);
criterion_main!(benches);
