use kmeans_core::clustering::{KMeans, KMeansParams};
use kmeans_core::distances::{euclidean, squared_euclidean};
use kmeans_core::io::VecSource;

use criterion::{black_box, criterion_group, criterion_main, measurement::WallTime, Criterion};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

fn generate_random_data(rows: usize, cols: usize, seed: u64) -> Array2<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    Array2::from_shape_fn((rows, cols), |_| StandardNormal.sample(&mut rng))
}

/// `per_center` Gaussian points around each of `centers` separated offsets
fn generate_blobs(centers: usize, per_center: usize, cols: usize, seed: u64) -> Vec<Vec<f64>> {
    let noise = generate_random_data(centers * per_center, cols, seed);
    noise
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let offset = (i / per_center) as f64 * 20.0;
            row.iter().map(|x| x + offset).collect()
        })
        .collect()
}

fn benchmark_distance_computation(c: &mut Criterion) {
    let data = generate_random_data(1000, 10, 42);
    let point1 = data.row(0);
    let point2 = data.row(1);

    c.bench_function("distance_computation_euclidean", |b| {
        b.iter(|| euclidean(black_box(&point1), black_box(&point2)));
    });

    c.bench_function("distance_computation_squared_euclidean", |b| {
        b.iter(|| squared_euclidean(black_box(&point1), black_box(&point2)));
    });
}

fn bench_kmeans_run(c: &mut Criterion) {
    let points = generate_blobs(8, 250, 16, 7);

    c.bench_function("kmeans_run_2000x16_k8", |b| {
        b.iter(|| {
            let source = VecSource::new(points.clone());
            let mut kmeans = KMeans::with_source(KMeansParams::new(16, 8), source)
                .expect("Failed to load points");
            kmeans.run().expect("Failed to run k-means");
            black_box(kmeans.score())
        });
    });
}

fn criterion_config() -> Criterion<WallTime> {
    Criterion::default().sample_size(20)
}

criterion_group!(
    name = benches;
    config = criterion_config();
    targets = benchmark_distance_computation, bench_kmeans_run
);
criterion_main!(benches);
