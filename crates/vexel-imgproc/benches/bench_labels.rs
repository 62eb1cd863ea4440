use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vexel_imgproc::label::{
    build_touch_matrix, local_standard_deviation_touching_neighbor_count_map,
};
use vexel_imgproc::parallel::ExecutionStrategy;
use vexel_tensor::Tensor3;

fn create_label_volume(depth: usize, height: usize, width: usize) -> Tensor3<u32> {
    let mut rng = StdRng::seed_from_u64(42);
    // blocky labels so that neighbouring voxels mostly share a label
    let block_labels: Vec<u32> = (0..1024).map(|_| rng.random_range(0..256)).collect();
    Tensor3::from_shape_fn([depth, height, width], |[z, y, x]| {
        block_labels[((z / 4) * 97 + (y / 8) * 31 + x / 8) % block_labels.len()]
    })
    .unwrap()
}

fn bench_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("Labels");

    let (d, h, w) = (32, 256, 256);
    let labels = create_label_volume(d, h, w);

    for (name, strategy) in [
        ("serial", ExecutionStrategy::Serial),
        ("parallel_elements", ExecutionStrategy::ParallelElements),
        ("auto_rows", ExecutionStrategy::AutoRows(w)),
    ] {
        group.bench_with_input(
            BenchmarkId::new(format!("touch_matrix_{name}"), format!("{d}x{h}x{w}")),
            &labels,
            |b, labels| {
                b.iter(|| {
                    std::hint::black_box(build_touch_matrix(labels, strategy).unwrap());
                })
            },
        );
    }

    group.bench_with_input(
        BenchmarkId::new("std_touching_neighbor_count_map", format!("{d}x{h}x{w}")),
        &labels,
        |b, labels| {
            b.iter(|| {
                std::hint::black_box(
                    local_standard_deviation_touching_neighbor_count_map(
                        labels,
                        ExecutionStrategy::ParallelElements,
                    )
                    .unwrap(),
                );
            })
        },
    );

    group.finish();
}

criterion_group!(benches, bench_labels);
criterion_main!(benches);
