use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use linepack_sim::simulation::SimulationBuilder;
use linepack_sim::storage::NullRecorder;
use std::hint::black_box;

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");

    for communities in [10, 50, 200] {
        let size = 100;
        group.throughput(Throughput::Elements((communities * size) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(communities),
            &communities,
            |b, &communities| {
                b.iter_batched(
                    || {
                        SimulationBuilder::new()
                            .communities(communities)
                            .community_size(size)
                            .generations(1)
                            .max_packing_attempts(2_000)
                            .seed(42)
                            .build()
                            .unwrap()
                    },
                    |mut sim| black_box(sim.step(&mut NullRecorder).unwrap()),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_short_run(c: &mut Criterion) {
    c.bench_function("run_20_generations", |b| {
        b.iter_batched(
            || {
                SimulationBuilder::new()
                    .communities(20)
                    .community_size(50)
                    .generations(20)
                    .n_member(vec![0.01, 0.2], vec![0.5, 0.5])
                    .max_packing_attempts(1_000)
                    .seed(1)
                    .build()
                    .unwrap()
            },
            |mut sim| sim.run(&mut NullRecorder).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_generation_step, bench_short_run);
criterion_main!(benches);
