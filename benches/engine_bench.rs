use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ev_concurrency_sim::sim::engine::Simulator;
use ev_concurrency_sim::sim::types::SimConfig;
use std::hint::black_box;

fn bench_year_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_year");
    group.sample_size(10);
    for count in [1usize, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let config = SimConfig::new(count, 11.0, 18.0, 365, 15, 1.0);
                let mut sim = Simulator::seeded(config, 42).expect("valid config");
                black_box(sim.run().expect("run"))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_year_run);
criterion_main!(benches);
