//! Simulation benchmarks for sol_core.
//!
//! Run with: `cargo bench -p sol_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sol_core::data::LevelRegistry;
use sol_core::simulation::{SimConfig, Simulation};

/// One minute of simulated play on the largest built-in level.
const BENCH_TICKS: u64 = 60 * 60;

pub fn simulation_benchmark(c: &mut Criterion) {
    let levels = LevelRegistry::builtin().expect("built-in levels load");

    c.bench_function("solar_system_war_one_minute", |b| {
        b.iter_batched(
            || {
                let mut sim = Simulation::new(SimConfig::with_seed(42));
                sim.start_level(&levels, 5).expect("level 5 exists");
                sim
            },
            |mut sim| {
                for _ in 0..BENCH_TICKS {
                    black_box(sim.tick());
                }
                sim
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("state_hash", |b| {
        let mut sim = Simulation::new(SimConfig::with_seed(42));
        sim.start_level(&levels, 5).expect("level 5 exists");
        for _ in 0..BENCH_TICKS {
            sim.tick();
        }
        b.iter(|| black_box(sim.state_hash()));
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
