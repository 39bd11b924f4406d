//! Benchmarks one worker's share of a tuning iteration — the inner loop
//! `run_tuning_loop` spends almost all its wall-clock time in, parallelised
//! across workers by `rayon`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sf_core::EngineConfig;
use sf_paytable::{base_game_weights, free_spins_weights, PayTable};
use sf_rng::{FastRng, OsEntropy};
use sf_strips::{generate_strip, ReelStrip};
use sf_tuner::simulate_spins;
use std::sync::atomic::AtomicU64;

fn strips_from(weights: &sf_paytable::WeightTable) -> [ReelStrip; 5] {
    std::array::from_fn(|reel| {
        let content = generate_strip(weights, reel, &OsEntropy).unwrap();
        ReelStrip::new(sf_core::GameMode::Base, reel as u8, content)
    })
}

fn bench_simulate(c: &mut Criterion) {
    let base_strips = strips_from(&base_game_weights());
    let free_strips = strips_from(&free_spins_weights());
    let paytable = PayTable::standard();
    let config = EngineConfig::default();
    let progress = AtomicU64::new(0);

    c.bench_function("simulate_1000_spins", |b| {
        b.iter(|| {
            let mut rng = FastRng::from_os_entropy();
            let stats = simulate_spins(&base_strips, &free_strips, &paytable, &config, 1.0, 1000, &mut rng, &progress);
            black_box(stats)
        })
    });
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
