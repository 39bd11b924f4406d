//! Benchmarks the cascade loop end to end: drawing a grid and running it
//! to exhaustion, the hot path `sf-tuner`'s simulation workers spend most
//! of their time in.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sf_core::{EngineConfig, GameMode};
use sf_grid::{draw_grid, run_cascade};
use sf_paytable::{base_game_weights, PayTable};
use sf_rng::{DeterministicRng, Entropy, OsEntropy};
use sf_strips::{generate_strip, ReelStrip};

fn base_strips() -> [ReelStrip; 5] {
    let weights = base_game_weights();
    std::array::from_fn(|reel| {
        let content = generate_strip(&weights, reel, &OsEntropy).unwrap();
        ReelStrip::new(GameMode::Base, reel as u8, content)
    })
}

fn bench_cascade(c: &mut Criterion) {
    let strips = base_strips();
    let paytable = PayTable::standard();
    let config = EngineConfig::default();
    let key = OsEntropy.server_seed().unwrap();

    c.bench_function("draw_and_cascade", |b| {
        b.iter(|| {
            let mut rng = DeterministicRng::from_key(key);
            let (mut positions, grid) = draw_grid(&strips, &mut rng);
            let (steps, total_win) = run_cascade(grid, &strips, &mut positions, &paytable, 1.0, GameMode::Base, &config);
            black_box((steps, total_win))
        })
    });
}

criterion_group!(benches, bench_cascade);
criterion_main!(benches);
