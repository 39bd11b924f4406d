//! One worker's share of a tuning iteration: draw and cascade-evaluate
//! `spin_count` independent base-game spins with the fast RNG, running a
//! real `FreeSpinsSession` sub-loop whenever a spin triggers.

use crate::stats::WorkerStats;
use chrono::Utc;
use sf_core::{ConfigId, EngineConfig, GameMode, GameSessionId, PlayerId};
use sf_freespins::{FreeSpinsEvent, FreeSpinsSession};
use sf_grid::{draw_grid, run_cascade};
use sf_paytable::{get_free_spins_award, PayTable};
use sf_rng::FastRng;
use sf_strips::ReelStrip;
use std::sync::atomic::{AtomicU64, Ordering};

#[allow(clippy::too_many_arguments)]
pub fn simulate_spins(
    base_strips: &[ReelStrip; 5],
    free_strips: &[ReelStrip; 5],
    paytable: &PayTable,
    config: &EngineConfig,
    bet: f64,
    spin_count: u64,
    rng: &mut FastRng,
    progress: &AtomicU64,
) -> WorkerStats {
    let mut stats = WorkerStats::default();
    for _ in 0..spin_count {
        let (mut positions, grid) = draw_grid(base_strips, rng);
        let scatter_count = grid.count_scatters();
        let (cascades, total_win) = run_cascade(grid, base_strips, &mut positions, paytable, bet, GameMode::Base, config);
        let total_win = total_win.min(bet * config.max_win_multiplier);
        let triggered = scatter_count >= config.scatter_minimum;
        stats.record_spin(bet, &cascades, total_win, triggered, scatter_count);

        if triggered {
            let award = get_free_spins_award(scatter_count);
            simulate_free_spins(free_strips, paytable, config, bet, award, rng, &mut stats);
        }
        progress.fetch_add(1, Ordering::Relaxed);
    }
    stats
}

fn simulate_free_spins(
    free_strips: &[ReelStrip; 5],
    paytable: &PayTable,
    config: &EngineConfig,
    locked_bet: f64,
    award: u32,
    rng: &mut FastRng,
    stats: &mut WorkerStats,
) {
    let mut session = FreeSpinsSession::trigger(PlayerId::new(), GameSessionId::new(), ConfigId::new(), locked_bet, award, Utc::now());

    while session.active && session.remaining > 0 {
        let (mut positions, grid) = draw_grid(free_strips, rng);
        let scatter_count = grid.count_scatters();
        let (cascades, total_win) = run_cascade(grid, free_strips, &mut positions, paytable, locked_bet, GameMode::FreeSpins, config);
        let total_win = total_win.min(locked_bet * config.max_win_multiplier);
        // no additional wager inside the bonus: `bet` passed to record_spin is 0.
        stats.record_spin(0.0, &cascades, total_win, false, scatter_count);

        let retrigger_award = (scatter_count >= config.scatter_minimum).then(|| get_free_spins_award(scatter_count));
        session = session
            .apply(FreeSpinsEvent::ExecuteSpin {
                win: total_win,
                retrigger_award,
            })
            .expect("simulated free-spins session never outlives its own remaining count");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_paytable::{base_game_weights, free_spins_weights};
    use sf_strips::generate_strip;
    use std::array;

    fn strips_from(weights: &sf_paytable::WeightTable) -> [ReelStrip; 5] {
        array::from_fn(|reel| {
            let content = generate_strip(weights, reel, &sf_rng::OsEntropy).unwrap();
            ReelStrip::new(GameMode::Base, reel as u8, content)
        })
    }

    #[test]
    fn simulating_spins_never_pays_out_more_than_the_max_multiplier_cap() {
        let base = strips_from(&base_game_weights());
        let free = strips_from(&free_spins_weights());
        let config = EngineConfig::default();
        let paytable = PayTable::standard();
        let mut rng = FastRng::from_os_entropy();
        let progress = std::sync::atomic::AtomicU64::new(0);

        let stats = simulate_spins(&base, &free, &paytable, &config, 1.0, 200, &mut rng, &progress);
        assert_eq!(stats.spins, 200);
        assert!(stats.max_win <= config.max_win_multiplier); // bet is 1.0 in this fixture
    }
}
