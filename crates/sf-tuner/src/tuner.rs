//! The tuning loop itself: generate → parallel simulate → aggregate →
//! check convergence → feedback adjust → normalise → optionally persist.

use crate::config::TuningConfig;
use crate::simulate::simulate_spins;
use crate::stats::{TuningStats, WorkerStats};
use crate::topology::{generate_topology_strip, role_for_reel, DensityMap, ReelRole};
use chrono::Utc;
use sf_core::{CancellationToken, EngineConfig, EngineError, GameMode};
use sf_paytable::{base_game_weights, free_spins_weights, BaseSymbol, PayTable};
use sf_rng::FastRng;
use sf_strips::ReelStrip;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

const MIN_SPACING: usize = 2;
const MAX_CLUSTER: usize = 4;

pub struct TuningOutcome {
    pub base_strips: [ReelStrip; 5],
    pub free_spins_strips: [ReelStrip; 5],
    pub stats: TuningStats,
    pub iterations: u32,
    pub converged: bool,
}

/// An external place to persist a converged strip set. A real
/// implementation is a Store collaborator (out of scope here, same as
/// `sf-orchestrator`'s `Store`/`Cache`).
pub trait TuningPersistence {
    fn save(&self, label: &str, outcome: &TuningOutcome) -> Result<(), EngineError>;
}

/// Discards the outcome. Used when `TuningConfig::save_to_db` is false.
pub struct NullPersistence;

impl TuningPersistence for NullPersistence {
    fn save(&self, _label: &str, _outcome: &TuningOutcome) -> Result<(), EngineError> {
        Ok(())
    }
}

pub fn run_tuning_loop(
    config: &TuningConfig,
    engine_config: &EngineConfig,
    persistence: &dyn TuningPersistence,
    cancel: &CancellationToken,
) -> Result<TuningOutcome, EngineError> {
    let mut base_density = DensityMap::from_weight_table(&base_game_weights());
    let mut free_density = DensityMap::from_weight_table(&free_spins_weights());
    let paytable = PayTable::standard();
    let mut last: Option<TuningOutcome> = None;

    for iter in 0..config.max_iter {
        // Checked before this iteration's (possibly expensive) simulation
        // starts, so a mid-loop cancellation discards the in-progress
        // iteration and nothing partially computed is ever persisted.
        if cancel.is_cancelled() {
            tracing::info!(iter, "tuning loop cancelled, discarding in-progress iteration");
            return last.ok_or_else(|| EngineError::inconsistent("tuning loop cancelled before the first iteration completed"));
        }

        let (base_strips, free_strips) = materialise_candidate(&base_density, &free_density);
        let stats = simulate_parallel(&base_strips, &free_strips, &paytable, engine_config, config);
        let tuning_stats = TuningStats::from_worker_stats(&stats);

        let rtp_ok = config.target_rtp.in_band(tuning_stats.rtp);
        let trigger_ok = config.target_trigger_rate.in_band(tuning_stats.trigger_rate);
        let share_ok = config.target_high_symbol_win_share.in_band(tuning_stats.high_symbol_win_share);

        tracing::info!(
            iter,
            rtp = tuning_stats.rtp,
            trigger_rate = tuning_stats.trigger_rate,
            high_symbol_win_share = tuning_stats.high_symbol_win_share,
            "tuning iteration complete"
        );

        if rtp_ok && trigger_ok && share_ok {
            let outcome = TuningOutcome {
                base_strips,
                free_spins_strips: free_strips,
                stats: tuning_stats,
                iterations: iter + 1,
                converged: true,
            };
            if config.save_to_db {
                persistence.save(&format!("tuning-{}", Utc::now().format("%Y%m%dT%H%M%S")), &outcome)?;
            }
            return Ok(outcome);
        }

        last = Some(TuningOutcome {
            base_strips: base_strips.clone(),
            free_spins_strips: free_strips.clone(),
            stats: tuning_stats.clone(),
            iterations: iter + 1,
            converged: false,
        });

        if !trigger_ok {
            let reel = (iter as usize) % 5;
            let sign = if config.target_trigger_rate.direction(tuning_stats.trigger_rate) == Ordering::Less {
                1.0
            } else {
                -1.0
            };
            base_density.bump_bonus(reel, sign * config.learning_rate);
            free_density.bump_bonus(reel, sign * config.learning_rate);
        } else {
            let share_direction = config.target_high_symbol_win_share.direction(tuning_stats.high_symbol_win_share);
            let rtp_direction = config.target_rtp.direction(tuning_stats.rtp);
            adjust_for_share_and_rtp(&mut base_density, share_direction, rtp_direction, config.learning_rate);
            adjust_for_share_and_rtp(&mut free_density, share_direction, rtp_direction, config.learning_rate);
        }

        for reel in 0..5 {
            base_density.normalize_reel(reel);
            free_density.normalize_reel(reel);
        }
    }

    let (base_strips, free_strips) = materialise_candidate(&base_density, &free_density);
    let stats = simulate_parallel(&base_strips, &free_strips, &paytable, engine_config, config);
    Ok(TuningOutcome {
        base_strips,
        free_spins_strips: free_strips,
        stats: TuningStats::from_worker_stats(&stats),
        iterations: config.max_iter,
        converged: false,
    })
}

fn materialise_candidate(base_density: &DensityMap, free_density: &DensityMap) -> ([ReelStrip; 5], [ReelStrip; 5]) {
    let mut rng = FastRng::from_os_entropy();
    let base_strips = std::array::from_fn(|reel| {
        let content = generate_topology_strip(base_density, reel, &mut rng, MIN_SPACING, MAX_CLUSTER);
        ReelStrip::new(GameMode::Base, reel as u8, content)
    });
    let free_strips = std::array::from_fn(|reel| {
        let content = generate_topology_strip(free_density, reel, &mut rng, MIN_SPACING, MAX_CLUSTER);
        ReelStrip::new(GameMode::FreeSpins, reel as u8, content)
    });
    (base_strips, free_strips)
}

/// Feedback adjustment for the non-trigger-rate branch: cools or warms the
/// high/low symbol density split to move `high_symbol_win_share`, and
/// separately nudges mid-tier density (the most frequent payer, and so the
/// RTP lever least coupled to volatility) to move RTP.
///
/// The high/low split is dispatched by each reel's role rather than a
/// hardcoded index list: `Spike`/`Core` reels carry the high-symbol bias,
/// `Activator` carries the opposing low-symbol bias, matching where those
/// symbols are meant to concentrate in the first place.
fn adjust_for_share_and_rtp(density: &mut DensityMap, share_direction: Ordering, rtp_direction: Ordering, learning_rate: f64) {
    // When share is too high, cool the high symbols and warm the low ones;
    // when too low, the reverse. `high_delta`/`low_delta` carry that sign.
    let (high_delta, low_delta) = match share_direction {
        Ordering::Greater => (-learning_rate, learning_rate),
        Ordering::Less => (learning_rate, -learning_rate),
        Ordering::Equal => (0.0, 0.0),
    };
    if share_direction != Ordering::Equal {
        for reel in 0..5 {
            match role_for_reel(reel) {
                ReelRole::Spike | ReelRole::Core => {
                    density.bump(BaseSymbol::High1, reel, high_delta);
                    density.bump(BaseSymbol::High2, reel, high_delta);
                }
                ReelRole::Activator => {
                    density.bump(BaseSymbol::Low1, reel, low_delta);
                    density.bump(BaseSymbol::Low2, reel, low_delta);
                }
            }
        }
    }

    let mid_nudge = learning_rate * 0.5;
    match rtp_direction {
        Ordering::Greater => {
            for reel in 0..5 {
                density.bump(BaseSymbol::Mid1, reel, -mid_nudge);
                density.bump(BaseSymbol::Mid2, reel, -mid_nudge);
            }
        }
        Ordering::Less => {
            for reel in 0..5 {
                density.bump(BaseSymbol::Mid1, reel, mid_nudge);
                density.bump(BaseSymbol::Mid2, reel, mid_nudge);
            }
        }
        Ordering::Equal => {}
    }
}

fn simulate_parallel(
    base_strips: &[ReelStrip; 5],
    free_strips: &[ReelStrip; 5],
    paytable: &PayTable,
    engine_config: &EngineConfig,
    config: &TuningConfig,
) -> WorkerStats {
    let num_workers = config.num_workers.max(1);
    let per_worker = partition(config.total_spins, num_workers);
    let progress = AtomicU64::new(0);
    let total_spins = config.total_spins;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .unwrap_or_else(|_| rayon::ThreadPoolBuilder::new().build().expect("default rayon pool"));

    std::thread::scope(|scope| {
        let progress_ref = &progress;
        scope.spawn(move || {
            let start = Instant::now();
            let mut last_report = start;
            loop {
                let done = progress_ref.load(AtomicOrdering::Relaxed);
                if done >= total_spins {
                    break;
                }
                if last_report.elapsed() >= Duration::from_secs(1) {
                    tracing::debug!(done, total_spins, "tuning worker progress");
                    last_report = Instant::now();
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        });

        pool.install(|| {
            use rayon::prelude::*;
            per_worker
                .par_iter()
                .map(|&spin_count| {
                    let mut rng = FastRng::from_os_entropy();
                    simulate_spins(base_strips, free_strips, paytable, engine_config, config.bet_amount, spin_count, &mut rng, &progress)
                })
                .reduce(WorkerStats::default, |a, b| a.merge(&b))
        })
    })
}

fn partition(total: u64, workers: usize) -> Vec<u64> {
    let base = total / workers as u64;
    let remainder = total % workers as u64;
    (0..workers)
        .map(|i| base + u64::from((i as u64) < remainder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_sums_back_to_the_total() {
        let shares = partition(101, 4);
        assert_eq!(shares.len(), 4);
        assert_eq!(shares.iter().sum::<u64>(), 101);
    }

    #[test]
    fn tuning_loop_returns_either_converged_or_hits_max_iter() {
        let config = TuningConfig {
            total_spins: 500,
            max_iter: 3,
            num_workers: 2,
            ..TuningConfig::default()
        };
        let engine_config = EngineConfig::default();
        let outcome = run_tuning_loop(&config, &engine_config, &NullPersistence, &CancellationToken::new()).unwrap();
        assert!(outcome.iterations <= config.max_iter.max(1));
        if outcome.converged {
            assert!(config.target_rtp.in_band(outcome.stats.rtp));
        }
    }

    #[test]
    fn tuning_loop_discards_the_in_progress_iteration_when_cancelled() {
        let config = TuningConfig {
            total_spins: 500,
            max_iter: 50,
            num_workers: 2,
            ..TuningConfig::default()
        };
        let engine_config = EngineConfig::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = run_tuning_loop(&config, &engine_config, &NullPersistence, &cancel).unwrap_err();
        assert!(matches!(err, EngineError::InconsistentState(_)));
    }
}
