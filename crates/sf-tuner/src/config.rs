//! Tuning-run configuration: targets, tolerances, and worker topology.

use serde::{Deserialize, Serialize};
use sf_core::GameMode;

/// A target with a symmetric tolerance band; `in_band` is the convergence
/// predicate used by every gate the loop checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub value: f64,
    pub tolerance: f64,
}

impl Target {
    pub fn new(value: f64, tolerance: f64) -> Self {
        Self { value, tolerance }
    }

    pub fn in_band(&self, observed: f64) -> bool {
        (observed - self.value).abs() <= self.tolerance
    }

    /// Positive when `observed` sits above the band, negative when below,
    /// zero when in-band. Feedback adjustment uses the sign, not the
    /// magnitude.
    pub fn direction(&self, observed: f64) -> std::cmp::Ordering {
        if self.in_band(observed) {
            std::cmp::Ordering::Equal
        } else {
            observed.partial_cmp(&self.value).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    pub total_spins: u64,
    pub max_iter: u32,
    pub bet_amount: f64,
    pub buy_cost: f64,
    pub target_rtp: Target,
    pub target_trigger_rate: Target,
    pub target_hit_rate: Target,
    pub target_high_symbol_win_share: Target,
    pub learning_rate: f64,
    pub num_workers: usize,
    pub game_mode: GameMode,
    pub save_to_db: bool,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            total_spins: 10_000,
            max_iter: 5_000,
            bet_amount: 1.0,
            buy_cost: 100.0,
            target_rtp: Target::new(96.5, 0.5),
            target_trigger_rate: Target::new(1.0, 0.05),
            target_hit_rate: Target::new(30.0, 5.0),
            target_high_symbol_win_share: Target::new(35.0, 5.0),
            learning_rate: 0.05,
            num_workers: 4,
            game_mode: GameMode::Base,
            save_to_db: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_reports_direction_relative_to_band() {
        let target = Target::new(96.5, 0.5);
        assert_eq!(target.direction(96.5), std::cmp::Ordering::Equal);
        assert_eq!(target.direction(99.0), std::cmp::Ordering::Greater);
        assert_eq!(target.direction(90.0), std::cmp::Ordering::Less);
    }

    #[test]
    fn in_band_is_inclusive_of_the_boundary() {
        let target = Target::new(10.0, 1.0);
        assert!(target.in_band(9.0));
        assert!(target.in_band(11.0));
        assert!(!target.in_band(11.01));
    }
}
