//! Per-reel integer weight maps. These are the inputs to reel-strip
//! generation (`sf-strips`): `GetBaseGameWeights`, `GetFreeSpinsWeights`,
//! and `GetTrialWeights`.

use crate::symbol::BaseSymbol;
use std::collections::HashMap;

pub const REEL_COUNT: usize = 5;

/// A symbol's integer weight on each of the five reels.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<BaseSymbol, [u32; REEL_COUNT]>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symbol: BaseSymbol, per_reel: [u32; REEL_COUNT]) -> &mut Self {
        self.weights.insert(symbol, per_reel);
        self
    }

    pub fn weight(&self, symbol: BaseSymbol, reel: usize) -> u32 {
        self.weights.get(&symbol).map(|w| w[reel]).unwrap_or(0)
    }

    pub fn total_weight(&self, reel: usize) -> u32 {
        self.weights.values().map(|w| w[reel]).sum()
    }

    pub fn symbols(&self) -> impl Iterator<Item = BaseSymbol> + '_ {
        self.weights.keys().copied()
    }
}

/// Base-game weights: lows common, mids and highs rarer, wild/scatter rare
/// and biased away from reel 0 so they can't land in the first column too
/// often.
pub fn base_game_weights() -> WeightTable {
    let mut table = WeightTable::new();
    table
        .set(BaseSymbol::Low1, [30, 30, 30, 30, 30])
        .set(BaseSymbol::Low2, [28, 28, 28, 28, 28])
        .set(BaseSymbol::Low3, [26, 26, 26, 26, 26])
        .set(BaseSymbol::Low4, [24, 24, 24, 24, 24])
        .set(BaseSymbol::Mid1, [14, 14, 14, 14, 14])
        .set(BaseSymbol::Mid2, [12, 12, 12, 12, 12])
        .set(BaseSymbol::High1, [6, 7, 7, 7, 6])
        .set(BaseSymbol::High2, [5, 6, 6, 6, 5])
        .set(BaseSymbol::Wild, [0, 3, 3, 3, 3])
        .set(BaseSymbol::Scatter, [2, 3, 3, 3, 2]);
    table
}

/// Free-spins weights: richer in highs and wilds to lift volatility during
/// the bonus, scatters kept so retriggers stay possible.
pub fn free_spins_weights() -> WeightTable {
    let mut table = WeightTable::new();
    table
        .set(BaseSymbol::Low1, [24, 24, 24, 24, 24])
        .set(BaseSymbol::Low2, [22, 22, 22, 22, 22])
        .set(BaseSymbol::Low3, [20, 20, 20, 20, 20])
        .set(BaseSymbol::Low4, [18, 18, 18, 18, 18])
        .set(BaseSymbol::Mid1, [14, 14, 14, 14, 14])
        .set(BaseSymbol::Mid2, [12, 12, 12, 12, 12])
        .set(BaseSymbol::High1, [9, 10, 10, 10, 9])
        .set(BaseSymbol::High2, [8, 9, 9, 9, 8])
        .set(BaseSymbol::Wild, [0, 5, 5, 5, 5])
        .set(BaseSymbol::Scatter, [2, 3, 3, 3, 2]);
    table
}

/// Trial-mode weights mirror the base game; trial mode is a thin variant
/// of the real flow, not a different math model (§1).
pub fn trial_weights() -> WeightTable {
    base_game_weights()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_reel_has_positive_total_weight() {
        for table in [base_game_weights(), free_spins_weights(), trial_weights()] {
            for reel in 0..REEL_COUNT {
                assert!(table.total_weight(reel) > 0);
            }
        }
    }

    #[test]
    fn wild_never_lands_on_reel_zero() {
        assert_eq!(base_game_weights().weight(BaseSymbol::Wild, 0), 0);
        assert_eq!(free_spins_weights().weight(BaseSymbol::Wild, 0), 0);
    }
}
