//! Topology-aware strip generation: per-reel role density biases plus a
//! repair pass enforcing minimum symbol spacing and a max-consecutive-run
//! cap, on top of the plain weighted shuffle `sf_strips::materialise` does.

use sf_paytable::{BaseSymbol, Token, WeightTable};
use sf_rng::FastRng;
use sf_strips::materialise;
use std::collections::HashMap;

pub const REEL_COUNT: usize = 5;

/// R1 (reel 0) favours low/bonus symbols to activate cascades early; R3
/// (reel 2) carries the core mid-tier distribution; R5 (reel 4) carries
/// the spike of high-value symbols. Reels 1 and 3 are treated as core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelRole {
    Activator,
    Core,
    Spike,
}

pub fn role_for_reel(reel: usize) -> ReelRole {
    match reel {
        0 => ReelRole::Activator,
        4 => ReelRole::Spike,
        _ => ReelRole::Core,
    }
}

/// A mutable, per-symbol-per-reel f64 density map — the tuning loop's
/// working representation. `WeightTable`'s integer weights are the
/// strip-generation input; this is the thing feedback adjustment nudges.
#[derive(Debug, Clone)]
pub struct DensityMap {
    densities: HashMap<BaseSymbol, [f64; REEL_COUNT]>,
}

impl DensityMap {
    pub fn from_weight_table(table: &WeightTable) -> Self {
        let mut densities = HashMap::new();
        for symbol in BaseSymbol::REGULAR.iter().chain([BaseSymbol::Wild, BaseSymbol::Scatter].iter()) {
            let mut row = [0.0; REEL_COUNT];
            for (reel, slot) in row.iter_mut().enumerate() {
                *slot = table.weight(*symbol, reel) as f64;
            }
            densities.insert(*symbol, row);
        }
        Self { densities }
    }

    pub fn get(&self, symbol: BaseSymbol, reel: usize) -> f64 {
        self.densities.get(&symbol).map(|r| r[reel]).unwrap_or(0.0)
    }

    pub fn bump(&mut self, symbol: BaseSymbol, reel: usize, delta: f64) {
        let row = self.densities.entry(symbol).or_insert([0.0; REEL_COUNT]);
        row[reel] = (row[reel] + delta).max(0.0);
    }

    /// The bonus (scatter) symbol's density on one reel, nudged by a
    /// signed `delta` (§4.8 step 5's "nudge the bonus density on one
    /// rotating reel").
    pub fn bump_bonus(&mut self, reel: usize, delta: f64) {
        self.bump(BaseSymbol::Scatter, reel, delta);
    }

    /// Normalises one reel so its minimum non-bonus density is 1.0,
    /// preserving ratios between symbols on that reel.
    pub fn normalize_reel(&mut self, reel: usize) {
        let min = self
            .densities
            .iter()
            .filter(|(symbol, _)| **symbol != BaseSymbol::Scatter)
            .map(|(_, row)| row[reel])
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        if !min.is_finite() || min <= 0.0 {
            return;
        }
        for row in self.densities.values_mut() {
            row[reel] /= min;
        }
    }

    pub fn to_weight_table(&self) -> WeightTable {
        let mut table = WeightTable::new();
        for (symbol, row) in &self.densities {
            let mut per_reel = [0u32; REEL_COUNT];
            for (reel, value) in row.iter().enumerate() {
                per_reel[reel] = value.round().max(0.0) as u32;
            }
            table.set(*symbol, per_reel);
        }
        table
    }
}

/// Generates one reel's strip from a density map: materialise the
/// weighted multiset, shuffle with the fast RNG, then repair spacing and
/// cluster violations in place.
pub fn generate_topology_strip(
    density: &DensityMap,
    reel: usize,
    rng: &mut FastRng,
    min_spacing: usize,
    max_cluster: usize,
) -> Vec<Token> {
    let weights = density.to_weight_table();
    let mut tokens = materialise(&weights, reel);
    rng.shuffle(&mut tokens);
    repair_spacing_and_clusters(&mut tokens, min_spacing, max_cluster);
    tokens
}

/// Single forward pass: whenever a symbol repeats closer than
/// `min_spacing` to its last occurrence, or extends a run past
/// `max_cluster`, swap it with the nearest later position holding a
/// different symbol that doesn't itself violate spacing there.
fn repair_spacing_and_clusters(tokens: &mut [Token], min_spacing: usize, max_cluster: usize) {
    let mut last_seen: HashMap<BaseSymbol, usize> = HashMap::new();
    let mut run_symbol: Option<BaseSymbol> = None;
    let mut run_len = 0usize;

    for i in 0..tokens.len() {
        let symbol = tokens[i].base;
        let spacing_violation = last_seen.get(&symbol).is_some_and(|&prev| i - prev < min_spacing);
        let cluster_violation = run_symbol == Some(symbol) && run_len >= max_cluster;

        if spacing_violation || cluster_violation {
            if let Some(swap_with) = (i + 1..tokens.len()).find(|&j| {
                let candidate = tokens[j].base;
                candidate != symbol && last_seen.get(&candidate).is_none_or(|&prev| i - prev >= min_spacing)
            }) {
                tokens.swap(i, swap_with);
            }
        }

        let symbol = tokens[i].base;
        last_seen.insert(symbol, i);
        if run_symbol == Some(symbol) {
            run_len += 1;
        } else {
            run_symbol = Some(symbol);
            run_len = 1;
        }
    }
}
