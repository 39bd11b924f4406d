//! Per-worker accumulators and their merge into run-level `TuningStats`.

use sf_grid::CascadeResult;
use sf_paytable::BaseSymbol;

/// 0, 1, 2, 3, 4, 5-or-more cascades in one spin.
const CASCADE_BUCKETS: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct WorkerStats {
    pub spins: u64,
    pub total_wagered: f64,
    pub total_won: f64,
    pub triggers: u64,
    pub spins_with_win: u64,
    pub cascade_depth_histogram: [u64; CASCADE_BUCKETS],
    pub win_kind_3of: u64,
    pub win_kind_4of: u64,
    pub win_kind_5of: u64,
    pub low_symbol_pay: f64,
    pub mid_symbol_pay: f64,
    pub high_symbol_pay: f64,
    pub near_misses: u64,
    pub max_win: f64,
}

impl WorkerStats {
    /// Folds one resolved spin (its cascades, its trigger flag, its total
    /// win) into the running accumulators.
    pub fn record_spin(&mut self, bet: f64, cascades: &[CascadeResult], total_win: f64, triggered: bool, scatter_count: u8) {
        self.spins += 1;
        self.total_wagered += bet;
        self.total_won += total_win;
        if triggered {
            self.triggers += 1;
        }
        if total_win > 0.0 {
            self.spins_with_win += 1;
        }
        if scatter_count == 2 {
            self.near_misses += 1;
        }
        self.max_win = self.max_win.max(total_win);

        let bucket = cascades.len().min(CASCADE_BUCKETS - 1);
        self.cascade_depth_histogram[bucket] += 1;

        for cascade in cascades {
            for win in &cascade.wins {
                let pay = win.pay * cascade.multiplier;
                match win.count {
                    3 => self.win_kind_3of += 1,
                    4 => self.win_kind_4of += 1,
                    5 => self.win_kind_5of += 1,
                    _ => {}
                }
                match symbol_band(win.symbol) {
                    SymbolBand::Low => self.low_symbol_pay += pay,
                    SymbolBand::Mid => self.mid_symbol_pay += pay,
                    SymbolBand::High => self.high_symbol_pay += pay,
                }
            }
        }
    }

    pub fn merge(mut self, other: &WorkerStats) -> Self {
        self.spins += other.spins;
        self.total_wagered += other.total_wagered;
        self.total_won += other.total_won;
        self.triggers += other.triggers;
        self.spins_with_win += other.spins_with_win;
        for (a, b) in self.cascade_depth_histogram.iter_mut().zip(&other.cascade_depth_histogram) {
            *a += b;
        }
        self.win_kind_3of += other.win_kind_3of;
        self.win_kind_4of += other.win_kind_4of;
        self.win_kind_5of += other.win_kind_5of;
        self.low_symbol_pay += other.low_symbol_pay;
        self.mid_symbol_pay += other.mid_symbol_pay;
        self.high_symbol_pay += other.high_symbol_pay;
        self.near_misses += other.near_misses;
        self.max_win = self.max_win.max(other.max_win);
        self
    }
}

enum SymbolBand {
    Low,
    Mid,
    High,
}

fn symbol_band(symbol: BaseSymbol) -> SymbolBand {
    match symbol {
        BaseSymbol::Low1 | BaseSymbol::Low2 | BaseSymbol::Low3 | BaseSymbol::Low4 => SymbolBand::Low,
        BaseSymbol::Mid1 | BaseSymbol::Mid2 => SymbolBand::Mid,
        _ => SymbolBand::High,
    }
}

/// Run-level statistics aggregated across all workers (§4.8 step 3).
#[derive(Debug, Clone)]
pub struct TuningStats {
    pub rtp: f64,
    pub trigger_rate: f64,
    pub hit_rate: f64,
    pub cascade_depth_histogram: [u64; CASCADE_BUCKETS],
    pub win_kind_3of: u64,
    pub win_kind_4of: u64,
    pub win_kind_5of: u64,
    pub high_symbol_win_share: f64,
    pub near_miss_rate: f64,
    pub max_win: f64,
}

impl TuningStats {
    pub fn from_worker_stats(stats: &WorkerStats) -> Self {
        let spins = stats.spins.max(1) as f64;
        let symbol_total = (stats.low_symbol_pay + stats.mid_symbol_pay + stats.high_symbol_pay).max(f64::EPSILON);
        Self {
            rtp: 100.0 * stats.total_won / stats.total_wagered.max(f64::EPSILON),
            trigger_rate: 100.0 * stats.triggers as f64 / spins,
            hit_rate: 100.0 * stats.spins_with_win as f64 / spins,
            cascade_depth_histogram: stats.cascade_depth_histogram,
            win_kind_3of: stats.win_kind_3of,
            win_kind_4of: stats.win_kind_4of,
            win_kind_5of: stats.win_kind_5of,
            high_symbol_win_share: 100.0 * stats.high_symbol_pay / symbol_total,
            near_miss_rate: 100.0 * stats.near_misses as f64 / spins,
            max_win: stats.max_win,
        }
    }
}
