//! sf-paytable: pure data and pure functions — the symbol taxonomy,
//! per-reel weight tables, the paytable, and the free-spins award formula.

mod award;
mod paytable;
mod symbol;
mod weights;

pub use award::{get_free_spins_award, MIN_SCATTERS_FOR_FREE_SPIN};
pub use paytable::PayTable;
pub use symbol::{get_base_symbol, to_wild_if_gold, BaseSymbol, Token};
pub use weights::{base_game_weights, free_spins_weights, trial_weights, WeightTable, REEL_COUNT};
