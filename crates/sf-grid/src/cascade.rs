//! The cascade step: gold-to-wild transform, removal of winning cells,
//! gravity, and refill from the strip position already in play — no new
//! RNG draws happen here (§4.4 step 4 and onward).

use crate::grid::{Grid, ReelPositions, REELS, ROWS};
use crate::ways::{evaluate_ways, WinCombination};
use serde::{Deserialize, Serialize};
use sf_core::{EngineConfig, GameMode};
use sf_paytable::{to_wild_if_gold, PayTable, Token};
use sf_strips::ReelStrip;

/// Turns every gold symbol that took part in a win into a wild, in place.
/// Gold symbols survive the cascade; everything else that won is cleared
/// by [`remove`].
pub fn apply_gold_transform(grid: &Grid, wins: &[WinCombination]) -> Grid {
    let mut next = grid.clone();
    for win in wins {
        for &(reel, row) in &win.positions {
            let (r, c) = (reel as usize, row as usize);
            let token = next.get(r, c);
            if token.is_gold() {
                next.set(r, c, to_wild_if_gold(token));
            }
        }
    }
    next
}

/// Clears every winning cell that was not a gold-to-wild survivor. `before`
/// is the grid as it stood prior to the gold transform, used only to tell
/// which winning cells were gold; `transformed` supplies the post-transform
/// contents that make it into the result.
pub fn remove(
    before: &Grid,
    transformed: &Grid,
    wins: &[WinCombination],
) -> [[Option<Token>; ROWS]; REELS] {
    let mut cells: [[Option<Token>; ROWS]; REELS] =
        std::array::from_fn(|reel| std::array::from_fn(|row| Some(transformed.get(reel, row))));
    for win in wins {
        for &(reel, row) in &win.positions {
            let (r, c) = (reel as usize, row as usize);
            if !before.get(r, c).is_gold() {
                cells[r][c] = None;
            }
        }
    }
    cells
}

/// Surviving cells fall toward the bottom row; vacated cells at the top of
/// each reel are filled by continuing that reel's strip position backward
/// from where it currently sits — the same strip, no fresh draw.
pub fn refill(
    cells: [[Option<Token>; ROWS]; REELS],
    strips: &[ReelStrip; REELS],
    cursor: &mut ReelPositions,
) -> Grid {
    let mut result = [[Token::wild(); ROWS]; REELS];
    for reel in 0..REELS {
        let survivors: Vec<Token> = cells[reel].iter().filter_map(|c| *c).collect();
        let missing = ROWS - survivors.len();
        let strip = &strips[reel];

        let new_symbols: Vec<Token> = (1..=missing as i64)
            .rev()
            .map(|d| strip.symbol_at(cursor[reel] - d))
            .collect();
        cursor[reel] -= missing as i64;

        let mut column = new_symbols;
        column.extend(survivors);
        for (row, token) in column.into_iter().enumerate() {
            result[reel][row] = token;
        }
    }
    Grid::from_reels(result)
}

/// One resolved cascade step: the grid it was evaluated on, the wins it
/// produced, the payout after the step's multiplier, and the grid that
/// resulted from transform/remove/refill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeResult {
    pub grid_before: Grid,
    pub wins: Vec<WinCombination>,
    pub step_win: f64,
    pub multiplier: f64,
    pub grid_after: Grid,
}

/// Runs the cascade loop to exhaustion: evaluate, pay, transform, remove,
/// refill, repeat, stopping the first time a step produces no wins. Returns
/// every resolved step plus the total payout across the whole cascade.
pub fn run_cascade(
    initial_grid: Grid,
    strips: &[ReelStrip; REELS],
    cursor: &mut ReelPositions,
    paytable: &PayTable,
    bet: f64,
    mode: GameMode,
    config: &EngineConfig,
) -> (Vec<CascadeResult>, f64) {
    let mut steps = Vec::new();
    let mut grid = initial_grid;
    let mut total_win = 0.0;
    let mut step_index = 0usize;

    loop {
        let wins = evaluate_ways(&grid, paytable, bet);
        if wins.is_empty() {
            break;
        }

        let multiplier = config.multiplier_for_step(mode, step_index);
        let step_win = wins.iter().map(|w| w.pay).sum::<f64>() * multiplier;
        total_win += step_win;

        let grid_before = grid.clone();
        let transformed = apply_gold_transform(&grid, &wins);
        let cleared = remove(&grid, &transformed, &wins);
        let grid_after = refill(cleared, strips, cursor);

        steps.push(CascadeResult {
            grid_before,
            wins,
            step_win,
            multiplier,
            grid_after: grid_after.clone(),
        });

        grid = grid_after;
        step_index += 1;
    }

    (steps, total_win)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::WIN_ROW_START;
    use sf_core::GameMode;
    use sf_paytable::BaseSymbol;

    fn filler_strip(symbol: BaseSymbol) -> ReelStrip {
        ReelStrip::new(GameMode::Base, 0, vec![Token::regular(symbol); 50])
    }

    #[test]
    fn gold_winner_becomes_wild_and_survives_removal() {
        let mut cells = [[Token::regular(BaseSymbol::Low1); ROWS]; REELS];
        for reel in 0..3 {
            cells[reel][WIN_ROW_START] = Token::gold(BaseSymbol::High1).unwrap();
        }
        let grid = Grid::from_reels(cells);
        let paytable = PayTable::standard();
        let wins = evaluate_ways(&grid, &paytable, 1.0);
        assert!(!wins.is_empty());

        let transformed = apply_gold_transform(&grid, &wins);
        assert!(transformed.get(0, WIN_ROW_START).is_wild());

        let cleared = remove(&grid, &transformed, &wins);
        assert_eq!(cleared[0][WIN_ROW_START], Some(Token::wild()));
    }

    #[test]
    fn plain_winner_is_cleared_by_removal() {
        let mut cells = [[Token::regular(BaseSymbol::Low1); ROWS]; REELS];
        for reel in 0..3 {
            cells[reel][WIN_ROW_START] = Token::regular(BaseSymbol::High1);
        }
        let grid = Grid::from_reels(cells);
        let paytable = PayTable::standard();
        let wins = evaluate_ways(&grid, &paytable, 1.0);

        let transformed = apply_gold_transform(&grid, &wins);
        let cleared = remove(&grid, &transformed, &wins);
        assert_eq!(cleared[0][WIN_ROW_START], None);
    }

    #[test]
    fn refill_continues_strip_position_without_new_draws() {
        let strips: [ReelStrip; REELS] = std::array::from_fn(|_| filler_strip(BaseSymbol::Low2));
        let mut cursor: ReelPositions = [20; REELS];
        let mut cells: [[Option<Token>; ROWS]; REELS] =
            std::array::from_fn(|_| std::array::from_fn(|_| Some(Token::regular(BaseSymbol::Low3))));
        cells[0][0] = None;
        cells[0][1] = None;

        let before_cursor = cursor[0];
        let grid = refill(cells, &strips, &mut cursor);
        assert_eq!(cursor[0], before_cursor - 2);
        // new top cells came from the strip, continuing backward from the old cursor
        assert_eq!(grid.get(0, 0).base, BaseSymbol::Low2);
        assert_eq!(grid.get(0, 1).base, BaseSymbol::Low2);
        // survivors kept their relative order, shifted to the bottom
        assert_eq!(grid.get(0, 2).base, BaseSymbol::Low3);
    }

    #[test]
    fn cascade_terminates_when_a_step_has_no_wins() {
        let strips: [ReelStrip; REELS] = std::array::from_fn(|_| filler_strip(BaseSymbol::Low2));
        let mut cursor: ReelPositions = [0; REELS];
        let cells = [[Token::regular(BaseSymbol::Low1); ROWS]; REELS];
        let grid = Grid::from_reels(cells);
        let paytable = PayTable::standard();
        let config = EngineConfig::default();

        let (steps, total_win) = run_cascade(
            grid,
            &strips,
            &mut cursor,
            &paytable,
            1.0,
            GameMode::Base,
            &config,
        );
        assert!(steps.is_empty());
        assert_eq!(total_win, 0.0);
    }

    #[test]
    fn cascade_applies_escalating_multiplier_ladder() {
        let mut cells = [[Token::regular(BaseSymbol::Low1); ROWS]; REELS];
        for reel in 0..4 {
            cells[reel][WIN_ROW_START] = Token::regular(BaseSymbol::High2);
        }
        let grid = Grid::from_reels(cells);
        let strips: [ReelStrip; REELS] = std::array::from_fn(|_| filler_strip(BaseSymbol::Low3));
        let mut cursor: ReelPositions = [30; REELS];
        let paytable = PayTable::standard();
        let config = EngineConfig::default();

        let (steps, total_win) = run_cascade(
            grid,
            &strips,
            &mut cursor,
            &paytable,
            1.0,
            GameMode::Base,
            &config,
        );
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].multiplier, config.base_game_multiplier_ladder[0]);
        assert_eq!(total_win, steps[0].step_win);
    }
}
