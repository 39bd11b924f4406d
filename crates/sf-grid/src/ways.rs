//! Ways-to-win detection: for each non-special symbol, the leftmost
//! maximal run of consecutive reels whose win-region cells contain that
//! symbol or wild.

use crate::grid::{Grid, REELS};
use serde::{Deserialize, Serialize};
use sf_paytable::{get_base_symbol, BaseSymbol, PayTable, Token};

/// How large a win is relative to the bet, for presentation purposes only
/// — it plays no part in the payout math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntensityBand {
    Small,
    Medium,
    Big,
    Mega,
}

pub fn intensity_band(win_to_bet_ratio: f64) -> IntensityBand {
    if win_to_bet_ratio >= 100.0 {
        IntensityBand::Mega
    } else if win_to_bet_ratio >= 20.0 {
        IntensityBand::Big
    } else if win_to_bet_ratio >= 5.0 {
        IntensityBand::Medium
    } else {
        IntensityBand::Small
    }
}

/// One winning ways combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinCombination {
    pub symbol: BaseSymbol,
    /// Consecutive reels matched, from the left (3..=5).
    pub count: u8,
    /// Product, over matched reels, of the number of matching cells.
    pub ways: u64,
    pub pay: f64,
    /// `(reel, row)` of every cell that contributed to this combination.
    pub positions: Vec<(u8, u8)>,
    pub band: IntensityBand,
}

/// Evaluates every non-special symbol's ways combination on `grid`. A
/// symbol wins at most once per cascade — its combination is the
/// left-anchored run, there being only one such run per symbol.
pub fn evaluate_ways(grid: &Grid, paytable: &PayTable, bet: f64) -> Vec<WinCombination> {
    BaseSymbol::REGULAR
        .into_iter()
        .filter_map(|symbol| evaluate_symbol(grid, symbol, paytable, bet))
        .collect()
}

fn evaluate_symbol(grid: &Grid, symbol: BaseSymbol, paytable: &PayTable, bet: f64) -> Option<WinCombination> {
    let mut ways: u64 = 1;
    let mut positions = Vec::new();
    let mut has_non_wild = false;
    let mut run_len = 0u8;

    for reel in 0..REELS {
        let matching: Vec<(u8, u8)> = matching_cells(grid, reel, symbol, &mut has_non_wild);
        if matching.is_empty() {
            break;
        }
        ways *= matching.len() as u64;
        positions.extend(matching);
        run_len += 1;
    }

    if run_len < 3 || !has_non_wild {
        return None;
    }

    let factor = paytable.factor(symbol, run_len);
    if factor <= 0.0 {
        return None;
    }

    let pay = factor * ways as f64 * bet;
    Some(WinCombination {
        symbol,
        count: run_len,
        ways,
        pay,
        positions,
        band: intensity_band(if bet > 0.0 { pay / bet } else { 0.0 }),
    })
}

fn matching_cells(grid: &Grid, reel: usize, symbol: BaseSymbol, has_non_wild: &mut bool) -> Vec<(u8, u8)> {
    use crate::grid::WIN_ROW_START;
    grid.win_region(reel)
        .iter()
        .enumerate()
        .filter_map(|(i, &token): (usize, &Token)| {
            let is_match = token.is_wild() || get_base_symbol(token) == symbol;
            if !is_match {
                return None;
            }
            if !token.is_wild() {
                *has_non_wild = true;
            }
            Some((reel as u8, (WIN_ROW_START + i) as u8))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ROWS;
    use sf_paytable::PayTable;

    fn grid_with_win_region(rows: [[Token; 4]; REELS]) -> Grid {
        let mut cells = [[Token::regular(BaseSymbol::Low4); ROWS]; REELS];
        for (reel, region) in rows.into_iter().enumerate() {
            for (i, token) in region.into_iter().enumerate() {
                cells[reel][5 + i] = token;
            }
        }
        Grid::from_reels(cells)
    }

    #[test]
    fn three_of_a_kind_ways_equals_one() {
        let paytable = PayTable::standard();
        let win = [Token::regular(BaseSymbol::High1); 4];
        let no_win = [Token::regular(BaseSymbol::Low2); 4];
        let grid = grid_with_win_region([win, win, win, no_win, no_win]);
        let wins = evaluate_ways(&grid, &paytable, 1.0);
        let high1 = wins.iter().find(|w| w.symbol == BaseSymbol::High1).unwrap();
        assert_eq!(high1.count, 3);
        assert_eq!(high1.ways, 1);
    }

    #[test]
    fn multiple_matches_per_reel_multiply_ways() {
        let paytable = PayTable::standard();
        let mut reel0 = [Token::regular(BaseSymbol::Low2); 4];
        reel0[0] = Token::regular(BaseSymbol::High2);
        reel0[1] = Token::regular(BaseSymbol::High2);
        let reel1 = [Token::regular(BaseSymbol::High2); 4];
        let reel2 = [Token::regular(BaseSymbol::High2); 4];
        let no_win = [Token::regular(BaseSymbol::Low2); 4];
        let grid = grid_with_win_region([reel0, reel1, reel2, no_win, no_win]);
        let wins = evaluate_ways(&grid, &paytable, 1.0);
        let high2 = wins.iter().find(|w| w.symbol == BaseSymbol::High2).unwrap();
        assert_eq!(high2.ways, 2 * 4 * 4);
    }

    #[test]
    fn wild_never_wins_standalone() {
        let paytable = PayTable::standard();
        let all_wild = [Token::wild(); 4];
        let grid = grid_with_win_region([all_wild, all_wild, all_wild, all_wild, all_wild]);
        let wins = evaluate_ways(&grid, &paytable, 1.0);
        assert!(wins.is_empty());
    }

    #[test]
    fn adding_a_wild_on_reel_zero_never_decreases_ways() {
        let paytable = PayTable::standard();
        let mut reel0_plain = [Token::regular(BaseSymbol::Low3); 4];
        reel0_plain[3] = Token::regular(BaseSymbol::Low2); // one non-matching cell
        let reel1 = [Token::regular(BaseSymbol::Low3); 4];
        let reel2 = [Token::regular(BaseSymbol::Low3); 4];
        let no_win = [Token::regular(BaseSymbol::Low1); 4];
        let grid_before = grid_with_win_region([reel0_plain, reel1, reel2, no_win, no_win]);
        let before = evaluate_ways(&grid_before, &paytable, 1.0);
        let ways_before = before
            .iter()
            .find(|w| w.symbol == BaseSymbol::Low3)
            .map(|w| w.ways)
            .unwrap_or(0);

        let mut reel0_with_wild = reel0_plain;
        reel0_with_wild[3] = Token::wild(); // replace the non-matching cell with a wild
        let grid_after = grid_with_win_region([reel0_with_wild, reel1, reel2, no_win, no_win]);
        let after = evaluate_ways(&grid_after, &paytable, 1.0);
        let ways_after = after
            .iter()
            .find(|w| w.symbol == BaseSymbol::Low3)
            .map(|w| w.ways)
            .unwrap_or(0);

        assert!(ways_after >= ways_before);
    }

    #[test]
    fn symbol_not_present_on_reel_zero_never_wins() {
        let paytable = PayTable::standard();
        let no_win = [Token::regular(BaseSymbol::Low1); 4];
        let win = [Token::regular(BaseSymbol::High1); 4];
        let grid = grid_with_win_region([no_win, win, win, win, win]);
        let wins = evaluate_ways(&grid, &paytable, 1.0);
        assert!(wins.iter().all(|w| w.symbol != BaseSymbol::High1));
    }
}
