//! The 5×10 grid: rows 0..3 are off-screen buffer, rows 4..9 are visible,
//! rows 5..8 (inclusive) are the win region. `CountScatters` and win
//! detection only consider the win region.

use serde::{Deserialize, Serialize};
use sf_paytable::Token;
use sf_rng::UniformSource;
use sf_strips::ReelStrip;

pub const REELS: usize = 5;
pub const ROWS: usize = 10;
pub const VISIBLE_ROW_START: usize = 4;
pub const WIN_ROW_START: usize = 5;
pub const WIN_ROW_END_INCLUSIVE: usize = 8;

/// For each reel, the index on its strip landing in row 0 of the grid.
pub type ReelPositions = [i64; REELS];

/// A fully populated 5×10 grid of symbol tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Token; ROWS]; REELS],
}

impl Grid {
    pub fn from_reels(reels: [[Token; ROWS]; REELS]) -> Self {
        Self { cells: reels }
    }

    pub fn get(&self, reel: usize, row: usize) -> Token {
        self.cells[reel][row]
    }

    pub fn reel(&self, reel: usize) -> &[Token; ROWS] {
        &self.cells[reel]
    }

    pub fn set(&mut self, reel: usize, row: usize, token: Token) {
        self.cells[reel][row] = token;
    }

    /// Cells in the win region (rows 5..=8) of one reel.
    pub fn win_region(&self, reel: usize) -> &[Token] {
        &self.cells[reel][WIN_ROW_START..=WIN_ROW_END_INCLUSIVE]
    }

    /// Scatters in the win region only — scatters in the buffer rows do
    /// not count toward a trigger (§8 "scatter locality").
    pub fn count_scatters(&self) -> u8 {
        (0..REELS)
            .flat_map(|reel| self.win_region(reel).iter())
            .filter(|t| t.is_scatter())
            .count() as u8
    }
}

/// Draws reel positions and fills the grid: `pos[i] = rng.int_n(len(strip[i]))`,
/// then `grid[i][row] = strip[i][pos[i] + row mod len]` for `row` in `0..ROWS`.
pub fn draw_grid<R: UniformSource>(strips: &[ReelStrip; REELS], rng: &mut R) -> (ReelPositions, Grid) {
    let mut positions: ReelPositions = [0; REELS];
    let mut cells = [[Token::wild(); ROWS]; REELS];

    for (reel, strip) in strips.iter().enumerate() {
        let pos = rng.int_n(strip.len() as u64) as i64;
        positions[reel] = pos;
        for row in 0..ROWS {
            cells[reel][row] = strip.symbol_at(pos + row as i64);
        }
    }

    (positions, Grid::from_reels(cells))
}
