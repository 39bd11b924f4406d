//! sf-grid: the 5x10 grid, ways-to-win detection, and the cascade loop
//! (gold transform, removal, gravity refill, escalating multiplier).

mod cascade;
mod grid;
mod ways;

pub use cascade::{apply_gold_transform, refill, remove, run_cascade, CascadeResult};
pub use grid::{draw_grid, Grid, ReelPositions, REELS, ROWS, VISIBLE_ROW_START, WIN_ROW_END_INCLUSIVE, WIN_ROW_START};
pub use ways::{evaluate_ways, intensity_band, IntensityBand, WinCombination};
