//! The scatter-to-free-spins award formula.

/// Minimum scatter count anywhere in the win region that triggers free
/// spins.
pub const MIN_SCATTERS_FOR_FREE_SPIN: u8 = 3;

/// `GetFreeSpinsAward`: 3 scatters -> 12 spins, 4 -> 14, 5 -> 16, generally
/// `12 + 2*(n - 3)` for any `n >= 3`.
pub fn get_free_spins_award(scatter_count: u8) -> u32 {
    if scatter_count < MIN_SCATTERS_FOR_FREE_SPIN {
        return 0;
    }
    12 + 2 * (scatter_count - MIN_SCATTERS_FOR_FREE_SPIN) as u32
}
