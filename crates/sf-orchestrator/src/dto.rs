//! Request/response DTOs the Orchestrator exchanges with Transport. All
//! serde-derived so a Transport crate (out of scope) can marshal them
//! directly.

use serde::{Deserialize, Serialize};
use sf_core::{FreeSpinsSessionId, GameMode, GameSessionId, HexHash, PlayerId};
use sf_grid::{CascadeResult, ReelPositions};

/// A player's active game session. `pf_session_id` is `None` until the
/// first spin lazily opens one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: GameSessionId,
    pub player_id: PlayerId,
    pub balance: f64,
    pub active: bool,
    pub pf_session_id: Option<sf_core::PfSessionId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpinRequest {
    pub session_id: Option<GameSessionId>,
    pub bet_amount: f64,
    pub game_mode: Option<GameMode>,
    pub client_seed: Option<Vec<u8>>,
    pub theta_seed: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSpinRequest {
    pub free_spins_session_id: FreeSpinsSessionId,
    pub client_seed: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PfInfo {
    pub spin_hash: HexHash,
    pub prev_spin_hash: Option<HexHash>,
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSpinsInfo {
    pub session_id: FreeSpinsSessionId,
    pub remaining: u32,
    pub total_awarded: u32,
}

/// The full response to a `Spin` or `ExecuteFreeSpin` request (§6's wire
/// surface, aggregated the way `rf-slot-lab`'s spin result aggregates a
/// grid, its cascades, and bookkeeping into one payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub reel_positions: ReelPositions,
    pub cascades: Vec<CascadeResult>,
    pub spin_total_win: f64,
    pub scatter_count: u8,
    pub balance_after: f64,
    pub pf: PfInfo,
    pub free_spins: Option<FreeSpinsInfo>,
}
