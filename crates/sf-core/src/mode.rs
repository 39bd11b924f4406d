//! Game mode and bet validation shared by strips, paytable, and the
//! orchestrator.

use serde::{Deserialize, Serialize};

/// Which weight table and multiplier ladder a spin draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Base,
    FreeSpins,
    Trial,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::FreeSpins => "free_spins",
            Self::Trial => "trial",
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Min/max/step bet bounds, validated by the Orchestrator before a bet is
/// ever debited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetSpec {
    pub min_bet: f64,
    pub max_bet: f64,
    pub bet_step: f64,
}

impl BetSpec {
    pub fn validate(&self, bet: f64) -> Result<(), crate::error::EngineError> {
        if bet <= 0.0 {
            return Err(crate::error::EngineError::validation(
                "bet must be positive",
            ));
        }
        if bet < self.min_bet || bet > self.max_bet {
            return Err(crate::error::EngineError::validation(format!(
                "bet {bet} outside [{}, {}]",
                self.min_bet, self.max_bet
            )));
        }
        if self.bet_step > 0.0 {
            let steps = (bet - self.min_bet) / self.bet_step;
            if (steps - steps.round()).abs() > 1e-9 {
                return Err(crate::error::EngineError::validation(format!(
                    "bet {bet} is not a multiple of step {}",
                    self.bet_step
                )));
            }
        }
        Ok(())
    }
}

impl Default for BetSpec {
    fn default() -> Self {
        Self {
            min_bet: 0.20,
            max_bet: 100.0,
            bet_step: 0.20,
        }
    }
}

/// Engine-level configuration (not the HTTP-facing config — this is what
/// the Orchestrator and Tuner are constructed with).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub bet: BetSpec,
    pub max_win_multiplier: f64,
    pub target_rtp: f64,
    pub base_game_multiplier_ladder: Vec<f64>,
    pub free_spins_multiplier_ladder: Vec<f64>,
    pub scatter_minimum: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bet: BetSpec::default(),
            max_win_multiplier: 5000.0,
            target_rtp: 96.5,
            base_game_multiplier_ladder: vec![1.0, 2.0, 3.0, 5.0],
            free_spins_multiplier_ladder: vec![2.0, 4.0, 6.0, 10.0],
            scatter_minimum: 3,
        }
    }
}

impl EngineConfig {
    pub fn multiplier_ladder(&self, mode: GameMode) -> &[f64] {
        match mode {
            GameMode::FreeSpins => &self.free_spins_multiplier_ladder,
            GameMode::Base | GameMode::Trial => &self.base_game_multiplier_ladder,
        }
    }

    /// Multiplier for a given 0-indexed cascade step; the ladder's last
    /// entry repeats for any step beyond it.
    pub fn multiplier_for_step(&self, mode: GameMode, step: usize) -> f64 {
        let ladder = self.multiplier_ladder(mode);
        ladder.get(step).copied().or_else(|| ladder.last().copied()).unwrap_or(1.0)
    }
}
