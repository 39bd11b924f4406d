//! Strip sets, configurations, and player assignments — the objects a
//! `StripRepository` (the Store collaborator's strip-facing surface)
//! serves to the Orchestrator.

use chrono::{DateTime, Utc};
use sf_core::{ConfigId, GameMode, PlayerId, StripId};

/// Five reel-strip references bound together under a named configuration.
#[derive(Debug, Clone)]
pub struct StripConfig {
    pub id: ConfigId,
    pub name: String,
    pub game_mode: GameMode,
    pub strip_ids: [StripId; 5],
    pub activated_at: DateTime<Utc>,
    /// Per-player override; `None` means this config is mode-wide.
    pub player_id: Option<PlayerId>,
    /// At most one default per game-mode (enforced by the repository).
    pub is_default: bool,
}

impl StripConfig {
    pub fn new(name: impl Into<String>, game_mode: GameMode, strip_ids: [StripId; 5]) -> Self {
        Self {
            id: ConfigId::new(),
            name: name.into(),
            game_mode,
            strip_ids,
            activated_at: Utc::now(),
            player_id: None,
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn for_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }
}

/// Maps a player to the base-game and free-spins configurations they are
/// pinned to, with an optional expiry.
#[derive(Debug, Clone)]
pub struct PlayerAssignment {
    pub player_id: PlayerId,
    pub base_game_config: ConfigId,
    pub free_spins_config: ConfigId,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

impl PlayerAssignment {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_none_or(|exp| exp > now)
    }

    pub fn config_for_mode(&self, mode: GameMode) -> ConfigId {
        match mode {
            GameMode::FreeSpins => self.free_spins_config,
            GameMode::Base | GameMode::Trial => self.base_game_config,
        }
    }
}
