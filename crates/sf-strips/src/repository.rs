//! `StripRepository`: the Store collaborator's strip-facing capability
//! interface, plus an in-memory reference implementation used by tests and
//! by the tuning loop.

use crate::config::{PlayerAssignment, StripConfig};
use crate::strip::ReelStrip;
use chrono::Utc;
use parking_lot::RwLock;
use sf_core::{ConfigId, EngineError, GameMode, PlayerId, StripId};
use std::collections::HashMap;

pub trait StripRepository: Send + Sync {
    fn get_strip(&self, id: StripId) -> Option<ReelStrip>;
    fn get_config(&self, id: ConfigId) -> Option<StripConfig>;
    fn default_config(&self, mode: GameMode) -> Option<StripConfig>;
    fn assignment(&self, player_id: PlayerId) -> Option<PlayerAssignment>;

    fn insert_strip(&self, strip: ReelStrip);
    fn insert_config(&self, config: StripConfig);
    fn set_assignment(&self, assignment: PlayerAssignment);

    /// Lookup precedence: explicit player assignment -> game-mode default
    /// -> error (§3).
    fn get_config_for_player(
        &self,
        player_id: PlayerId,
        mode: GameMode,
    ) -> Result<StripConfig, EngineError> {
        if let Some(assignment) = self.assignment(player_id) {
            if assignment.is_live(Utc::now()) {
                let config_id = assignment.config_for_mode(mode);
                if let Some(config) = self.get_config(config_id) {
                    return Ok(config);
                }
            }
        }
        self.default_config(mode).ok_or_else(|| {
            EngineError::not_found(format!("no strip configuration for mode {mode}"))
        })
    }

    fn resolve_strips(&self, config: &StripConfig) -> Result<[ReelStrip; 5], EngineError> {
        let mut strips = Vec::with_capacity(5);
        for id in config.strip_ids {
            let strip = self
                .get_strip(id)
                .ok_or_else(|| EngineError::not_found(format!("reel strip {id} missing")))?;
            strip.verify_integrity()?;
            if !strip.active {
                return Err(EngineError::inconsistent(format!(
                    "reel strip {id} is inactive"
                )));
            }
            strips.push(strip);
        }
        strips
            .try_into()
            .map_err(|_| EngineError::integrity("strip config did not resolve to 5 strips"))
    }
}

/// Read-mostly in-memory reference implementation. Readers take a read
/// lock; a refresher (out of scope here — owned by Transport/Store) would
/// swap each map under a write lock, per §5's "background refresh" model.
#[derive(Default)]
pub struct MemoryStripStore {
    strips: RwLock<HashMap<StripId, ReelStrip>>,
    configs: RwLock<HashMap<ConfigId, StripConfig>>,
    defaults: RwLock<HashMap<GameMode, ConfigId>>,
    assignments: RwLock<HashMap<PlayerId, PlayerAssignment>>,
}

impl MemoryStripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StripRepository for MemoryStripStore {
    fn get_strip(&self, id: StripId) -> Option<ReelStrip> {
        self.strips.read().get(&id).cloned()
    }

    fn get_config(&self, id: ConfigId) -> Option<StripConfig> {
        self.configs.read().get(&id).cloned()
    }

    fn default_config(&self, mode: GameMode) -> Option<StripConfig> {
        let config_id = *self.defaults.read().get(&mode)?;
        self.get_config(config_id)
    }

    fn assignment(&self, player_id: PlayerId) -> Option<PlayerAssignment> {
        self.assignments.read().get(&player_id).cloned()
    }

    fn insert_strip(&self, strip: ReelStrip) {
        self.strips.write().insert(strip.id, strip);
    }

    fn insert_config(&self, config: StripConfig) {
        // At most one default per game-mode: a newly inserted default
        // simply replaces the prior mapping.
        if config.is_default {
            self.defaults.write().insert(config.game_mode, config.id);
        }
        self.configs.write().insert(config.id, config);
    }

    fn set_assignment(&self, assignment: PlayerAssignment) {
        self.assignments.write().insert(assignment.player_id, assignment);
    }
}
