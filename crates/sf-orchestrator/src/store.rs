//! The `Store` collaborator: players, game sessions, spin receipts, PF
//! digests, free-spins sessions, and strip configuration. A real
//! implementation is an external collaborator (§1); this module only
//! defines the capability interface plus an in-memory reference double
//! used by tests.

use crate::dto::GameSession;
use async_trait::async_trait;
use parking_lot::RwLock;
use sf_core::{EngineError, GameMode, GameSessionId, PlayerId};
use sf_freespins::FreeSpinsSession;
use sf_pf::{EndedPfSession, SpinReceipt};
use sf_strips::{MemoryStripStore, ReelStrip, StripConfig, StripRepository};
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Store: Send + Sync {
    async fn get_game_session(&self, id: GameSessionId) -> Result<GameSession, EngineError>;
    async fn set_game_session(&self, session: GameSession) -> Result<(), EngineError>;
    async fn debit_credit(&self, player_id: PlayerId, delta: f64) -> Result<f64, EngineError>;
    async fn insert_spin(&self, game_session_id: GameSessionId, receipt: SpinReceipt) -> Result<(), EngineError>;
    async fn persist_pf_digest(&self, digest: EndedPfSession) -> Result<(), EngineError>;
    async fn get_free_spins_session(&self, id: sf_core::FreeSpinsSessionId) -> Result<FreeSpinsSession, EngineError>;
    async fn upsert_free_spins_session(&self, session: FreeSpinsSession) -> Result<(), EngineError>;
    async fn strip_config_for_player(&self, player_id: PlayerId, mode: GameMode) -> Result<StripConfig, EngineError>;
    async fn resolve_strips(&self, config: &StripConfig) -> Result<[ReelStrip; 5], EngineError>;
}

/// Read/write-through-a-lock in-memory reference Store. No real
/// transaction isolation — each method is individually atomic under its
/// own lock, which is enough for tests and for the composition root's
/// default wiring, but not a substitute for a real database.
pub struct MemoryStore {
    strips: MemoryStripStore,
    game_sessions: RwLock<HashMap<GameSessionId, GameSession>>,
    players: RwLock<HashMap<PlayerId, f64>>,
    spins: RwLock<Vec<(GameSessionId, SpinReceipt)>>,
    pf_digests: RwLock<Vec<EndedPfSession>>,
    free_spins: RwLock<HashMap<sf_core::FreeSpinsSessionId, FreeSpinsSession>>,
}

impl MemoryStore {
    pub fn new(strips: MemoryStripStore) -> Arc<Self> {
        Arc::new(Self {
            strips,
            game_sessions: RwLock::new(HashMap::new()),
            players: RwLock::new(HashMap::new()),
            spins: RwLock::new(Vec::new()),
            pf_digests: RwLock::new(Vec::new()),
            free_spins: RwLock::new(HashMap::new()),
        })
    }

    pub fn seed_player_balance(&self, player_id: PlayerId, balance: f64) {
        self.players.write().insert(player_id, balance);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_game_session(&self, id: GameSessionId) -> Result<GameSession, EngineError> {
        self.game_sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("game session {id}")))
    }

    async fn set_game_session(&self, session: GameSession) -> Result<(), EngineError> {
        self.game_sessions.write().insert(session.id, session);
        Ok(())
    }

    async fn debit_credit(&self, player_id: PlayerId, delta: f64) -> Result<f64, EngineError> {
        let mut players = self.players.write();
        let balance = players.entry(player_id).or_insert(0.0);
        let next = *balance + delta;
        if next < 0.0 {
            return Err(EngineError::InsufficientFunds {
                balance: *balance,
                requested: -delta,
            });
        }
        *balance = next;
        Ok(next)
    }

    async fn insert_spin(&self, game_session_id: GameSessionId, receipt: SpinReceipt) -> Result<(), EngineError> {
        self.spins.write().push((game_session_id, receipt));
        Ok(())
    }

    async fn persist_pf_digest(&self, digest: EndedPfSession) -> Result<(), EngineError> {
        self.pf_digests.write().push(digest);
        Ok(())
    }

    async fn get_free_spins_session(&self, id: sf_core::FreeSpinsSessionId) -> Result<FreeSpinsSession, EngineError> {
        self.free_spins
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("free spins session {id}")))
    }

    async fn upsert_free_spins_session(&self, session: FreeSpinsSession) -> Result<(), EngineError> {
        self.free_spins.write().insert(session.id, session);
        Ok(())
    }

    async fn strip_config_for_player(&self, player_id: PlayerId, mode: GameMode) -> Result<StripConfig, EngineError> {
        self.strips.get_config_for_player(player_id, mode)
    }

    async fn resolve_strips(&self, config: &StripConfig) -> Result<[ReelStrip; 5], EngineError> {
        self.strips.resolve_strips(config)
    }
}
