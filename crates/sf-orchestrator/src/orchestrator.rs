//! The spin orchestrator: binds a request to a PF session, resolves
//! strips, draws and evaluates a grid, and (for the base game) may open a
//! free-spins session. §4.7's 8-step pipeline, plus the free-spin variant.

use crate::cache::Cache;
use crate::dto::{FreeSpinRequest, FreeSpinsInfo, GameSession, PfInfo, SpinOutcome, SpinRequest};
use crate::store::Store;
use chrono::Utc;
use sf_core::{CancellationToken, EngineConfig, EngineError, GameMode, HexHash, PfSessionId, PlayerId};
use sf_freespins::{FreeSpinsEvent, FreeSpinsSession};
use sf_grid::{draw_grid, run_cascade, CascadeResult, ReelPositions};
use sf_paytable::{get_free_spins_award, PayTable};
use sf_pf::{EndedPfSession, PfSession, SpinReceipt};
use sf_rng::{DeterministicRng, Entropy};
use std::sync::Arc;

/// Bound on retries after losing the PF session's nonce compare-and-set
/// race (§7 "Conflict ... retries up to a small bound before surfacing").
const MAX_NONCE_RETRIES: u32 = 5;

pub struct Orchestrator<S: Store, C: Cache> {
    store: Arc<S>,
    cache: Arc<C>,
    entropy: Arc<dyn Entropy>,
    paytable: PayTable,
    config: EngineConfig,
}

impl<S: Store, C: Cache> Orchestrator<S, C> {
    pub fn new(store: Arc<S>, cache: Arc<C>, entropy: Arc<dyn Entropy>, paytable: PayTable, config: EngineConfig) -> Self {
        Self {
            store,
            cache,
            entropy,
            paytable,
            config,
        }
    }

    pub async fn start_pf_session(
        &self,
        game_session_id: sf_core::GameSessionId,
        theta_commitment: Option<HexHash>,
    ) -> Result<(PfSessionId, HexHash), EngineError> {
        let session = PfSession::start(self.entropy.as_ref(), game_session_id, theta_commitment, Utc::now())?;
        let id = session.id;
        let hash = session.server_seed_hash;
        self.cache.set_pf_session(session).await?;
        Ok((id, hash))
    }

    pub async fn end_pf_session(&self, id: PfSessionId) -> Result<EndedPfSession, EngineError> {
        let session = self
            .cache
            .get_pf_session(id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("pf session {id}")))?;
        let (_ended, digest) = session.end()?;
        self.store.persist_pf_digest(digest.clone()).await?;
        self.cache.delete_pf_session(id).await?;
        Ok(digest)
    }

    pub async fn spin(&self, request: SpinRequest, cancel: &CancellationToken) -> Result<SpinOutcome, EngineError> {
        let session_id = request
            .session_id
            .ok_or_else(|| EngineError::validation("sessionId is required"))?;
        let mut game_session = self.store.get_game_session(session_id).await?; // step 1
        if !game_session.active {
            return Err(EngineError::inconsistent("game session has ended"));
        }

        let mode = request.game_mode.unwrap_or(GameMode::Base);
        self.config.bet.validate(request.bet_amount)?;

        let pf_session_id = self.load_or_create_pf_session(&mut game_session).await?; // step 2
        let client_seed = request
            .client_seed
            .clone()
            .unwrap_or_else(|| game_session.player_id.to_string().into_bytes());

        if let Some(theta_seed) = request.theta_seed.clone() {
            self.reveal_theta(pf_session_id, theta_seed).await?;
        }

        // Last chance to bail before the first store-commit: nothing
        // durable has happened yet, so cancellation here discards cleanly.
        cancel.check()?;

        // step 4: debit (and so the insufficient-funds check) happens before
        // the nonce ever advances, so a rejected spin never leaves the PF
        // session pointing at a hash with no corresponding receipt.
        self.store.debit_credit(game_session.player_id, -request.bet_amount).await?;

        let (pf_session, receipt) = self.advance_pf_session(pf_session_id, &client_seed).await?; // step 5

        let (positions, cascades, capped_win, scatter_count) = self
            .draw_and_evaluate(&pf_session, &receipt, &client_seed, game_session.player_id, mode, request.bet_amount) // step 6
            .await?;

        let free_spins = if mode != GameMode::FreeSpins && scatter_count >= self.config.scatter_minimum {
            Some(self.open_free_spins(&game_session, request.bet_amount, scatter_count).await?)
        } else {
            None
        };

        let balance_after = self.store.debit_credit(game_session.player_id, capped_win).await?; // step 7
        self.store.insert_spin(game_session.id, receipt.clone()).await?;

        Ok(SpinOutcome {
            reel_positions: positions,
            cascades,
            spin_total_win: capped_win,
            scatter_count,
            balance_after,
            pf: PfInfo {
                spin_hash: receipt.spin_hash,
                prev_spin_hash: receipt.prev_spin_hash,
                nonce: receipt.nonce,
            },
            free_spins,
        })
    }

    /// Same pipeline, forced to `lockedBet`, no debit, closing the
    /// free-spins session on completion.
    pub async fn execute_free_spin(&self, request: FreeSpinRequest, cancel: &CancellationToken) -> Result<SpinOutcome, EngineError> {
        let session = self.store.get_free_spins_session(request.free_spins_session_id).await?;
        if !session.active {
            return Err(EngineError::inconsistent("free spins session is not active"));
        }

        let game_session = self.store.get_game_session(session.game_session_id).await?;
        let pf_session_id = game_session
            .pf_session_id
            .ok_or_else(|| EngineError::inconsistent("no PF session bound to this game session"))?;

        let client_seed = request
            .client_seed
            .clone()
            .unwrap_or_else(|| session.player_id.to_string().into_bytes());

        // Nothing durable committed yet: safe to discard cleanly here.
        cancel.check()?;

        let (pf_session, receipt) = self.advance_pf_session(pf_session_id, &client_seed).await?;
        let (positions, cascades, capped_win, scatter_count) = self
            .draw_and_evaluate(
                &pf_session,
                &receipt,
                &client_seed,
                session.player_id,
                GameMode::FreeSpins,
                session.locked_bet,
            )
            .await?;

        let retrigger_award = (scatter_count >= self.config.scatter_minimum).then(|| get_free_spins_award(scatter_count));
        let advanced = session.apply(FreeSpinsEvent::ExecuteSpin {
            win: capped_win,
            retrigger_award,
        })?;
        self.store.upsert_free_spins_session(advanced.clone()).await?;

        let balance_after = self.store.debit_credit(session.player_id, capped_win).await?;
        self.store.insert_spin(game_session.id, receipt.clone()).await?;

        Ok(SpinOutcome {
            reel_positions: positions,
            cascades,
            spin_total_win: capped_win,
            scatter_count,
            balance_after,
            pf: PfInfo {
                spin_hash: receipt.spin_hash,
                prev_spin_hash: receipt.prev_spin_hash,
                nonce: receipt.nonce,
            },
            free_spins: Some(FreeSpinsInfo {
                session_id: advanced.id,
                remaining: advanced.remaining,
                total_awarded: advanced.total_awarded,
            }),
        })
    }

    async fn load_or_create_pf_session(&self, game_session: &mut GameSession) -> Result<PfSessionId, EngineError> {
        if let Some(id) = game_session.pf_session_id {
            let existing = self
                .cache
                .get_pf_session(id)
                .await?
                .ok_or_else(|| EngineError::not_found(format!("pf session {id}")))?;
            if existing.ended {
                return Err(EngineError::inconsistent("PF session has ended"));
            }
            return Ok(id);
        }

        let created = PfSession::start(self.entropy.as_ref(), game_session.id, None, Utc::now())?;
        let id = created.id;
        self.cache.set_pf_session(created).await?;
        game_session.pf_session_id = Some(id);
        self.store.set_game_session(game_session.clone()).await?;
        Ok(id)
    }

    async fn reveal_theta(&self, pf_session_id: PfSessionId, theta_seed: Vec<u8>) -> Result<(), EngineError> {
        let current = self
            .cache
            .get_pf_session(pf_session_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("pf session {pf_session_id}")))?;
        let revealed = current.reveal_theta(theta_seed)?;
        self.cache.set_pf_session(revealed).await
    }

    async fn advance_pf_session(&self, id: PfSessionId, client_seed: &[u8]) -> Result<(PfSession, SpinReceipt), EngineError> {
        for attempt in 0..MAX_NONCE_RETRIES {
            let current = self
                .cache
                .get_pf_session(id)
                .await?
                .ok_or_else(|| EngineError::not_found(format!("pf session {id}")))?;
            if current.ended {
                return Err(EngineError::inconsistent("PF session has ended"));
            }

            let nonce = self.cache.increment_nonce(id).await?;
            let (next, receipt) = current.record_spin(client_seed, nonce)?;
            match self.cache.compare_and_set_pf_session(current.nonce, next.clone()).await {
                Ok(()) => return Ok((next, receipt)),
                Err(EngineError::Conflict { .. }) if attempt + 1 < MAX_NONCE_RETRIES => {
                    tracing::warn!(attempt, pf_session = %id, "nonce race on PF session, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(EngineError::Conflict {
            message: format!("exhausted nonce retries on pf session {id}"),
            attempts: MAX_NONCE_RETRIES,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn draw_and_evaluate(
        &self,
        pf_session: &PfSession,
        receipt: &SpinReceipt,
        client_seed: &[u8],
        player_id: PlayerId,
        mode: GameMode,
        bet: f64,
    ) -> Result<(ReelPositions, Vec<CascadeResult>, f64, u8), EngineError> {
        let strip_config = self.store.strip_config_for_player(player_id, mode).await?;
        let strips = self.store.resolve_strips(&strip_config).await?;

        let key = pf_session.rng_key(client_seed, receipt.nonce);
        let mut rng = DeterministicRng::from_key(key);
        let (mut positions, grid) = draw_grid(&strips, &mut rng);
        let scatter_count = grid.count_scatters();

        let (cascades, total_win) = run_cascade(grid, &strips, &mut positions, &self.paytable, bet, mode, &self.config);
        let capped_win = total_win.min(bet * self.config.max_win_multiplier);

        Ok((positions, cascades, capped_win, scatter_count))
    }

    async fn open_free_spins(
        &self,
        game_session: &GameSession,
        locked_bet: f64,
        scatter_count: u8,
    ) -> Result<FreeSpinsInfo, EngineError> {
        let award = get_free_spins_award(scatter_count);
        let fs_config = self
            .store
            .strip_config_for_player(game_session.player_id, GameMode::FreeSpins)
            .await?;
        let session = FreeSpinsSession::trigger(
            game_session.player_id,
            game_session.id,
            fs_config.id,
            locked_bet,
            award,
            Utc::now(),
        );
        self.store.upsert_free_spins_session(session.clone()).await?;
        Ok(FreeSpinsInfo {
            session_id: session.id,
            remaining: session.remaining,
            total_awarded: session.total_awarded,
        })
    }
}
