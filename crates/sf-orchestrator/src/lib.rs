//! Binds a spin request to a provably-fair session, the strip repository,
//! and the grid/cascade evaluator, persisting through two capability
//! interfaces (`Store`, `Cache`) so a composition root can wire in real
//! backends without this crate knowing about them.

mod cache;
mod dto;
mod orchestrator;
mod store;

pub use cache::{Cache, MemoryCache};
pub use dto::{FreeSpinRequest, FreeSpinsInfo, GameSession, PfInfo, SpinOutcome, SpinRequest};
pub use orchestrator::Orchestrator;
pub use store::{MemoryStore, Store};

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::{EngineConfig, GameMode, GameSessionId, PlayerId, StripId};
    use sf_paytable::{base_game_weights, free_spins_weights, PayTable};
    use sf_rng::OsEntropy;
    use sf_strips::{generate_strip, MemoryStripStore, ReelStrip, StripConfig, StripRepository};
    use std::sync::Arc;

    fn seed_strips(store: &MemoryStripStore, mode: GameMode) {
        let weights = match mode {
            GameMode::FreeSpins => free_spins_weights(),
            GameMode::Base | GameMode::Trial => base_game_weights(),
        };
        let mut ids = [StripId::new(); 5];
        for (reel, id) in ids.iter_mut().enumerate() {
            let content = generate_strip(&weights, reel, &OsEntropy).unwrap();
            let strip = ReelStrip::new(mode, reel as u8, content);
            *id = strip.id;
            store.insert_strip(strip);
        }
        let config = StripConfig::new(format!("{mode:?}-default"), mode, ids).as_default();
        store.insert_config(config);
    }

    fn wire() -> (Arc<MemoryStore>, Arc<MemoryCache>, Orchestrator<MemoryStore, MemoryCache>, GameSessionId, PlayerId) {
        let strip_store = MemoryStripStore::new();
        seed_strips(&strip_store, GameMode::Base);
        seed_strips(&strip_store, GameMode::FreeSpins);

        let store = MemoryStore::new(strip_store);
        let cache = Arc::new(MemoryCache::new());
        let player_id = PlayerId::new();
        let game_session_id = GameSessionId::new();
        store.seed_player_balance(player_id, 1000.0);

        let orchestrator = Orchestrator::new(
            store.clone(),
            cache.clone(),
            Arc::new(OsEntropy),
            PayTable::standard(),
            EngineConfig::default(),
        );
        (store, cache, orchestrator, game_session_id, player_id)
    }

    #[tokio::test]
    async fn spin_rejects_an_unknown_session() {
        let (_, _, orchestrator, _game_session_id, _player_id) = wire();
        let request = SpinRequest {
            session_id: Some(GameSessionId::new()),
            bet_amount: 1.0,
            ..Default::default()
        };
        let err = orchestrator.spin(request, &sf_core::CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, sf_core::EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn spin_opens_a_pf_session_lazily_and_debits_the_bet() {
        let (store, _cache, orchestrator, game_session_id, player_id) = wire();
        store
            .set_game_session(GameSession {
                id: game_session_id,
                player_id,
                balance: 1000.0,
                active: true,
                pf_session_id: None,
            })
            .await
            .unwrap();

        let request = SpinRequest {
            session_id: Some(game_session_id),
            bet_amount: 2.0,
            ..Default::default()
        };
        let outcome = orchestrator.spin(request, &sf_core::CancellationToken::new()).await.unwrap();
        assert!(outcome.balance_after <= 1000.0);
        assert_eq!(outcome.pf.nonce, 1);

        let session = store.get_game_session(game_session_id).await.unwrap();
        assert!(session.pf_session_id.is_some());
    }

    #[tokio::test]
    async fn spin_rejects_a_bet_below_the_configured_minimum() {
        let (store, _cache, orchestrator, game_session_id, player_id) = wire();
        store
            .set_game_session(GameSession {
                id: game_session_id,
                player_id,
                balance: 1000.0,
                active: true,
                pf_session_id: None,
            })
            .await
            .unwrap();

        let request = SpinRequest {
            session_id: Some(game_session_id),
            bet_amount: 0.0,
            ..Default::default()
        };
        let err = orchestrator.spin(request, &sf_core::CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, sf_core::EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn spin_is_discarded_when_the_token_is_already_cancelled() {
        let (store, _cache, orchestrator, game_session_id, player_id) = wire();
        store
            .set_game_session(GameSession {
                id: game_session_id,
                player_id,
                balance: 1000.0,
                active: true,
                pf_session_id: None,
            })
            .await
            .unwrap();

        let token = sf_core::CancellationToken::new();
        token.cancel();
        let request = SpinRequest {
            session_id: Some(game_session_id),
            bet_amount: 2.0,
            ..Default::default()
        };
        let err = orchestrator.spin(request, &token).await.unwrap_err();
        assert!(matches!(err, sf_core::EngineError::InconsistentState(_)));

        // no bet was debited: the balance is untouched by the discarded spin.
        let balance = store.debit_credit(player_id, 0.0).await.unwrap();
        assert_eq!(balance, 1000.0);
    }
}
