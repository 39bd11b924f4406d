//! The `Cache` collaborator: live PF session state and the atomic nonce
//! increment primitive (§5, §6). Live PF state never touches the Store —
//! only `Store::persist_pf_digest` sees it, and only after `end()`.

use async_trait::async_trait;
use parking_lot::Mutex;
use sf_core::{EngineError, PfSessionId};
use sf_pf::PfSession;
use std::collections::HashMap;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_pf_session(&self, id: PfSessionId) -> Result<Option<PfSession>, EngineError>;
    async fn set_pf_session(&self, session: PfSession) -> Result<(), EngineError>;
    async fn delete_pf_session(&self, id: PfSessionId) -> Result<(), EngineError>;

    /// Atomically bumps and returns the session's nonce counter.
    async fn increment_nonce(&self, id: PfSessionId) -> Result<u64, EngineError>;

    /// Scripted compare-and-set: succeeds only if the session currently in
    /// the cache still has `expected_nonce`. Returns `Conflict` otherwise —
    /// the caller lost the nonce race and should retry.
    async fn compare_and_set_pf_session(&self, expected_nonce: u64, session: PfSession) -> Result<(), EngineError>;
}

#[derive(Default)]
pub struct MemoryCache {
    sessions: Mutex<HashMap<PfSessionId, PfSession>>,
    nonces: Mutex<HashMap<PfSessionId, u64>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_pf_session(&self, id: PfSessionId) -> Result<Option<PfSession>, EngineError> {
        Ok(self.sessions.lock().get(&id).cloned())
    }

    async fn set_pf_session(&self, session: PfSession) -> Result<(), EngineError> {
        self.nonces.lock().entry(session.id).or_insert(session.nonce);
        self.sessions.lock().insert(session.id, session);
        Ok(())
    }

    async fn delete_pf_session(&self, id: PfSessionId) -> Result<(), EngineError> {
        self.sessions.lock().remove(&id);
        self.nonces.lock().remove(&id);
        Ok(())
    }

    async fn increment_nonce(&self, id: PfSessionId) -> Result<u64, EngineError> {
        let mut nonces = self.nonces.lock();
        let next = nonces.entry(id).or_insert(0);
        *next += 1;
        Ok(*next)
    }

    async fn compare_and_set_pf_session(&self, expected_nonce: u64, session: PfSession) -> Result<(), EngineError> {
        let mut sessions = self.sessions.lock();
        let current = sessions
            .get(&session.id)
            .ok_or_else(|| EngineError::not_found(format!("pf session {}", session.id)))?;
        if current.nonce != expected_nonce {
            return Err(EngineError::Conflict {
                message: format!("nonce race on pf session {}", session.id),
                attempts: 1,
            });
        }
        sessions.insert(session.id, session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sf_core::GameSessionId;
    use sf_rng::OsEntropy;

    #[tokio::test]
    async fn compare_and_set_rejects_stale_nonce() {
        let cache = MemoryCache::new();
        let session = PfSession::start(&OsEntropy, GameSessionId::new(), None, Utc::now()).unwrap();
        cache.set_pf_session(session.clone()).await.unwrap();

        let (advanced, _) = session.record_spin(b"client", 1).unwrap();
        cache.compare_and_set_pf_session(0, advanced.clone()).await.unwrap();

        // replaying the same expected_nonce=0 now fails: the session moved on
        let (advanced_again, _) = session.record_spin(b"client", 2).unwrap();
        let err = cache.compare_and_set_pf_session(0, advanced_again).await.unwrap_err();
        assert!(matches!(err, EngineError::Conflict { .. }));
        let _ = advanced;
    }

    #[tokio::test]
    async fn increment_nonce_is_monotonic() {
        let cache = MemoryCache::new();
        let id = PfSessionId::new();
        let a = cache.increment_nonce(id).await.unwrap();
        let b = cache.increment_nonce(id).await.unwrap();
        assert_eq!((a, b), (1, 2));
    }
}
