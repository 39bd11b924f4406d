//! `PfSession`: commit/reveal lifecycle for one game session's provably-fair
//! state. The server seed never leaves this module except through `end()`.

use crate::commitment::{server_seed_hash, spin_hash, verify_theta};
use crate::receipt::SpinReceipt;
use chrono::{DateTime, Utc};
use sf_core::{EngineError, GameSessionId, HexHash, PfSessionId};
use sf_rng::Entropy;

#[derive(Clone)]
pub struct PfSession {
    pub id: PfSessionId,
    pub game_session_id: GameSessionId,
    server_seed: [u8; 32],
    pub server_seed_hash: HexHash,
    pub theta_commitment: Option<HexHash>,
    theta_seed: Option<Vec<u8>>,
    pub nonce: u64,
    pub prev_spin_hash: Option<HexHash>,
    pub ended: bool,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for PfSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PfSession")
            .field("id", &self.id)
            .field("game_session_id", &self.game_session_id)
            .field("server_seed", &"<redacted>")
            .field("server_seed_hash", &self.server_seed_hash)
            .field("theta_commitment", &self.theta_commitment)
            .field("nonce", &self.nonce)
            .field("prev_spin_hash", &self.prev_spin_hash)
            .field("ended", &self.ended)
            .finish()
    }
}

/// The revealed state returned from `end()`: safe to persist and to hand
/// back to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct EndedPfSession {
    pub id: PfSessionId,
    pub server_seed: HexHash,
    pub server_seed_hash: HexHash,
    pub total_spins: u64,
}

impl PfSession {
    pub fn start(
        entropy: &dyn Entropy,
        game_session_id: GameSessionId,
        theta_commitment: Option<HexHash>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        let server_seed = entropy.server_seed()?;
        Ok(Self {
            id: PfSessionId::new(),
            game_session_id,
            server_seed,
            server_seed_hash: server_seed_hash(&server_seed),
            theta_commitment,
            theta_seed: None,
            nonce: 0,
            prev_spin_hash: None,
            ended: false,
            created_at,
        })
    }

    /// Dual commitment: the client reveals `theta_seed` on its first spin.
    /// Must match the `thetaCommitment` submitted at session start.
    pub fn reveal_theta(&self, theta_seed: Vec<u8>) -> Result<Self, EngineError> {
        let commitment = self
            .theta_commitment
            .ok_or_else(|| EngineError::validation("session has no theta commitment to reveal against"))?;
        if self.theta_seed.is_some() {
            return Err(EngineError::inconsistent("theta seed already revealed"));
        }
        if !verify_theta(&theta_seed, commitment) {
            return Err(EngineError::validation("theta seed does not match its commitment"));
        }
        let mut next = self.clone();
        next.theta_seed = Some(theta_seed);
        Ok(next)
    }

    /// The key material the deterministic RNG should mix in, if a theta
    /// seed has been revealed.
    pub fn theta_seed(&self) -> Option<&[u8]> {
        self.theta_seed.as_deref()
    }

    /// Records one spin at the given nonce — the nonce itself must already
    /// have been atomically assigned by the caller's cache (§5); this is
    /// the pure state-transition half of `Spin` step 4/7. Returns the
    /// updated session and the receipt to persist/respond with.
    pub fn record_spin(&self, client_seed: &[u8], nonce: u64) -> Result<(Self, SpinReceipt), EngineError> {
        if self.ended {
            return Err(EngineError::inconsistent("PF session has ended"));
        }
        if nonce <= self.nonce {
            return Err(EngineError::inconsistent(format!(
                "nonce must be strictly increasing: got {nonce}, had {}",
                self.nonce
            )));
        }

        let hash = spin_hash(&self.server_seed, client_seed, nonce, self.prev_spin_hash);
        let receipt = SpinReceipt {
            nonce,
            client_seed: client_seed.to_vec(),
            spin_hash: hash,
            prev_spin_hash: self.prev_spin_hash,
        };

        let mut next = self.clone();
        next.nonce = nonce;
        next.prev_spin_hash = Some(hash);
        Ok((next, receipt))
    }

    /// The DRBG key for the spin at `nonce`, mixing in theta if revealed.
    pub fn rng_key(&self, client_seed: &[u8], nonce: u64) -> [u8; 32] {
        sf_rng::derive_key(&self.server_seed, client_seed, nonce as i64, self.theta_seed())
    }

    pub fn end(&self) -> Result<(Self, EndedPfSession), EngineError> {
        if self.ended {
            return Err(EngineError::inconsistent("PF session already ended"));
        }
        let mut next = self.clone();
        next.ended = true;
        let revealed = EndedPfSession {
            id: self.id,
            server_seed: HexHash(self.server_seed),
            server_seed_hash: self.server_seed_hash,
            total_spins: self.nonce,
        };
        Ok((next, revealed))
    }
}
