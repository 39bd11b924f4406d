//! The three offline verification endpoints from §4.6, each a pure
//! function so Transport only needs to marshal requests/responses.

use crate::commitment::spin_hash;
use crate::receipt::SpinReceipt;
use sf_core::HexHash;
use sf_grid::{draw_grid, ReelPositions, REELS};
use sf_rng::DeterministicRng;
use sf_strips::ReelStrip;

#[derive(Debug, Clone, PartialEq)]
pub struct VerifySpinInput {
    pub server_seed: Vec<u8>,
    pub client_seed: Vec<u8>,
    pub nonce: u64,
    pub prev_spin_hash: Option<HexHash>,
    pub spin_hash: HexHash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyResult {
    pub valid: bool,
    pub expected_hash: HexHash,
}

/// `VerifySpin`: recompute the hash from the revealed seed and compare.
pub fn verify_single_spin(input: &VerifySpinInput) -> VerifyResult {
    let expected = spin_hash(&input.server_seed, &input.client_seed, input.nonce, input.prev_spin_hash);
    VerifyResult {
        valid: expected == input.spin_hash,
        expected_hash: expected,
    }
}

#[derive(Debug, Clone)]
pub struct VerifyWithReelInput {
    pub spin: VerifySpinInput,
    pub theta_seed: Option<Vec<u8>>,
    pub claimed_positions: ReelPositions,
    pub strips: [ReelStrip; REELS],
}

/// `VerifySpinWithReel`: beyond the hash check, replays the deterministic
/// RNG against the named strip configuration and checks the claimed reel
/// positions match.
pub fn verify_spin_with_reel_positions(input: &VerifyWithReelInput) -> VerifyResult {
    let hash_result = verify_single_spin(&input.spin);
    if !hash_result.valid {
        return hash_result;
    }

    let key = sf_rng::derive_key(
        &input.spin.server_seed,
        &input.spin.client_seed,
        input.spin.nonce as i64,
        input.theta_seed.as_deref(),
    );
    let mut rng = DeterministicRng::from_key(key);
    let (positions, _grid) = draw_grid(&input.strips, &mut rng);

    VerifyResult {
        valid: positions == input.claimed_positions,
        expected_hash: hash_result.expected_hash,
    }
}

#[derive(Debug, Clone)]
pub struct VerifyActiveSpinInput {
    /// The commitment published at session start — carried through so the
    /// caller's context is explicit, even though a mid-session check can't
    /// yet verify it against the (unrevealed) server seed.
    pub server_seed_hash: HexHash,
    /// Every receipt the client has observed so far, in nonce order.
    pub receipts: Vec<SpinReceipt>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyActiveResult {
    pub chain_intact: bool,
    pub broken_at_nonce: Option<u64>,
}

/// `VerifyActiveSpin`: before the server seed is revealed, the best a
/// client can check is hash-chain continuity — that each receipt's
/// `prevSpinHash` equals the previous receipt's `spinHash`.
pub fn verify_active_spin(input: &VerifyActiveSpinInput) -> VerifyActiveResult {
    let mut prev: Option<HexHash> = None;
    for receipt in &input.receipts {
        if receipt.prev_spin_hash != prev {
            return VerifyActiveResult {
                chain_intact: false,
                broken_at_nonce: Some(receipt.nonce),
            };
        }
        prev = Some(receipt.spin_hash);
    }
    VerifyActiveResult {
        chain_intact: true,
        broken_at_nonce: None,
    }
}
