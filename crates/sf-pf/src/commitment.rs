//! Pure commit/reveal hash functions. Kept free of any session state so
//! both the live session and the offline verification endpoints share one
//! implementation.

use sf_core::HexHash;

pub fn server_seed_hash(server_seed: &[u8]) -> HexHash {
    HexHash::of(server_seed)
}

pub fn theta_commitment_hash(theta_seed: &[u8]) -> HexHash {
    HexHash::of(theta_seed)
}

pub fn verify_commitment(server_seed: &[u8], expected: HexHash) -> bool {
    server_seed_hash(server_seed) == expected
}

pub fn verify_theta(theta_seed: &[u8], expected: HexHash) -> bool {
    theta_commitment_hash(theta_seed) == expected
}

/// `spinHash_n = H(serverSeed ∥ clientSeed_n ∥ nonce ∥ prevSpinHash)`. The
/// genesis hash (no prior spin) is represented as 32 zero bytes rather than
/// an empty slice, so the chain's first link still hashes a fixed-width
/// input.
pub fn spin_hash(server_seed: &[u8], client_seed: &[u8], nonce: u64, prev_spin_hash: Option<HexHash>) -> HexHash {
    let prev_bytes = prev_spin_hash.map(|h| *h.as_bytes()).unwrap_or([0u8; 32]);
    HexHash::of_parts(&[server_seed, client_seed, &nonce.to_be_bytes(), &prev_bytes])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_round_trips() {
        let seed = b"a-server-seed";
        let hash = server_seed_hash(seed);
        assert!(verify_commitment(seed, hash));
        assert!(!verify_commitment(b"different-seed", hash));
    }

    #[test]
    fn theta_round_trips() {
        let theta = b"a-theta-seed";
        let commitment = theta_commitment_hash(theta);
        assert!(verify_theta(theta, commitment));
        assert!(!verify_theta(b"wrong-theta", commitment));
    }

    #[test]
    fn spin_hash_changes_with_any_input() {
        let base = spin_hash(b"seed", b"client", 1, None);
        assert_ne!(base, spin_hash(b"seed", b"client2", 1, None));
        assert_ne!(base, spin_hash(b"seed", b"client", 2, None));
        assert_ne!(base, spin_hash(b"seed2", b"client", 1, None));
        let chained = spin_hash(b"seed", b"client", 2, Some(base));
        assert_ne!(chained, base);
    }
}
