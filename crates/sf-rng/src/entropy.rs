//! Cryptographically strong entropy for server-seed generation, client-seed
//! suggestions, and UUIDs. This capability has no state to reset: every
//! call draws fresh bytes from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;
use sf_core::EngineError;

pub trait Entropy: Send + Sync {
    /// Fill `buf` with cryptographically strong random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), EngineError>;

    /// A fresh 256-bit server seed.
    fn server_seed(&self) -> Result<[u8; 32], EngineError> {
        let mut seed = [0u8; 32];
        self.fill(&mut seed)?;
        Ok(seed)
    }
}

/// OS-backed entropy source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EngineError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| EngineError::Infrastructure(format!("OS entropy source failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_seed_is_256_bits_and_varies() {
        let entropy = OsEntropy;
        let a = entropy.server_seed().unwrap();
        let b = entropy.server_seed().unwrap();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b, "two draws should not coincide");
    }
}
