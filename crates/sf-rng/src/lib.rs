//! sf-rng: the two RNG capabilities the engine needs — a cryptographic
//! entropy source for seed generation, and a deterministic stream keyed off
//! `(serverSeed, clientSeed, nonce)` that the spin evaluator replays.

mod deterministic;
mod entropy;
mod fast;

pub use deterministic::{derive_key, DeterministicRng};
pub use entropy::{Entropy, OsEntropy};
pub use fast::FastRng;

/// Common uniform-draw capability shared by the replayable
/// `DeterministicRng` and the bulk-simulation `FastRng`, so callers that
/// only need `int_n` (the grid's reel-position draw) can stay generic over
/// which stream backs them.
pub trait UniformSource {
    fn int_n(&mut self, n: u64) -> u64;
}

impl UniformSource for DeterministicRng {
    fn int_n(&mut self, n: u64) -> u64 {
        DeterministicRng::int_n(self, n)
    }
}

impl UniformSource for FastRng {
    fn int_n(&mut self, n: u64) -> u64 {
        FastRng::int_n(self, n)
    }
}
