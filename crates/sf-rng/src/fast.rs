//! A non-deterministic fast RNG for the RTP tuning loop. Its statistical
//! output is what matters there, not reproducibility, so each worker gets
//! its own OS-seeded ChaCha8 stream rather than the HMAC-DRBG used for
//! replayable spins.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct FastRng(ChaCha8Rng);

impl FastRng {
    pub fn from_os_entropy() -> Self {
        Self(ChaCha8Rng::from_os_rng())
    }

    pub fn int_n(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.0.next_u64() % n
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.int_n(i as u64 + 1) as usize;
            slice.swap(i, j);
        }
    }

    pub fn unit(&mut self) -> f64 {
        (self.0.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl Default for FastRng {
    fn default() -> Self {
        Self::from_os_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_n_stays_in_bounds() {
        let mut rng = FastRng::from_os_entropy();
        for _ in 0..1000 {
            assert!(rng.int_n(13) < 13);
        }
    }

    #[test]
    fn unit_is_in_zero_one() {
        let mut rng = FastRng::from_os_entropy();
        for _ in 0..1000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
