//! The deterministic, replayable RNG the spin evaluator draws from.
//!
//! Seed material `(serverSeed, clientSeed, nonce, theta?)` is hashed into a
//! fixed 256-bit key; an HMAC-SHA256 counter DRBG over that key produces an
//! unbounded byte stream. `int_n` consumes the minimum number of bytes
//! required for rejection-sampled uniformity. The replay guarantee follows
//! directly from this being a pure function of the seed triple plus call
//! order: same triple, same call sequence, identical outputs.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Derives the 256-bit DRBG key from the provably-fair seed material.
pub fn derive_key(server_seed: &[u8], client_seed: &[u8], nonce: i64, theta: Option<&[u8]>) -> [u8; 32] {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(server_seed);
    hasher.update(client_seed);
    hasher.update(nonce.to_be_bytes());
    if let Some(theta) = theta {
        hasher.update(theta);
    }
    hasher.finalize().into()
}

/// A deterministic byte stream keyed by `derive_key`. Implements the
/// HMAC-DRBG-over-a-counter construction: block `i` is
/// `HMAC(key, i.to_be_bytes())`.
pub struct DeterministicRng {
    key: [u8; 32],
    counter: u64,
    buffer: Vec<u8>,
    pos: usize,
}

impl DeterministicRng {
    pub fn new(server_seed: &[u8], client_seed: &[u8], nonce: i64, theta: Option<&[u8]>) -> Self {
        Self::from_key(derive_key(server_seed, client_seed, nonce, theta))
    }

    pub fn from_key(key: [u8; 32]) -> Self {
        Self {
            key,
            counter: 0,
            buffer: Vec::new(),
            pos: 0,
        }
    }

    fn next_block(&mut self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("any key length is valid for HMAC-SHA256");
        mac.update(&self.counter.to_be_bytes());
        self.counter += 1;
        mac.finalize().into_bytes().into()
    }

    fn fill_bytes(&mut self, out: &mut [u8]) {
        let mut written = 0;
        while written < out.len() {
            if self.pos >= self.buffer.len() {
                self.buffer = self.next_block().to_vec();
                self.pos = 0;
            }
            let available = self.buffer.len() - self.pos;
            let take = available.min(out.len() - written);
            out[written..written + take].copy_from_slice(&self.buffer[self.pos..self.pos + take]);
            self.pos += take;
            written += take;
        }
    }

    /// Draws uniformly from `[0, n)`. Consumes the minimum whole-byte width
    /// that can represent values up to `n - 1`, rejection-sampling to
    /// remove modulo bias.
    pub fn int_n(&mut self, n: u64) -> u64 {
        assert!(n > 0, "int_n requires a positive bound");
        if n == 1 {
            return 0;
        }
        let bits = 64 - (n - 1).leading_zeros();
        let width_bytes = bits.div_ceil(8) as usize;
        let limit = if width_bytes == 8 {
            u64::MAX
        } else {
            (1u64 << (width_bytes * 8)) - 1
        };
        // largest multiple of n that fits in `limit + 1` draws
        let cutoff = limit - (limit % n);
        loop {
            let mut buf = [0u8; 8];
            self.fill_bytes(&mut buf[8 - width_bytes..]);
            let draw = u64::from_be_bytes(buf);
            if draw <= cutoff {
                return draw % n;
            }
        }
    }

    /// Fisher–Yates shuffle in place, using `int_n` for each swap index.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.int_n(i as u64 + 1) as usize;
            slice.swap(i, j);
        }
    }
}
