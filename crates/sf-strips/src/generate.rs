//! Strip generation from a weights map: materialise a multiset of tokens
//! matching exact weights, then Fisher–Yates shuffle with the cryptographic
//! RNG. Result length equals the sum of weights.

use sf_paytable::{BaseSymbol, Token, WeightTable};
use sf_rng::{DeterministicRng, Entropy};

/// Builds the exact multiset a weight table describes for one reel: each
/// symbol appears exactly `weight(symbol, reel)` times.
pub fn materialise(weights: &WeightTable, reel: usize) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(weights.total_weight(reel) as usize);
    let mut symbols: Vec<BaseSymbol> = weights.symbols().collect();
    symbols.sort_by_key(|s| *s as u8); // deterministic iteration order
    for symbol in symbols {
        let count = weights.weight(symbol, reel);
        tokens.extend(std::iter::repeat_n(Token::regular(symbol), count as usize));
    }
    tokens
}

/// Generates a shuffled strip for one reel from a weights map, using the
/// cryptographic entropy source to seed the shuffle. Administrative
/// generation is not replay-sensitive, so a one-shot key drawn from OS
/// entropy is sufficient — this does not touch the per-spin deterministic
/// stream.
pub fn generate_strip(
    weights: &WeightTable,
    reel: usize,
    entropy: &dyn Entropy,
) -> Result<Vec<Token>, sf_core::EngineError> {
    let mut tokens = materialise(weights, reel);
    let key = entropy.server_seed()?;
    let mut rng = DeterministicRng::from_key(key);
    rng.shuffle(&mut tokens);
    Ok(tokens)
}
