//! A reel strip: an ordered sequence of symbol tokens, with a content
//! checksum that uniquely identifies it.

use sf_core::{GameMode, HexHash, StripId};
use sf_paytable::Token;

/// Ordered sequence of symbol tokens for one reel.
#[derive(Debug, Clone)]
pub struct ReelStrip {
    pub id: StripId,
    pub game_mode: GameMode,
    pub reel_index: u8,
    content: Vec<Token>,
    checksum: HexHash,
    pub active: bool,
}

impl ReelStrip {
    pub fn new(game_mode: GameMode, reel_index: u8, content: Vec<Token>) -> Self {
        let checksum = checksum_of(&content);
        Self {
            id: StripId::new(),
            game_mode,
            reel_index,
            content,
            checksum,
            active: true,
        }
    }

    pub fn content(&self) -> &[Token] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn checksum(&self) -> HexHash {
        self.checksum
    }

    /// Verifies the stored checksum still matches the content — guards
    /// against accidental or malicious mutation in storage.
    pub fn verify_integrity(&self) -> Result<(), sf_core::EngineError> {
        if checksum_of(&self.content) != self.checksum {
            return Err(sf_core::EngineError::integrity(format!(
                "reel strip {} checksum mismatch",
                self.id
            )));
        }
        Ok(())
    }

    /// Symbol at `position`, wrapping around the strip. Negative positions
    /// wrap forward (e.g. `-1` is the last symbol).
    pub fn symbol_at(&self, position: i64) -> Token {
        let len = self.content.len() as i64;
        let wrapped = position.rem_euclid(len);
        self.content[wrapped as usize]
    }

    /// The `count` symbols starting at `position`, wrapping around.
    pub fn window(&self, position: i64, count: usize) -> Vec<Token> {
        (0..count as i64)
            .map(|offset| self.symbol_at(position + offset))
            .collect()
    }
}

/// Stable content hash: order-sensitive, uniquely identifies the sequence.
pub fn checksum_of(content: &[Token]) -> HexHash {
    let bytes: Vec<u8> = content.iter().map(|t| t.to_byte()).collect();
    HexHash::of(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_paytable::BaseSymbol;

    fn strip(tokens: &[BaseSymbol]) -> ReelStrip {
        let content = tokens.iter().map(|&b| Token::regular(b)).collect();
        ReelStrip::new(GameMode::Base, 0, content)
    }

    #[test]
    fn wrap_around_basic_case() {
        // strip [A,K,Q,J,10], request 4 symbols starting at position 4
        let s = strip(&[
            BaseSymbol::High1,
            BaseSymbol::High2,
            BaseSymbol::Mid1,
            BaseSymbol::Mid2,
            BaseSymbol::Low1,
        ]);
        let got: Vec<BaseSymbol> = s.window(4, 4).into_iter().map(|t| t.base).collect();
        assert_eq!(
            got,
            vec![
                BaseSymbol::Low1,
                BaseSymbol::High1,
                BaseSymbol::High2,
                BaseSymbol::Mid1,
            ]
        );
    }

    #[test]
    fn negative_positions_wrap_forward() {
        let s = strip(&[BaseSymbol::Low1, BaseSymbol::Low2, BaseSymbol::Low3]);
        assert_eq!(s.symbol_at(-1).base, BaseSymbol::Low3);
        assert_eq!(s.symbol_at(-3).base, BaseSymbol::Low1);
    }

    #[test]
    fn checksum_is_order_sensitive() {
        let a = strip(&[BaseSymbol::Low1, BaseSymbol::Low2]);
        let b = strip(&[BaseSymbol::Low2, BaseSymbol::Low1]);
        assert_ne!(a.checksum(), b.checksum());
    }

    #[test]
    fn integrity_check_passes_for_untouched_strip() {
        let s = strip(&[BaseSymbol::Low1, BaseSymbol::Low2, BaseSymbol::High1]);
        assert!(s.verify_integrity().is_ok());
    }
}
