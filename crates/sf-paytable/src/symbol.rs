//! Symbol taxonomy: a closed set of 10 paying symbols plus wild and
//! scatter, each optionally dressed up as a "gold" variant.

use serde::{Deserialize, Serialize};

/// The base symbol a token matches as, independent of its gold dressing.
/// Discriminants are explicit and stable: they feed the reel-strip content
/// checksum, so they must never be renumbered once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BaseSymbol {
    Low1 = 0,
    Low2 = 1,
    Low3 = 2,
    Low4 = 3,
    Mid1 = 4,
    Mid2 = 5,
    High1 = 6,
    High2 = 7,
    Wild = 8,
    Scatter = 9,
}

impl BaseSymbol {
    pub const REGULAR: [BaseSymbol; 8] = [
        BaseSymbol::Low1,
        BaseSymbol::Low2,
        BaseSymbol::Low3,
        BaseSymbol::Low4,
        BaseSymbol::Mid1,
        BaseSymbol::Mid2,
        BaseSymbol::High1,
        BaseSymbol::High2,
    ];

    pub fn is_special(self) -> bool {
        matches!(self, BaseSymbol::Wild | BaseSymbol::Scatter)
    }

    /// Gold variants only exist for non-special (paying) symbols.
    pub fn can_be_gold(self) -> bool {
        !self.is_special()
    }
}

/// A symbol token as it sits on a reel: a base symbol, optionally marked
/// gold. Gold non-special symbols pay as their base symbol, then become
/// wild once they take part in a winning cascade (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub base: BaseSymbol,
    pub gold: bool,
}

impl Token {
    pub fn regular(base: BaseSymbol) -> Self {
        Self { base, gold: false }
    }

    /// Builds the gold variant of a base symbol. Returns `None` for wild
    /// and scatter, which have no gold dressing.
    pub fn gold(base: BaseSymbol) -> Option<Self> {
        base.can_be_gold().then_some(Self { base, gold: true })
    }

    pub fn wild() -> Self {
        Self::regular(BaseSymbol::Wild)
    }

    pub fn scatter() -> Self {
        Self::regular(BaseSymbol::Scatter)
    }

    pub fn is_wild(self) -> bool {
        self.base == BaseSymbol::Wild
    }

    pub fn is_scatter(self) -> bool {
        self.base == BaseSymbol::Scatter
    }

    pub fn is_gold(self) -> bool {
        self.gold
    }

    /// Stable single-byte encoding used for reel-strip content checksums.
    pub fn to_byte(self) -> u8 {
        (self.base as u8) << 1 | self.gold as u8
    }
}

/// Strips the gold marker, returning the symbol used for win matching.
pub fn get_base_symbol(token: Token) -> BaseSymbol {
    token.base
}

/// The pure pre-refill transform: a gold symbol that took part in a
/// winning cascade becomes wild for the next cascade step. Applied
/// atomically, before refill, per §4.4.
pub fn to_wild_if_gold(token: Token) -> Token {
    if token.gold && token.base.can_be_gold() {
        Token::wild()
    } else {
        token
    }
}
