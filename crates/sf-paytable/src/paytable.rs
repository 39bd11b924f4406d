//! `symbol × count(3|4|5) → payout factor`, with wild substitution for
//! left-anchored ways runs handled by the caller (`sf-grid`); this module
//! only owns the pure pay lookup.

use crate::symbol::BaseSymbol;
use std::collections::HashMap;

/// Payout factor (multiplied by bet and ways-count) for 3/4/5-of-a-kind.
#[derive(Debug, Clone, Default)]
pub struct PayTable {
    factors: HashMap<BaseSymbol, [f64; 3]>,
}

impl PayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, symbol: BaseSymbol, factors_3_4_5: [f64; 3]) -> &mut Self {
        self.factors.insert(symbol, factors_3_4_5);
        self
    }

    /// Payout factor for `count` (3, 4, or 5) matching symbols. Zero for
    /// counts below 3, for symbols without an entry, and for special
    /// symbols (wild never wins standalone, scatter is paid separately).
    pub fn factor(&self, symbol: BaseSymbol, count: u8) -> f64 {
        if !(3..=5).contains(&count) || symbol.is_special() {
            return 0.0;
        }
        self.factors
            .get(&symbol)
            .map(|f| f[(count - 3) as usize])
            .unwrap_or(0.0)
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        table
            .set(BaseSymbol::Low1, [0.10, 0.25, 0.50])
            .set(BaseSymbol::Low2, [0.15, 0.30, 0.60])
            .set(BaseSymbol::Low3, [0.20, 0.40, 0.80])
            .set(BaseSymbol::Low4, [0.25, 0.50, 1.00])
            .set(BaseSymbol::Mid1, [0.50, 1.50, 4.00])
            .set(BaseSymbol::Mid2, [0.75, 2.00, 5.00])
            .set(BaseSymbol::High1, [1.50, 5.00, 15.00])
            .set(BaseSymbol::High2, [2.50, 8.00, 25.00]);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_below_three_pay_nothing() {
        let table = PayTable::standard();
        assert_eq!(table.factor(BaseSymbol::High1, 2), 0.0);
    }

    #[test]
    fn special_symbols_never_pay_from_the_table() {
        let table = PayTable::standard();
        assert_eq!(table.factor(BaseSymbol::Wild, 5), 0.0);
        assert_eq!(table.factor(BaseSymbol::Scatter, 5), 0.0);
    }

    #[test]
    fn pay_increases_with_count_and_tier() {
        let table = PayTable::standard();
        assert!(table.factor(BaseSymbol::High1, 5) > table.factor(BaseSymbol::High1, 3));
        assert!(table.factor(BaseSymbol::High1, 5) > table.factor(BaseSymbol::Low1, 5));
    }
}
