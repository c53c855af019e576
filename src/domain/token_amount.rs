//! A quantity of one named token.

use core::fmt;

use rust_decimal::Decimal;

use super::Symbol;

/// An amount of a specific token, as carried by operation inputs and
/// decoded action records.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::TokenAmount;
///
/// let amt = TokenAmount::new("DAI", Decimal::TEN);
/// assert_eq!(amt.symbol().as_str(), "DAI");
/// assert_eq!(amt.amount(), Decimal::TEN);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenAmount {
    symbol: Symbol,
    amount: Decimal,
}

impl TokenAmount {
    /// Creates a new token amount.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
        }
    }

    /// Returns the token symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let amt = TokenAmount::new("WETH", Decimal::new(15, 1));
        assert_eq!(amt.to_string(), "1.5 WETH");
    }

    #[test]
    fn accepts_owned_symbol() {
        let amt = TokenAmount::new(Symbol::new("DAI"), Decimal::ONE);
        assert_eq!(amt.symbol(), &Symbol::new("DAI"));
    }
}
