//! Outcome of a bonding-curve computation.

use core::fmt;

use rust_decimal::Decimal;

/// The `(quantity, fee)` pair every bonding-curve formula returns.
///
/// `quantity` is the derived side of the operation: tokens out for an
/// exact-in swap, tokens in for an exact-out swap, shares for a join or
/// exit priced in tokens, tokens for a join or exit priced in shares.
/// `fee` is the amount the pool retains, denominated in the token whose
/// balance the operation moves.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::MathResult;
///
/// let res = MathResult::new(Decimal::TEN, Decimal::ONE);
/// assert_eq!(res.quantity(), Decimal::TEN);
/// assert_eq!(res.fee(), Decimal::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MathResult {
    quantity: Decimal,
    fee: Decimal,
}

impl MathResult {
    /// Creates a new result pair.
    #[must_use]
    pub const fn new(quantity: Decimal, fee: Decimal) -> Self {
        Self { quantity, fee }
    }

    /// Returns the derived quantity.
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the fee retained by the pool.
    #[must_use]
    pub const fn fee(&self) -> Decimal {
        self.fee
    }
}

impl fmt::Display for MathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MathResult(quantity={}, fee={})", self.quantity, self.fee)
    }
}
