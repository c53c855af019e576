//! Pool token record: balance, weight and bound flag.

use rust_decimal::Decimal;

use super::Symbol;
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// A token registered in a pool vault.
///
/// Holds the pool's total balance of the token, its denormalized weight
/// and whether it is *bound* (counted in the active weight sum).  The
/// balance only changes through [`deposit`](Self::deposit) and
/// [`transfer`](Self::transfer), which stand in for the ERC-20 transfer
/// primitives of an on-chain pool.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::Token;
///
/// let mut dai = Token::new("DAI", Decimal::ONE_HUNDRED, Decimal::TEN);
/// dai.deposit(Decimal::TEN).expect("deposit");
/// assert_eq!(dai.balance(), Decimal::from(110));
/// assert!(dai.is_bound());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    symbol: Symbol,
    balance: Decimal,
    denorm_weight: Decimal,
    bound: bool,
}

impl Token {
    /// Creates a bound token.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>, balance: Decimal, denorm_weight: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            balance,
            denorm_weight,
            bound: true,
        }
    }

    /// Returns the token with its bound flag replaced.
    #[must_use]
    pub fn with_bound(mut self, bound: bool) -> Self {
        self.bound = bound;
        self
    }

    /// Returns the token symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the pool's balance of this token.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns the denormalized weight.
    #[must_use]
    pub const fn denorm_weight(&self) -> Decimal {
        self.denorm_weight
    }

    /// Returns `true` if the token counts towards the active weight sum.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Replaces the denormalized weight.
    pub fn set_denorm_weight(&mut self, denorm_weight: Decimal) {
        self.denorm_weight = denorm_weight;
    }

    /// Replaces the bound flag.
    pub fn set_bound(&mut self, bound: bool) {
        self.bound = bound;
    }

    /// Moves `amount` into the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount` is negative.
    /// - [`AmmError::Overflow`] if the balance overflows.
    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() {
            return Err(AmmError::InvalidQuantity("deposit amount is negative"));
        }
        self.balance = self.balance.safe_add(&amount)?;
        Ok(())
    }

    /// Moves `amount` out of the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `amount` is negative.
    /// - [`AmmError::InsufficientBalance`] if `amount` exceeds the balance.
    pub fn transfer(&mut self, amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() {
            return Err(AmmError::InvalidQuantity("transfer amount is negative"));
        }
        if amount > self.balance {
            return Err(AmmError::InsufficientBalance(self.symbol.clone()));
        }
        self.balance = self.balance.safe_sub(&amount)?;
        Ok(())
    }
}
