//! Pool-share ledger.
//!
//! Tracks each provider's share balance and the total supply.  The two
//! primitives mirror the contract's `_mint` and `_burn`:
//!
//! ```text
//! mint(to, v):   shares[to] += v;   total += v
//! burn(from, v): shares[from] −= v; total −= v − v·exit_fee; shares[null] += v·exit_fee
//! ```
//!
//! The total is re-summed from the balances after every call, so
//! `total == Σ shares` holds exactly rather than up to rounding.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::domain::Provider;
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// Share balances of every provider of one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShareLedger {
    balances: IndexMap<Provider, Decimal>,
    total: Decimal,
    last_mint: Decimal,
}

impl ShareLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total share supply.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Amount of the most recent mint.
    #[must_use]
    pub const fn last_mint(&self) -> Decimal {
        self.last_mint
    }

    /// Share balance of `provider`; zero if it never held shares.
    #[must_use]
    pub fn balance_of(&self, provider: &str) -> Decimal {
        self.balances.get(provider).copied().unwrap_or_default()
    }

    /// Iterates over `(provider, balance)` in first-mint order.
    pub fn balances(&self) -> impl Iterator<Item = (&Provider, &Decimal)> {
        self.balances.iter()
    }

    /// Credits `value` new shares to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `value` is negative.
    /// - [`AmmError::Overflow`] if a balance overflows.
    pub fn mint(&mut self, to: &Provider, value: Decimal) -> Result<()> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmmError::InvalidQuantity("mint amount is negative"));
        }
        let entry = self.balances.entry(to.clone()).or_insert(Decimal::ZERO);
        *entry = entry.safe_add(&value)?;
        self.resum()?;
        self.last_mint = value;
        Ok(())
    }

    /// Debits `value` shares from `from`, charging `exit_fee`.
    ///
    /// The fee portion stays in the supply, credited to the null
    /// provider.  Returns the fee shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidQuantity`] if `value` is negative.
    /// - [`AmmError::InsufficientShares`] if `value` exceeds the balance
    ///   of `from` or the total supply.
    pub fn burn(&mut self, from: &Provider, value: Decimal, exit_fee: Decimal) -> Result<Decimal> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmmError::InvalidQuantity("burn amount is negative"));
        }
        if value > self.total {
            return Err(AmmError::InsufficientShares(
                "amount exceeds the pool share supply",
            ));
        }
        let held = self.balance_of(from.as_str());
        if value > held {
            return Err(AmmError::InsufficientShares(
                "amount exceeds the provider share balance",
            ));
        }

        let fee = value.safe_mul(&exit_fee)?;
        self.balances.insert(from.clone(), held.safe_sub(&value)?);
        if !fee.is_zero() {
            let null = self
                .balances
                .entry(Provider::null())
                .or_insert(Decimal::ZERO);
            *null = null.safe_add(&fee)?;
        }
        self.resum()?;
        Ok(fee)
    }

    fn resum(&mut self) -> Result<()> {
        self.total = self
            .balances
            .values()
            .try_fold(Decimal::ZERO, |acc, b| acc.safe_add(b))?;
        Ok(())
    }
}
