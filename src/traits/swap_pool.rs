//! Core swap trait for executing swaps and querying prices.
//!
//! [`SwapPool`] covers the two swap directions of a weighted pool and
//! the price queries around them:
//!
//! 1. **Exact in**: [`SwapPool::swap_exact_amount_in`] sells a fixed
//!    input amount.
//! 2. **Exact out**: [`SwapPool::swap_exact_amount_out`] buys a fixed
//!    output amount.
//! 3. **Quote**: [`SwapPool::spot_price`] returns the marginal rate.
//! 4. **Inspect fees**: [`SwapPool::swap_fee`] returns the fee rate.
//!
//! # Fee Invariant
//!
//! The fee is taken from the input side before the curve is applied and
//! stays in the pool:
//!
//! ```text
//! fee        = amount_in × f
//! net_input  = amount_in − fee
//! amount_out = curve(net_input)
//! ```
//!
//! # Atomicity
//!
//! A swap either applies every balance, reserve and fee update or
//! returns an error with the pool untouched.

use rust_decimal::Decimal;

use crate::domain::{MathResult, Provider};
use crate::error::AmmError;

/// Swap operations of a weighted pool.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common error
/// variants include:
///
/// - [`AmmError::TokenNotInPool`]: a symbol is not part of the pool
/// - [`AmmError::PoolNotJoined`]: the pool holds no liquidity
/// - [`AmmError::RatioExceeded`]: the trade is too large for the reserves
/// - [`AmmError::InvariantViolation`]: post-trade balances do not match
///   the curve
pub trait SwapPool {
    /// Sells exactly `amount_in` of `token_in` for `token_out`.
    ///
    /// Returns the amount of `token_out` received and the fee retained
    /// in `token_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if `amount_in` exceeds the input
    ///   reserve times the max in ratio.
    /// - [`AmmError::InsufficientInput`] if the realized input is not
    ///   strictly positive.
    /// - [`AmmError::InvariantViolation`] if the balance products
    ///   disagree.
    fn swap_exact_amount_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Buys exactly `amount_out` of `token_out` with `token_in`.
    ///
    /// Returns the amount of `token_in` paid and the fee retained in
    /// `token_in`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if `amount_out` reaches the output
    ///   reserve times the max out ratio, or the derived input exceeds the
    ///   max in ratio.
    /// - [`AmmError::InsufficientInput`] / [`AmmError::InvariantViolation`]
    ///   as for [`swap_exact_amount_in`](Self::swap_exact_amount_in).
    fn swap_exact_amount_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Returns the price of one unit of `quote` expressed in `base`,
    /// including the swap fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::TokenNotInPool`] if either token is not registered.
    /// - [`AmmError::DivisionByZero`] if the quote balance is zero.
    fn spot_price(&self, base: &str, quote: &str) -> Result<Decimal, AmmError>;

    /// Returns the swap fee rate.
    ///
    /// The fee is constant for the lifetime of the pool.
    #[must_use]
    fn swap_fee(&self) -> Decimal;
}
