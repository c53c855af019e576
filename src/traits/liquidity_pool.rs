//! Liquidity management trait extending [`SwapPool`].
//!
//! [`LiquidityPool`] adds the join and exit operations of a weighted
//! pool: one proportional join, two single-asset joins, two single-asset
//! exits and one proportional exit.
//!
//! # Share Accounting Invariant
//!
//! The share supply reported by [`LiquidityPool::total_shares`] only
//! changes through joins and exits, and always equals the sum of all
//! provider balances:
//!
//! ```text
//! total_shares = Σ shares[provider]   for every provider
//! ```
//!
//! Swaps never alter the supply.

use rust_decimal::Decimal;

use super::SwapPool;
use crate::domain::{MathResult, Provider, TokenAmount};
use crate::error::AmmError;

/// Trait for pools that support liquidity provision.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, AmmError>`].  Common error
/// variants include:
///
/// - [`AmmError::PoolAlreadyJoined`] / [`AmmError::PoolNotJoined`]:
///   the operation is illegal in the current lifecycle state
/// - [`AmmError::InsufficientShares`]: burning more than is held
/// - [`AmmError::MathExitError`]: a derived quantity is zero
/// - [`AmmError::MintReconciliation`]: the deposit does not match the
///   observed balance change
pub trait LiquidityPool: SwapPool {
    /// Seeds an unjoined pool: snapshots the vault balances and weights
    /// and mints `initial_shares` to `provider`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolAlreadyJoined`] if the pool holds liquidity.
    /// - [`AmmError::InvalidQuantity`] if `initial_shares` is not
    ///   positive or a bound balance is below the minimum.
    fn join_pool(&mut self, initial_shares: Decimal, provider: &Provider)
        -> Result<(), AmmError>;

    /// Deposits exactly `amount_in` of `token_in`; returns the shares
    /// minted and the fee retained.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if the deposit exceeds the max in
    ///   ratio of the token balance.
    /// - [`AmmError::MathExitError`] if no shares would be minted.
    fn join_swap_extern_amount_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Mints exactly `pool_out` shares; returns the amount of `token_in`
    /// deposited and the fee retained.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if the derived deposit exceeds the
    ///   max in ratio of the token balance.
    fn join_swap_pool_amount_out(
        &mut self,
        pool_out: Decimal,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Withdraws exactly `amount_out` of `token_out`; returns the shares
    /// burned and the fee retained.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] unless `amount_out` is strictly
    ///   below the reserve times the max out ratio.
    /// - [`AmmError::InsufficientShares`] if `provider` holds too few
    ///   shares.
    fn exit_swap_extern_amount_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Burns exactly `pool_in` shares; returns the amount of `token_out`
    /// withdrawn and the fee retained.
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] unless `pool_in` is strictly below
    ///   the share supply times the max out ratio.
    /// - [`AmmError::InsufficientShares`] if `provider` holds too few
    ///   shares.
    fn exit_swap_pool_amount_in(
        &mut self,
        pool_in: Decimal,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult, AmmError>;

    /// Burns `pool_in` shares for a proportional slice of every reserve.
    ///
    /// Returns the amount withdrawn per token in pool order; unbound
    /// tokens with an empty reserve are skipped.  When the supply reaches
    /// zero the pool becomes unjoined again.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientShares`] if `pool_in` exceeds the supply
    ///   or the provider balance.
    /// - [`AmmError::MathExitError`] if a token amount would be zero.
    fn exit_pool(
        &mut self,
        pool_in: Decimal,
        provider: &Provider,
    ) -> Result<Vec<TokenAmount>, AmmError>;

    /// Returns the total share supply.
    #[must_use]
    fn total_shares(&self) -> Decimal;
}
