//! Protocol constants of the Balancer V1 weighted pool.
//!
//! These are the defaults [`PoolConfig`](crate::config::PoolConfig) starts
//! from; a pool never reads them directly once it has a configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Smallest representable on-chain unit (`1e-18`).
pub const ONE_WEI: Decimal = dec!(0.000000000000000001);

/// Fixed-point one.
pub const BONE: Decimal = Decimal::ONE;

/// Minimum number of bound tokens in a pool.
pub const MIN_BOUND_TOKENS: usize = 2;

/// Maximum number of bound tokens in a pool.
pub const MAX_BOUND_TOKENS: usize = 8;

/// Lowest accepted swap fee.
pub const MIN_FEE: Decimal = dec!(0.000001);

/// Highest accepted swap fee.
pub const MAX_FEE: Decimal = dec!(0.1);

/// Swap fee applied when a configuration does not name one.
pub const DEFAULT_SWAP_FEE: Decimal = dec!(0.0025);

/// Exit fee charged on burned shares.
pub const EXIT_FEE: Decimal = Decimal::ZERO;

/// Lowest accepted denormalized weight.
pub const MIN_WEIGHT: Decimal = BONE;

/// Highest accepted denormalized weight.
pub const MAX_WEIGHT: Decimal = dec!(50);

/// Highest accepted sum of bound denormalized weights.
pub const MAX_TOTAL_WEIGHT: Decimal = dec!(50);

/// Lowest balance a bound token may hold when the pool is joined.
pub const MIN_BALANCE: Decimal = dec!(0.000000000001);

/// Share supply an empty pool is priced against on its first mint.
pub const INIT_POOL_SUPPLY: Decimal = dec!(100);

/// Lowest base accepted by the power function.
pub const MIN_BPOW_BASE: Decimal = ONE_WEI;

/// Highest base accepted by the power function (`2 − 1e-18`).
pub const MAX_BPOW_BASE: Decimal = dec!(1.999999999999999999);

/// Term size at which the fractional power series stops.
pub const BPOW_PRECISION: Decimal = dec!(0.0000000001);

/// Iteration cap for the fractional power series.
pub const BPOW_MAX_ITERATIONS: u32 = 1_000;

/// Largest `|base − 1|` the fractional series is evaluated at directly.
/// Farther bases are square-rooted first.
pub const BPOW_SERIES_RADIUS: Decimal = dec!(0.5);

/// A swap may move at most this fraction of the input reserve.
pub const MAX_IN_RATIO: Decimal = dec!(0.5);

/// A withdrawal may move at most this fraction of a reserve or of the
/// share supply (`1/3 + 1e-18`).
pub const MAX_OUT_RATIO: Decimal = dec!(0.3333333333333333343333333333);

/// Shares burned to the null provider on the first mint into an empty pool.
pub const MINIMUM_SHARES: Decimal = dec!(0.000000000000001);

/// Decimal places at which the post-swap balance products must agree.
pub const INVARIANT_DECIMALS: u32 = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpow_bounds_bracket_one() {
        assert!(MIN_BPOW_BASE < BONE);
        assert!(MAX_BPOW_BASE < Decimal::TWO);
        assert_eq!(MAX_BPOW_BASE + ONE_WEI, Decimal::TWO);
    }

    #[test]
    fn max_out_ratio_just_above_a_third() {
        let third = Decimal::ONE / Decimal::from(3);
        assert!(MAX_OUT_RATIO > third);
        assert_eq!(MAX_OUT_RATIO - ONE_WEI, third);
    }

    #[test]
    fn fee_bounds_ordered() {
        assert!(MIN_FEE < DEFAULT_SWAP_FEE);
        assert!(DEFAULT_SWAP_FEE < MAX_FEE);
    }
}
