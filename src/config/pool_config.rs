//! Per-pool parameters of a weighted pool.

use rust_decimal::Decimal;

use crate::error::AmmError;
use crate::math::constants::{
    BPOW_MAX_ITERATIONS, BPOW_PRECISION, DEFAULT_SWAP_FEE, EXIT_FEE, INIT_POOL_SUPPLY,
    INVARIANT_DECIMALS, MAX_BOUND_TOKENS, MAX_FEE, MAX_IN_RATIO, MAX_OUT_RATIO, MAX_TOTAL_WEIGHT,
    MAX_WEIGHT, MIN_BALANCE, MIN_BOUND_TOKENS, MIN_FEE, MIN_WEIGHT, MINIMUM_SHARES,
};
use crate::math::BalancerPow;

/// Configuration captured by an [`Exchange`](crate::pools::Exchange) when
/// it is created.
///
/// Every fee, ratio bound, weight bound and precision setting lives here
/// rather than in process-wide constants, so pools with different
/// parameters can coexist.  [`Default`] yields the Balancer V1 values.
///
/// # Validation
///
/// - `min_fee ≤ swap_fee ≤ max_fee`
/// - `0 ≤ exit_fee < 1`
/// - `max_in_ratio` and `max_out_ratio` in `(0, 1)`
/// - `0 < min_weight ≤ max_weight ≤ max_total_weight`
/// - `2 ≤ min_bound_tokens ≤ max_bound_tokens`
/// - `init_pool_supply > 0`, `0 ≤ minimum_shares < init_pool_supply`
/// - `min_balance ≥ 0`, `pow_precision > 0`, `pow_max_iterations > 0`
///
/// With the `serde` feature a partial document overrides only the fields
/// it names:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use rust_decimal::Decimal;
/// use weighted_amm::config::PoolConfig;
///
/// let cfg: PoolConfig = serde_json::from_str(r#"{"swap_fee": "0.003"}"#).expect("json");
/// assert_eq!(cfg.swap_fee(), Decimal::new(3, 3));
/// assert_eq!(cfg.max_in_ratio(), PoolConfig::default().max_in_ratio());
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    swap_fee: Decimal,
    exit_fee: Decimal,
    min_fee: Decimal,
    max_fee: Decimal,
    max_in_ratio: Decimal,
    max_out_ratio: Decimal,
    min_weight: Decimal,
    max_weight: Decimal,
    max_total_weight: Decimal,
    min_balance: Decimal,
    min_bound_tokens: usize,
    max_bound_tokens: usize,
    init_pool_supply: Decimal,
    minimum_shares: Decimal,
    invariant_decimals: u32,
    pow_precision: Decimal,
    pow_max_iterations: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            swap_fee: DEFAULT_SWAP_FEE,
            exit_fee: EXIT_FEE,
            min_fee: MIN_FEE,
            max_fee: MAX_FEE,
            max_in_ratio: MAX_IN_RATIO,
            max_out_ratio: MAX_OUT_RATIO,
            min_weight: MIN_WEIGHT,
            max_weight: MAX_WEIGHT,
            max_total_weight: MAX_TOTAL_WEIGHT,
            min_balance: MIN_BALANCE,
            min_bound_tokens: MIN_BOUND_TOKENS,
            max_bound_tokens: MAX_BOUND_TOKENS,
            init_pool_supply: INIT_POOL_SUPPLY,
            minimum_shares: MINIMUM_SHARES,
            invariant_decimals: INVARIANT_DECIMALS,
            pow_precision: BPOW_PRECISION,
            pow_max_iterations: BPOW_MAX_ITERATIONS,
        }
    }
}

impl PoolConfig {
    /// Creates the default configuration with the given swap fee.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidFee`] if the fee is outside
    /// `[MIN_FEE, MAX_FEE]`.
    pub fn new(swap_fee: Decimal) -> Result<Self, AmmError> {
        let config = Self::default().with_swap_fee(swap_fee);
        config.validate()?;
        Ok(config)
    }

    /// Replaces the swap fee.
    #[must_use]
    pub const fn with_swap_fee(mut self, swap_fee: Decimal) -> Self {
        self.swap_fee = swap_fee;
        self
    }

    /// Replaces the exit fee.
    #[must_use]
    pub const fn with_exit_fee(mut self, exit_fee: Decimal) -> Self {
        self.exit_fee = exit_fee;
        self
    }

    /// Replaces both trade ratio bounds.
    #[must_use]
    pub const fn with_ratios(mut self, max_in_ratio: Decimal, max_out_ratio: Decimal) -> Self {
        self.max_in_ratio = max_in_ratio;
        self.max_out_ratio = max_out_ratio;
        self
    }

    /// Replaces the share supply used to price the first mint and the
    /// amount burned to the null provider on it.
    #[must_use]
    pub const fn with_initial_supply(
        mut self,
        init_pool_supply: Decimal,
        minimum_shares: Decimal,
    ) -> Self {
        self.init_pool_supply = init_pool_supply;
        self.minimum_shares = minimum_shares;
        self
    }

    /// Replaces the power-function tuning.
    #[must_use]
    pub const fn with_pow(mut self, precision: Decimal, max_iterations: u32) -> Self {
        self.pow_precision = precision;
        self.pow_max_iterations = max_iterations;
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] if a fee or the fee bounds are out of
    ///   range.
    /// - [`AmmError::InvalidWeight`] if the weight bounds are not
    ///   positive and ordered.
    /// - [`AmmError::InvalidConfiguration`] for every other violated
    ///   bound listed on [`PoolConfig`].
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.min_fee.is_sign_negative() || self.min_fee > self.max_fee {
            return Err(AmmError::InvalidFee("fee bounds must be ordered and non-negative"));
        }
        if self.max_fee >= Decimal::ONE {
            return Err(AmmError::InvalidFee("max fee must be below 1"));
        }
        if self.swap_fee < self.min_fee || self.swap_fee > self.max_fee {
            return Err(AmmError::InvalidFee("swap fee outside [min_fee, max_fee]"));
        }
        if self.exit_fee.is_sign_negative() && !self.exit_fee.is_zero() {
            return Err(AmmError::InvalidFee("exit fee must not be negative"));
        }
        if self.exit_fee >= Decimal::ONE {
            return Err(AmmError::InvalidFee("exit fee must be below 1"));
        }
        if !in_open_unit(self.max_in_ratio) {
            return Err(AmmError::InvalidConfiguration(
                "max in ratio must be in (0, 1)",
            ));
        }
        if !in_open_unit(self.max_out_ratio) {
            return Err(AmmError::InvalidConfiguration(
                "max out ratio must be in (0, 1)",
            ));
        }
        if self.min_weight <= Decimal::ZERO
            || self.min_weight > self.max_weight
            || self.max_weight > self.max_total_weight
        {
            return Err(AmmError::InvalidWeight(
                "weight bounds must be positive and ordered",
            ));
        }
        if self.min_bound_tokens < 2 || self.min_bound_tokens > self.max_bound_tokens {
            return Err(AmmError::InvalidConfiguration(
                "bound token limits must be at least 2 and ordered",
            ));
        }
        if self.min_balance.is_sign_negative() && !self.min_balance.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "min balance must not be negative",
            ));
        }
        if self.init_pool_supply <= Decimal::ZERO {
            return Err(AmmError::InvalidConfiguration(
                "initial pool supply must be positive",
            ));
        }
        if (self.minimum_shares.is_sign_negative() && !self.minimum_shares.is_zero())
            || self.minimum_shares >= self.init_pool_supply
        {
            return Err(AmmError::InvalidConfiguration(
                "minimum shares must be non-negative and below the initial supply",
            ));
        }
        if self.pow_precision <= Decimal::ZERO || self.pow_max_iterations == 0 {
            return Err(AmmError::InvalidConfiguration(
                "power precision and iteration cap must be positive",
            ));
        }
        Ok(())
    }

    /// Returns the power function tuned by this configuration.
    #[must_use]
    pub const fn power(&self) -> BalancerPow {
        BalancerPow::new(self.pow_precision, self.pow_max_iterations)
    }

    /// Returns the swap fee rate.
    #[must_use]
    pub const fn swap_fee(&self) -> Decimal {
        self.swap_fee
    }

    /// Returns the exit fee rate charged on burned shares.
    #[must_use]
    pub const fn exit_fee(&self) -> Decimal {
        self.exit_fee
    }

    /// Returns the lowest accepted swap fee.
    #[must_use]
    pub const fn min_fee(&self) -> Decimal {
        self.min_fee
    }

    /// Returns the highest accepted swap fee.
    #[must_use]
    pub const fn max_fee(&self) -> Decimal {
        self.max_fee
    }

    /// Returns the largest fraction of a reserve a deposit or swap-in may add.
    #[must_use]
    pub const fn max_in_ratio(&self) -> Decimal {
        self.max_in_ratio
    }

    /// Returns the largest fraction of a reserve or of the share supply a
    /// withdrawal or swap-out may remove.
    #[must_use]
    pub const fn max_out_ratio(&self) -> Decimal {
        self.max_out_ratio
    }

    /// Returns the lowest accepted denormalized weight.
    #[must_use]
    pub const fn min_weight(&self) -> Decimal {
        self.min_weight
    }

    /// Returns the highest accepted denormalized weight.
    #[must_use]
    pub const fn max_weight(&self) -> Decimal {
        self.max_weight
    }

    /// Returns the highest accepted sum of bound weights.
    #[must_use]
    pub const fn max_total_weight(&self) -> Decimal {
        self.max_total_weight
    }

    /// Returns the lowest balance a bound token needs to join the pool.
    #[must_use]
    pub const fn min_balance(&self) -> Decimal {
        self.min_balance
    }

    /// Returns the minimum number of bound tokens.
    #[must_use]
    pub const fn min_bound_tokens(&self) -> usize {
        self.min_bound_tokens
    }

    /// Returns the maximum number of bound tokens.
    #[must_use]
    pub const fn max_bound_tokens(&self) -> usize {
        self.max_bound_tokens
    }

    /// Returns the share supply the first mint is priced against.
    #[must_use]
    pub const fn init_pool_supply(&self) -> Decimal {
        self.init_pool_supply
    }

    /// Returns the shares burned to the null provider on the first mint.
    #[must_use]
    pub const fn minimum_shares(&self) -> Decimal {
        self.minimum_shares
    }

    /// Returns the decimal places at which swap balance products must agree.
    #[must_use]
    pub const fn invariant_decimals(&self) -> u32 {
        self.invariant_decimals
    }
}

fn in_open_unit(value: Decimal) -> bool {
    value > Decimal::ZERO && value < Decimal::ONE
}
