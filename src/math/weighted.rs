//! Weighted constant-product bonding curves.
//!
//! Every formula of a Balancer V1 pool is the inverse of one of two
//! curves:
//!
//! - [`SwapCurve`]: two tokens, no pool shares.  Prices
//!   `out_given_in`, `in_given_out` and the spot price.
//! - [`SingleAssetCurve`]: one token against the pool share supply.
//!   Prices the four single-asset join/exit variants.
//!
//! All functions are pure.  Ratio guards (`MAX_IN_RATIO`,
//! `MAX_OUT_RATIO`) belong to the caller, the pool state machine; the
//! curves only reject inputs for which the formula itself is undefined.
//!
//! ```text
//! invariant:  V = ∏ Bᵢ ^ (Wᵢ / ΣW)
//! ```

use rust_decimal::{Decimal, MathematicalOps};

use super::checked::CheckedArithmetic;
use super::constants::BONE;
use super::pow::PowerFunction;
use crate::domain::MathResult;
use crate::error::{AmmError, Result};

/// Inputs of the two-asset swap curve.
///
/// `weight_in` and `weight_out` are denormalized weights; only their
/// ratio enters the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapCurve {
    /// Pool balance of the token sent in.
    pub balance_in: Decimal,
    /// Denormalized weight of the token sent in.
    pub weight_in: Decimal,
    /// Pool balance of the token taken out.
    pub balance_out: Decimal,
    /// Denormalized weight of the token taken out.
    pub weight_out: Decimal,
    /// Swap fee rate.
    pub swap_fee: Decimal,
}

impl SwapCurve {
    /// Spot price of the output token in units of the input token,
    /// including the swap fee.
    ///
    /// ```text
    /// sP = (Bi / Wi) / (Bo / Wo) · 1 / (1 − f)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if a weight or the output
    /// balance is zero, or [`AmmError::Underflow`] if `f > 1`.
    pub fn spot_price(&self) -> Result<Decimal> {
        let sans_fee = self.spot_price_sans_fee()?;
        let scale = BONE.safe_div(&BONE.safe_sub(&self.swap_fee)?)?;
        sans_fee.safe_mul(&scale)
    }

    /// Spot price without the fee scaling.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if a weight or the output
    /// balance is zero.
    pub fn spot_price_sans_fee(&self) -> Result<Decimal> {
        let numer = self.balance_in.safe_div(&self.weight_in)?;
        let denom = self.balance_out.safe_div(&self.weight_out)?;
        numer.safe_div(&denom)
    }

    /// Amount of the output token received for `amount_in`.
    ///
    /// ```text
    /// Ai' = Ai · (1 − f)
    /// Ao  = Bo · (1 − (Bi / (Bi + Ai'))^(Wi / Wo))
    /// fee = Ai · f
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates arithmetic and power-function errors.
    pub fn out_given_in<P: PowerFunction + ?Sized>(
        &self,
        amount_in: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        let weight_ratio = self.weight_in.safe_div(&self.weight_out)?;
        let adjusted_in = amount_in.safe_mul(&BONE.safe_sub(&self.swap_fee)?)?;
        let y = self
            .balance_in
            .safe_div(&self.balance_in.safe_add(&adjusted_in)?)?;
        let foo = pow.pow(y, weight_ratio)?;
        let bar = complement(foo);
        let amount_out = self.balance_out.safe_mul(&bar)?;
        let fee = amount_in.safe_mul(&self.swap_fee)?;
        Ok(MathResult::new(amount_out, fee))
    }

    /// Amount of the input token required to receive `amount_out`.
    ///
    /// ```text
    /// Ai' = Bi · ((Bo / (Bo − Ao))^(Wo / Wi) − 1)
    /// Ai  = Ai' / (1 − f)
    /// fee = Ai − Ai'
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if `amount_out ≥ balance_out`.
    /// - Propagates arithmetic and power-function errors.
    pub fn in_given_out<P: PowerFunction + ?Sized>(
        &self,
        amount_out: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        if amount_out >= self.balance_out {
            return Err(AmmError::RatioExceeded(
                "amount out must be below the output balance",
            ));
        }
        let weight_ratio = self.weight_out.safe_div(&self.weight_in)?;
        let diff = self.balance_out.safe_sub(&amount_out)?;
        let y = self.balance_out.safe_div(&diff)?;
        let foo = pow.pow(y, weight_ratio)?.safe_sub(&BONE)?;
        let net_in = self.balance_in.safe_mul(&foo)?;
        let amount_in = net_in.safe_div(&BONE.safe_sub(&self.swap_fee)?)?;
        let fee = amount_in.safe_sub(&net_in)?;
        Ok(MathResult::new(amount_in, fee))
    }
}

/// Inputs of the single-asset join/exit curve.
///
/// The token's share of the pool is `r = weight / total_weight`.  The swap
/// fee is charged only on the `(1 − r)` portion of a deposit or withdrawal
/// that changes the token's relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleAssetCurve {
    /// Pool balance of the token.
    pub balance: Decimal,
    /// Denormalized weight of the token.
    pub weight: Decimal,
    /// Current pool share supply.
    pub pool_supply: Decimal,
    /// Sum of bound denormalized weights.
    pub total_weight: Decimal,
    /// Swap fee rate.
    pub swap_fee: Decimal,
    /// Fee rate charged on burned shares.
    pub exit_fee: Decimal,
}

impl SingleAssetCurve {
    /// Returns `r = weight / total_weight`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if the total weight is zero.
    pub fn normalized_weight(&self) -> Result<Decimal> {
        self.weight.safe_div(&self.total_weight)
    }

    /// Fee rate applied to the weight-changing portion: `(1 − r) · f`.
    fn weighted_fee(&self, normalized: Decimal) -> Result<Decimal> {
        BONE.safe_sub(&normalized)?.safe_mul(&self.swap_fee)
    }

    /// Shares minted for depositing `amount_in` of the token.
    ///
    /// ```text
    /// Ai'   = Ai · (1 − (1 − r) · f)
    /// P     = S · ((Bi + Ai') / Bi)^r − S
    /// fee   = Ai − Ai'
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AmmError::MathExitError`] if no shares would be minted.
    /// - Propagates arithmetic and power-function errors.
    pub fn pool_out_given_single_in<P: PowerFunction + ?Sized>(
        &self,
        amount_in: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        let normalized = self.normalized_weight()?;
        let zaz = self.weighted_fee(normalized)?;
        let after_fee = amount_in.safe_mul(&BONE.safe_sub(&zaz)?)?;
        let new_balance = self.balance.safe_add(&after_fee)?;
        let ratio = new_balance.safe_div(&self.balance)?;
        let pool_ratio = pow.pow(ratio, normalized)?;
        let new_supply = pool_ratio.safe_mul(&self.pool_supply)?;
        let pool_out = positive_diff(new_supply, self.pool_supply);
        if pool_out.is_zero() {
            return Err(AmmError::MathExitError("pool amount out is zero"));
        }
        let fee = amount_in.safe_sub(&after_fee)?;
        Ok(MathResult::new(pool_out, fee))
    }

    /// Token deposit required to mint exactly `pool_out` shares.
    ///
    /// ```text
    /// Bi'  = Bi · ((S + P) / S)^(1 / r)
    /// Ai'  = Bi' − Bi
    /// Ai   = Ai' / (1 − (1 − r) · f)
    /// fee  = Ai − Ai'
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AmmError::MathExitError`] if the required deposit is zero.
    /// - Propagates arithmetic and power-function errors.
    pub fn single_in_given_pool_out<P: PowerFunction + ?Sized>(
        &self,
        pool_out: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        let normalized = self.normalized_weight()?;
        let new_supply = self.pool_supply.safe_add(&pool_out)?;
        let pool_ratio = new_supply.safe_div(&self.pool_supply)?;
        let boo = BONE.safe_div(&normalized)?;
        let token_ratio = pow.pow(pool_ratio, boo)?;
        let new_balance = token_ratio.safe_mul(&self.balance)?;
        let after_fee = positive_diff(new_balance, self.balance);
        let zar = self.weighted_fee(normalized)?;
        let amount_in = after_fee.safe_div(&BONE.safe_sub(&zar)?)?;
        if amount_in.is_zero() {
            return Err(AmmError::MathExitError("token amount in is zero"));
        }
        let fee = amount_in.safe_sub(&after_fee)?;
        Ok(MathResult::new(amount_in, fee))
    }

    /// Shares burned to withdraw exactly `amount_out` of the token.
    ///
    /// ```text
    /// Ao'  = Ao / (1 − (1 − r) · f)
    /// S'   = S · ((Bo − Ao') / Bo)^r
    /// P    = (S − S') / (1 − exit_fee)
    /// fee  = Ao' − Ao
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AmmError::RatioExceeded`] if the gross withdrawal exceeds the
    ///   balance.
    /// - [`AmmError::MathExitError`] if no shares would be burned.
    /// - Propagates arithmetic and power-function errors.
    pub fn pool_in_given_single_out<P: PowerFunction + ?Sized>(
        &self,
        amount_out: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        let normalized = self.normalized_weight()?;
        let zar = self.weighted_fee(normalized)?;
        let before_fee = amount_out.safe_div(&BONE.safe_sub(&zar)?)?;
        let new_balance = self
            .balance
            .safe_sub(&before_fee)
            .map_err(|_| AmmError::RatioExceeded("withdrawal exceeds the token balance"))?;
        let ratio = new_balance.safe_div(&self.balance)?;
        let pool_ratio = pow.pow(ratio, normalized)?;
        let new_supply = pool_ratio.safe_mul(&self.pool_supply)?;
        let after_exit_fee = positive_diff(self.pool_supply, new_supply);
        let pool_in = after_exit_fee.safe_div(&BONE.safe_sub(&self.exit_fee)?)?;
        if pool_in.is_zero() {
            return Err(AmmError::MathExitError("pool amount in is zero"));
        }
        let fee = before_fee.safe_sub(&amount_out)?;
        Ok(MathResult::new(pool_in, fee))
    }

    /// Token amount withdrawn for burning exactly `pool_in` shares.
    ///
    /// ```text
    /// P'   = P · (1 − exit_fee)
    /// Bo'  = Bo · ((S − P') / S)^(1 / r)
    /// Ao'  = Bo − Bo'
    /// Ao   = Ao' · (1 − (1 − r) · f)
    /// fee  = Ao' − Ao
    /// ```
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientShares`] if `pool_in` exceeds the supply.
    /// - [`AmmError::MathExitError`] if the withdrawal is zero.
    /// - Propagates arithmetic and power-function errors.
    pub fn single_out_given_pool_in<P: PowerFunction + ?Sized>(
        &self,
        pool_in: Decimal,
        pow: &P,
    ) -> Result<MathResult> {
        let normalized = self.normalized_weight()?;
        let after_exit_fee = pool_in.safe_mul(&BONE.safe_sub(&self.exit_fee)?)?;
        let new_supply = self
            .pool_supply
            .safe_sub(&after_exit_fee)
            .map_err(|_| AmmError::InsufficientShares("pool amount in exceeds the supply"))?;
        let pool_ratio = new_supply.safe_div(&self.pool_supply)?;
        let exp = BONE.safe_div(&normalized)?;
        let token_ratio = pow.pow(pool_ratio, exp)?;
        let new_balance = token_ratio.safe_mul(&self.balance)?;
        let before_fee = positive_diff(self.balance, new_balance);
        let zaz = self.weighted_fee(normalized)?;
        let amount_out = before_fee.safe_mul(&BONE.safe_sub(&zaz)?)?;
        if amount_out.is_zero() {
            return Err(AmmError::MathExitError("token amount out is zero"));
        }
        let fee = before_fee.safe_sub(&amount_out)?;
        Ok(MathResult::new(amount_out, fee))
    }
}

/// Weighted geometric mean of the balances, `∏ Bᵢ ^ wᵢ`.
///
/// `weights` must be normalized.  Uses `rust_decimal`'s natural
/// log/exp based power, so the value is for analytics; pool validation
/// never compares it.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if a power or product is not
/// representable.
pub fn weighted_invariant<I>(balances_and_weights: I) -> Result<Decimal>
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    balances_and_weights
        .into_iter()
        .try_fold(BONE, |acc, (balance, weight)| {
            let term = balance
                .checked_powd(weight)
                .ok_or(AmmError::Overflow("invariant power overflow"))?;
            acc.safe_mul(&term)
        })
}

/// Growth factor of the invariant between two balance snapshots,
/// `∏ (Bᵢ' / Bᵢ) ^ wᵢ`, computed with the pool's own power function.
///
/// A value `≥ 1` means the trade did not lose value for the pool.  Every
/// ratio produced by a guarded swap lies inside the power-function domain.
///
/// # Errors
///
/// Propagates arithmetic and power-function errors.
pub fn invariant_ratio<P, I>(pow: &P, before_after_weight: I) -> Result<Decimal>
where
    P: PowerFunction + ?Sized,
    I: IntoIterator<Item = (Decimal, Decimal, Decimal)>,
{
    before_after_weight
        .into_iter()
        .try_fold(BONE, |acc, (before, after, weight)| {
            let ratio = after.safe_div(&before)?;
            acc.safe_mul(&pow.pow(ratio, weight)?)
        })
}

/// `1 − x`, floored at zero.  The fractional power series may overshoot
/// one by less than its precision.
fn complement(x: Decimal) -> Decimal {
    positive_diff(BONE, x)
}

/// `a − b`, floored at zero.
fn positive_diff(a: Decimal, b: Decimal) -> Decimal {
    if a > b {
        a - b
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::math::BalancerPow;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn pow() -> BalancerPow {
        BalancerPow::default()
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    fn even_swap() -> SwapCurve {
        SwapCurve {
            balance_in: dec!(100),
            weight_in: Decimal::ONE,
            balance_out: dec!(100),
            weight_out: Decimal::ONE,
            swap_fee: dec!(0.0025),
        }
    }

    fn skewed_swap() -> SwapCurve {
        SwapCurve {
            balance_in: dec!(4000),
            weight_in: dec!(8),
            balance_out: dec!(250),
            weight_out: dec!(2),
            swap_fee: dec!(0.003),
        }
    }

    fn single(weight: Decimal) -> SingleAssetCurve {
        SingleAssetCurve {
            balance: dec!(1000),
            weight,
            pool_supply: dec!(100),
            total_weight: dec!(10),
            swap_fee: dec!(0.0025),
            exit_fee: Decimal::ZERO,
        }
    }

    // -- spot price -----------------------------------------------------------

    #[test]
    fn spot_price_equal_pool() {
        let Ok(sans) = even_swap().spot_price_sans_fee() else {
            panic!("expected Ok");
        };
        assert_eq!(sans, Decimal::ONE);
        let Ok(with_fee) = even_swap().spot_price() else {
            panic!("expected Ok");
        };
        assert_close(with_fee, dec!(1.002506265664160401), TOL);
    }

    #[test]
    fn spot_price_accounts_for_weights() {
        // (4000/8) / (250/2) = 4
        let Ok(sans) = skewed_swap().spot_price_sans_fee() else {
            panic!("expected Ok");
        };
        assert_eq!(sans, dec!(4));
    }

    #[test]
    fn spot_price_zero_weight_rejected() {
        let curve = SwapCurve {
            weight_in: Decimal::ZERO,
            ..even_swap()
        };
        assert_eq!(curve.spot_price(), Err(AmmError::DivisionByZero));
    }

    // -- swap curve -----------------------------------------------------------

    #[test]
    fn out_given_in_reference_trade() {
        let Ok(r) = even_swap().out_given_in(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        // 100 · (1 − 100 / 109.975)
        assert_close(r.quantity(), dec!(9.0702432371), TOL);
        assert_eq!(r.fee(), dec!(0.025));
    }

    #[test]
    fn out_given_in_zero_is_zero() {
        let Ok(r) = even_swap().out_given_in(Decimal::ZERO, &pow()) else {
            panic!("expected Ok");
        };
        assert!(r.quantity().is_zero());
        assert!(r.fee().is_zero());
    }

    #[test]
    fn in_given_out_inverts_out_given_in() {
        for curve in [even_swap(), skewed_swap()] {
            let amount_in = curve.balance_in * dec!(0.1);
            let Ok(out) = curve.out_given_in(amount_in, &pow()) else {
                panic!("expected Ok");
            };
            let Ok(back) = curve.in_given_out(out.quantity(), &pow()) else {
                panic!("expected Ok");
            };
            assert_close(back.quantity(), amount_in, dec!(0.0001));
        }
    }

    #[test]
    fn in_given_out_fee_is_gross_minus_net() {
        let Ok(r) = even_swap().in_given_out(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        // Ai' = 100 · (100/90 − 1) = 11.111…; Ai = Ai' / 0.9975
        assert_close(r.quantity(), dec!(11.1389585073), TOL);
        assert_close(r.fee(), r.quantity() * dec!(0.0025), TOL);
    }

    #[test]
    fn in_given_out_rejects_draining() {
        let r = even_swap().in_given_out(dec!(100), &pow());
        assert!(matches!(r, Err(AmmError::RatioExceeded(_))));
    }

    // -- single-asset curve ---------------------------------------------------

    #[test]
    fn pool_out_given_single_in_charges_weight_changing_portion() {
        let curve = single(dec!(5));
        let Ok(r) = curve.pool_out_given_single_in(dec!(100), &pow()) else {
            panic!("expected Ok");
        };
        // zaz = 0.5 · 0.0025; Ai' = 99.875; P = 100 · (1.099875^0.5 − 1)
        assert_eq!(r.fee(), dec!(0.125));
        assert_close(r.quantity(), dec!(4.8749255066), TOL);
    }

    #[test]
    fn pool_out_given_single_in_zero_rejected() {
        let r = single(dec!(5)).pool_out_given_single_in(Decimal::ZERO, &pow());
        assert!(matches!(r, Err(AmmError::MathExitError(_))));
    }

    #[test]
    fn single_in_given_pool_out_inverts_join() {
        for weight in [dec!(2), dec!(5), dec!(8)] {
            let curve = single(weight);
            let Ok(shares) = curve.pool_out_given_single_in(dec!(50), &pow()) else {
                panic!("expected Ok");
            };
            let Ok(back) = curve.single_in_given_pool_out(shares.quantity(), &pow()) else {
                panic!("expected Ok");
            };
            assert_close(back.quantity(), dec!(50), dec!(0.0001));
        }
    }

    #[test]
    fn single_out_given_pool_in_inverts_exit() {
        for weight in [dec!(2), dec!(5), dec!(8)] {
            let curve = single(weight);
            let Ok(shares) = curve.pool_in_given_single_out(dec!(50), &pow()) else {
                panic!("expected Ok");
            };
            let Ok(back) = curve.single_out_given_pool_in(shares.quantity(), &pow()) else {
                panic!("expected Ok");
            };
            assert_close(back.quantity(), dec!(50), dec!(0.0001));
        }
    }

    #[test]
    fn pool_in_given_single_out_fee_matches_gross_up() {
        let curve = single(dec!(5));
        let Ok(r) = curve.pool_in_given_single_out(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        let zar = dec!(0.5) * dec!(0.0025);
        assert_close(r.fee(), dec!(10) / (Decimal::ONE - zar) - dec!(10), TOL);
    }

    #[test]
    fn pool_in_given_single_out_rejects_overdraw() {
        let r = single(dec!(5)).pool_in_given_single_out(dec!(1000), &pow());
        assert!(matches!(r, Err(AmmError::RatioExceeded(_))));
    }

    #[test]
    fn exit_fee_increases_shares_burned() {
        let free = single(dec!(5));
        let charged = SingleAssetCurve {
            exit_fee: dec!(0.01),
            ..free
        };
        let Ok(a) = free.pool_in_given_single_out(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        let Ok(b) = charged.pool_in_given_single_out(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        assert!(b.quantity() > a.quantity());
    }

    #[test]
    fn single_out_given_pool_in_rejects_more_than_supply() {
        let r = single(dec!(5)).single_out_given_pool_in(dec!(101), &pow());
        assert!(matches!(r, Err(AmmError::InsufficientShares(_))));
    }

    #[test]
    fn deposit_then_withdraw_loses_fees() {
        let curve = single(dec!(5));
        let Ok(shares) = curve.pool_out_given_single_in(dec!(20), &pow()) else {
            panic!("expected Ok");
        };
        let after = SingleAssetCurve {
            balance: curve.balance + dec!(20),
            pool_supply: curve.pool_supply + shares.quantity(),
            ..curve
        };
        let Ok(back) = after.single_out_given_pool_in(shares.quantity(), &pow()) else {
            panic!("expected Ok");
        };
        assert!(back.quantity() < dec!(20));
    }

    // -- invariant ------------------------------------------------------------

    #[test]
    fn weighted_invariant_equal_weights_is_geometric_mean() {
        let Ok(v) = weighted_invariant([(dec!(100), dec!(0.5)), (dec!(400), dec!(0.5))]) else {
            panic!("expected Ok");
        };
        assert_close(v, dec!(200), dec!(0.0001));
    }

    #[test]
    fn invariant_ratio_grows_with_fee() {
        let curve = even_swap();
        let Ok(out) = curve.out_given_in(dec!(10), &pow()) else {
            panic!("expected Ok");
        };
        let Ok(growth) = invariant_ratio(
            &pow(),
            [
                (dec!(100), dec!(110), dec!(0.5)),
                (dec!(100), dec!(100) - out.quantity(), dec!(0.5)),
            ],
        ) else {
            panic!("expected Ok");
        };
        assert!(growth > Decimal::ONE);
    }
}
