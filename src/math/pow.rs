//! Power function over decimal bases and fractional exponents.
//!
//! The weighted curves raise balance ratios to weight ratios, e.g.
//! `(Bi / (Bi + Ai))^(Wi / Wo)`.  [`PowerFunction`] isolates that
//! operation so its precision/performance tradeoff can be tuned and
//! tested on its own.  [`BalancerPow`] reproduces the contract's `bpow`:
//!
//! ```text
//! base^exp = base^floor(exp) · base^(exp − floor(exp))
//!            └── bpowi ───┘   └──── bpow_approx ─────┘
//! ```
//!
//! `bpowi` is exact square-and-multiply; `bpow_approx` sums the binomial
//! series of `(1 + x)^a` with `x = base − 1` until a term drops below the
//! configured precision.
//!
//! The series converges slowly as `|x|` approaches one, so a base farther
//! than [`BPOW_SERIES_RADIUS`] from one is replaced by its square root and
//! the exponent doubled until it is inside the radius:
//!
//! ```text
//! base^a = (√base)^(2a)
//! ```
//!
//! Every base the pool ratio guards admit already lies inside the radius
//! and takes the series directly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use super::checked::{sub_sign, CheckedArithmetic};
use super::constants::{
    BONE, BPOW_MAX_ITERATIONS, BPOW_PRECISION, BPOW_SERIES_RADIUS, MAX_BPOW_BASE, MIN_BPOW_BASE,
};
use crate::error::{AmmError, Result};

/// Raises a decimal base to a non-negative decimal exponent.
///
/// # Contract
///
/// - Implementations never panic; domain errors are returned as
///   [`AmmError`] values.
/// - For an integer exponent the result must be exact up to decimal
///   rounding of the intermediate products.
pub trait PowerFunction {
    /// Computes `base^exp`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; see [`BalancerPow::pow`] for the default.
    fn pow(&self, base: Decimal, exp: Decimal) -> Result<Decimal>;
}

/// The Balancer V1 `bpow` with a bounded fractional series.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::math::{BalancerPow, PowerFunction};
///
/// let pow = BalancerPow::default();
/// let r = pow.pow(Decimal::new(15, 1), Decimal::TWO).expect("in range");
/// assert_eq!(r, Decimal::new(225, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancerPow {
    precision: Decimal,
    max_iterations: u32,
}

impl BalancerPow {
    /// Creates a power function that stops the fractional series once a
    /// term is below `precision`, failing after `max_iterations` terms.
    #[must_use]
    pub const fn new(precision: Decimal, max_iterations: u32) -> Self {
        Self {
            precision,
            max_iterations,
        }
    }

    /// Returns the series cut-off.
    #[must_use]
    pub const fn precision(&self) -> Decimal {
        self.precision
    }

    /// Returns the iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Exact integer power by repeated squaring.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if an intermediate product overflows.
    pub fn powi(base: Decimal, exp: u64) -> Result<Decimal> {
        let mut a = base;
        let mut n = exp;
        let mut z = if n % 2 == 0 { BONE } else { a };
        n /= 2;
        while n != 0 {
            a = a.safe_mul(&a)?;
            if n % 2 != 0 {
                z = z.safe_mul(&a)?;
            }
            n /= 2;
        }
        Ok(z)
    }

    /// Binomial-series approximation of `base^exp` for `0 ≤ exp < 1`.
    ///
    /// ```text
    /// (1 + x)^a = 1 + a·x + a(a−1)/2!·x² + a(a−1)(a−2)/3!·x³ + …
    /// ```
    ///
    /// Terms are kept as magnitudes and the running sign is tracked
    /// separately, as the contract does.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PowNonConvergence`] if the series needs more than
    ///   `max_iterations` terms.
    /// - [`AmmError::Overflow`] on arithmetic overflow.
    pub fn pow_approx(&self, base: Decimal, exp: Decimal) -> Result<Decimal> {
        let (x, x_neg) = sub_sign(base, BONE)?;
        let mut term = BONE;
        let mut sum = term;
        let mut negative = false;
        let mut i: u32 = 1;

        while term >= self.precision {
            if i > self.max_iterations {
                return Err(AmmError::PowNonConvergence);
            }
            let big_k = Decimal::from(i);
            let (c, c_neg) = sub_sign(exp, big_k.safe_sub(&BONE)?)?;
            term = term.safe_mul(&c.safe_mul(&x)?)?.safe_div(&big_k)?;
            if term.is_zero() {
                break;
            }
            if x_neg {
                negative = !negative;
            }
            if c_neg {
                negative = !negative;
            }
            sum = if negative {
                sum.checked_sub(term)
                    .ok_or(AmmError::Overflow("power series subtraction overflow"))?
            } else {
                sum.safe_add(&term)?
            };
            i += 1;
        }
        Ok(sum)
    }

    /// `base^frac` for `0 < frac < 1`, square-rooting bases outside the
    /// series radius.  Recursion depth is bounded by the base range: six
    /// roots bring `MIN_BPOW_BASE` inside it.
    fn pow_fraction(&self, base: Decimal, frac: Decimal) -> Result<Decimal> {
        let (x, _) = sub_sign(base, BONE)?;
        if x <= BPOW_SERIES_RADIUS {
            return self.pow_approx(base, frac);
        }
        let root = base
            .sqrt()
            .ok_or(AmmError::Overflow("power base square root failed"))?;
        self.pow(root, frac.safe_mul(&Decimal::TWO)?)
    }
}

impl Default for BalancerPow {
    fn default() -> Self {
        Self::new(BPOW_PRECISION, BPOW_MAX_ITERATIONS)
    }
}

impl PowerFunction for BalancerPow {
    /// Computes `base^exp` as `bpowi(base, ⌊exp⌋) · bpow_approx(base, exp − ⌊exp⌋)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PowBaseOutOfRange`] if `base` is outside
    ///   `[MIN_BPOW_BASE, MAX_BPOW_BASE]`.
    /// - [`AmmError::InvalidQuantity`] if `exp` is negative.
    /// - [`AmmError::Overflow`] if the integer part of `exp` does not fit
    ///   in `u64` or a product overflows.
    /// - [`AmmError::PowNonConvergence`] if the fractional series needs
    ///   more than `max_iterations` terms.
    fn pow(&self, base: Decimal, exp: Decimal) -> Result<Decimal> {
        if base < MIN_BPOW_BASE || base > MAX_BPOW_BASE {
            return Err(AmmError::PowBaseOutOfRange);
        }
        if exp.is_sign_negative() && !exp.is_zero() {
            return Err(AmmError::InvalidQuantity("power exponent is negative"));
        }

        let whole = exp.floor();
        let remain = exp.safe_sub(&whole)?;
        let n = whole
            .to_u64()
            .ok_or(AmmError::Overflow("power exponent too large"))?;
        let whole_pow = Self::powi(base, n)?;
        if remain.is_zero() {
            return Ok(whole_pow);
        }

        let partial = self.pow_fraction(base, remain)?;
        whole_pow.safe_mul(&partial)
    }
}
