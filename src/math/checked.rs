//! Checked arithmetic for [`Decimal`] quantities.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking on overflow, negative results, or division by zero.
//!
//! Balances, weights and shares are non-negative, so [`safe_sub`] treats a
//! negative difference as [`AmmError::Underflow`], the same way the
//! on-chain `bsub` reverts.  Signed intermediate values (the power series)
//! use [`sub_sign`] instead.
//!
//! # Examples
//!
//! ```
//! use rust_decimal::Decimal;
//! use weighted_amm::math::CheckedArithmetic;
//!
//! let a = Decimal::ONE;
//! let b = Decimal::TWO;
//! assert_eq!(a.safe_add(&b), Ok(Decimal::from(3)));
//! assert!(a.safe_sub(&b).is_err());
//! ```
//!
//! [`safe_sub`]: CheckedArithmetic::safe_sub

use rust_decimal::Decimal;

use crate::error::AmmError;

/// Fallible arithmetic for engine quantities.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: overflow is an error, never a clamped value.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked non-negative subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked division.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero, or
    /// [`AmmError::Overflow`] if the quotient is not representable.
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("decimal addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        let diff = self
            .checked_sub(*other)
            .ok_or(AmmError::Overflow("decimal subtraction overflow"))?;
        if diff.is_sign_negative() && !diff.is_zero() {
            return Err(AmmError::Underflow("decimal subtraction underflow"));
        }
        Ok(diff)
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("decimal multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        self.checked_div(*other)
            .ok_or(AmmError::Overflow("decimal division overflow"))
    }
}

/// Returns `|a − b|` together with a flag that is `true` when `a < b`.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the difference is not representable.
pub fn sub_sign(a: Decimal, b: Decimal) -> Result<(Decimal, bool), AmmError> {
    if a >= b {
        Ok((a.safe_sub(&b)?, false))
    } else {
        Ok((b.safe_sub(&a)?, true))
    }
}
