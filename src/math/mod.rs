//! Arithmetic and bonding-curve mathematics for weighted pools.
//!
//! This module provides [`CheckedArithmetic`] for overflow-safe decimal
//! operations, the protocol [`constants`], the pluggable
//! [`PowerFunction`] with its Balancer default [`BalancerPow`], and the
//! two weighted curves every pool formula is derived from.
//!
//! | Curve | Formulas |
//! |-------|----------|
//! | [`SwapCurve`] | spot price, `out_given_in`, `in_given_out` |
//! | [`SingleAssetCurve`] | `pool_out_given_single_in`, `single_in_given_pool_out`, `pool_in_given_single_out`, `single_out_given_pool_in` |

mod checked;
pub mod constants;
mod pow;
mod weighted;

pub use checked::{sub_sign, CheckedArithmetic};
pub use pow::{BalancerPow, PowerFunction};
pub use weighted::{invariant_ratio, weighted_invariant, SingleAssetCurve, SwapCurve};
