//! Generic construction trait for building a pool from its description.
//!
//! [`FromConfig`] gives the factory one uniform way to create pools.
//!
//! # Validation Contract
//!
//! Implementations **must** validate all invariants during construction.
//! A successfully constructed pool is guaranteed to be in a valid
//! initial state:
//!
//! - The [`PoolConfig`](crate::config::PoolConfig) passes `validate()`
//! - The vault holds between the configured minimum and maximum number
//!   of bound tokens
//! - Every bound weight and the weight total are within bounds
//!
//! # No Generic Blanket Implementation
//!
//! There is no `impl<T> FromConfig<T>` blanket; each pool implements the
//! trait for its own description type.

use crate::error::AmmError;

/// Construction trait for building a pool from a description.
///
/// # Type Parameters
///
/// - `C`: the description that fully determines the pool's initial
///   state (vault, metadata and configuration).
///
/// # Implementors
///
/// - `impl FromConfig<ExchangeData> for Exchange`
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific
/// variant) if the description is invalid.
pub trait FromConfig<C> {
    /// Creates a new pool from the given description.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if a parameter is out of range
    ///   or inconsistent.
    /// - [`AmmError::InvalidFee`] if a fee is unsupported.
    /// - [`AmmError::InvalidWeight`] if a token weight is out of range.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
