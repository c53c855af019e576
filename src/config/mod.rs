//! Pool configuration.
//!
//! This module contains [`PoolConfig`], the per-pool blueprint of fees,
//! ratio bounds, weight bounds and numeric precision that an exchange
//! captures when the factory creates it.

mod pool_config;

pub use pool_config::PoolConfig;
