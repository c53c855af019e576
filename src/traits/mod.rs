//! Core trait abstractions for pool operations.
//!
//! This module defines the traits every pool implementation satisfies:
//! [`SwapPool`] for swaps and prices, [`LiquidityPool`] for joins and
//! exits, and [`FromConfig`] for description-driven construction.

mod from_config;
mod liquidity_pool;
mod swap_pool;

pub use from_config::FromConfig;
pub use liquidity_pool::LiquidityPool;
pub use swap_pool::SwapPool;
