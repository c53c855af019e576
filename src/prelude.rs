//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use weighted_amm::prelude::*;
//! ```

pub use crate::config::PoolConfig;
pub use crate::domain::{MathResult, Provider, Symbol, Token, TokenAmount};
pub use crate::error::{AmmError, Result};
pub use crate::factory::{ExchangeData, ExchangeFactory};
pub use crate::math::{BalancerPow, CheckedArithmetic, PowerFunction};
pub use crate::pools::Exchange;
#[cfg(feature = "serde")]
pub use crate::process::ActionRecord;
pub use crate::process::{ActionOutcome, PoolAction, Proc};
pub use crate::quote::Quote;
pub use crate::traits::{FromConfig, LiquidityPool, SwapPool};
pub use crate::vault::Vault;
