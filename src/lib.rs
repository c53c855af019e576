//! # Weighted AMM
//!
//! Off-chain engine for multi-asset weighted constant-product pools in
//! the style of Balancer V1.
//!
//! A pool holds between two and eight tokens, each with a denormalized
//! weight.  Its value function is the weighted geometric mean of the
//! balances,
//!
//! ```text
//! V = ∏ Bᵢ ^ (Wᵢ / ΣW)
//! ```
//!
//! and every swap, single-asset join and single-asset exit is priced so
//! that `V` never decreases.  All arithmetic is decimal
//! ([`rust_decimal::Decimal`]); there is no binary floating point in the
//! engine.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use weighted_amm::domain::{Provider, Token};
//! use weighted_amm::factory::{ExchangeData, ExchangeFactory};
//! use weighted_amm::traits::{LiquidityPool, SwapPool};
//! use weighted_amm::vault::Vault;
//!
//! // 1. Register the tokens of the pool with balances and weights
//! let vault = Vault::from_tokens([
//!     Token::new("WETH", Decimal::ONE_HUNDRED, Decimal::ONE),
//!     Token::new("DAI", Decimal::ONE_HUNDRED, Decimal::ONE),
//! ])
//! .expect("distinct symbols");
//!
//! // 2. Deploy the exchange through the factory
//! let mut factory = ExchangeFactory::new("factory", "0x00");
//! let pool = factory
//!     .deploy(ExchangeData::new(vault, "WD", "0x01"))
//!     .expect("deployed");
//!
//! // 3. Seed it and trade
//! let alice = Provider::new("alice");
//! pool.join_pool(Decimal::ONE_HUNDRED, &alice).expect("joined");
//! let res = pool
//!     .swap_exact_amount_in(Decimal::TEN, "WETH", "DAI", &alice)
//!     .expect("swapped");
//!
//! assert!(res.quantity() > Decimal::ZERO);
//! assert_eq!(pool.reserve("WETH"), Ok(Decimal::new(110, 0)));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Consumer   │  ExchangeData + ExchangeFactory, or PoolAction / ActionRecord
//! └──────┬──────┘
//!        │ deploy(data)
//!        ▼
//! ┌─────────────┐
//! │   Factory   │  validates, builds via FromConfig, indexes by symbol and token set
//! └──────┬──────┘
//!        │ &mut Exchange
//!        ▼
//! ┌─────────────┐
//! │  Exchange   │  SwapPool + LiquidityPool: validate, stage, commit
//! └──────┬──────┘
//!        │ balances, weights            │ curves
//!        ▼                              ▼
//! ┌─────────────┐               ┌─────────────┐
//! │    Vault    │               │    Math     │  SwapCurve, SingleAssetCurve, BalancerPow
//! └─────────────┘               └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Symbol`](domain::Symbol), [`Provider`](domain::Provider), [`Token`](domain::Token), [`MathResult`](domain::MathResult) |
//! | [`math`] | Checked arithmetic, protocol constants, the power function and the eight curve formulas |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) fee, ratio, weight and tolerance parameters |
//! | [`vault`] | [`Vault`](vault::Vault) token registry |
//! | [`traits`] | [`SwapPool`](traits::SwapPool), [`LiquidityPool`](traits::LiquidityPool), [`FromConfig`](traits::FromConfig) |
//! | [`pools`] | [`Exchange`](pools::Exchange) state machine and [`ShareLedger`](pools::ShareLedger) |
//! | [`factory`] | [`ExchangeFactory`](factory::ExchangeFactory) and [`ExchangeData`](factory::ExchangeData) |
//! | [`quote`] | Read-only [`Quote`](quote::Quote) helper |
//! | [`process`] | [`Proc`](process::Proc) dispatch, typed [`PoolAction`](process::PoolAction)s and the action decoder |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std` | yes | Standard library support |
//! | `serde` | yes | Serialization of value types, config and action records |
//!
//! # Logging
//!
//! The engine emits [`tracing`] events (`debug` per committed operation,
//! `trace` for staged state, `warn` when a post-condition rejects a call,
//! `info` on deployment).  It never installs a subscriber.

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod process;
pub mod quote;
pub mod traits;
pub mod vault;
