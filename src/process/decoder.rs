//! Raw action records.
//!
//! An [`ActionRecord`] is the serialized shape of one pool event as it
//! appears in a log or fixture: an object tagged by `"action"`, naming the
//! provider and the operation parameters.  Token amounts are objects with
//! `symbol` and `amount`; decimals may be given as strings or numbers.
//!
//! ```json
//! {
//!   "action": "swap_exact_amount_in",
//!   "provider": "alice",
//!   "token_in": { "symbol": "WETH", "amount": "10" },
//!   "token_out": "DAI",
//!   "min_amount_out": "9"
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{ActionOutcome, PoolAction};
use crate::domain::{Provider, Symbol, TokenAmount};
use crate::error::Result;
use crate::pools::Exchange;

/// One decoded pool event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    /// See [`PoolAction::JoinPool`].
    JoinPool {
        /// Acting provider.
        provider: Provider,
        /// Shares minted.
        shares: Decimal,
    },
    /// See [`PoolAction::JoinSwapExternAmountIn`].
    JoinSwapExternAmountIn {
        /// Acting provider.
        provider: Provider,
        /// Token and amount deposited.
        token_in: TokenAmount,
        /// Fewest shares accepted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_pool_out: Option<Decimal>,
    },
    /// See [`PoolAction::JoinSwapPoolAmountOut`].
    JoinSwapPoolAmountOut {
        /// Acting provider.
        provider: Provider,
        /// Shares minted.
        pool_out: Decimal,
        /// Token deposited.
        token_in: Symbol,
        /// Largest deposit accepted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_amount_in: Option<Decimal>,
    },
    /// See [`PoolAction::ExitSwapExternAmountOut`].
    ExitSwapExternAmountOut {
        /// Acting provider.
        provider: Provider,
        /// Token and amount withdrawn.
        token_out: TokenAmount,
        /// Most shares burned.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_pool_in: Option<Decimal>,
    },
    /// See [`PoolAction::ExitSwapPoolAmountIn`].
    ExitSwapPoolAmountIn {
        /// Acting provider.
        provider: Provider,
        /// Shares burned.
        pool_in: Decimal,
        /// Token withdrawn.
        token_out: Symbol,
        /// Smallest withdrawal accepted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_amount_out: Option<Decimal>,
    },
    /// See [`PoolAction::ExitPool`].
    ExitPool {
        /// Acting provider.
        provider: Provider,
        /// Shares burned.
        pool_in: Decimal,
    },
    /// See [`PoolAction::SwapExactAmountIn`].
    SwapExactAmountIn {
        /// Acting trader.
        provider: Provider,
        /// Token and amount sold.
        token_in: TokenAmount,
        /// Token bought.
        token_out: Symbol,
        /// Smallest output accepted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_amount_out: Option<Decimal>,
    },
    /// See [`PoolAction::SwapExactAmountOut`].
    SwapExactAmountOut {
        /// Acting trader.
        provider: Provider,
        /// Token and amount bought.
        token_out: TokenAmount,
        /// Token sold.
        token_in: Symbol,
        /// Largest input accepted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_amount_in: Option<Decimal>,
    },
}

impl ActionRecord {
    /// Returns the acting provider.
    #[must_use]
    pub const fn provider(&self) -> &Provider {
        match self {
            Self::JoinPool { provider, .. }
            | Self::JoinSwapExternAmountIn { provider, .. }
            | Self::JoinSwapPoolAmountOut { provider, .. }
            | Self::ExitSwapExternAmountOut { provider, .. }
            | Self::ExitSwapPoolAmountIn { provider, .. }
            | Self::ExitPool { provider, .. }
            | Self::SwapExactAmountIn { provider, .. }
            | Self::SwapExactAmountOut { provider, .. } => provider,
        }
    }

    /// Splits the record into its provider and typed action.
    #[must_use]
    pub fn into_action(self) -> (Provider, PoolAction) {
        match self {
            Self::JoinPool { provider, shares } => (provider, PoolAction::JoinPool { shares }),
            Self::JoinSwapExternAmountIn {
                provider,
                token_in,
                min_pool_out,
            } => (
                provider,
                PoolAction::JoinSwapExternAmountIn {
                    token_in,
                    min_pool_out,
                },
            ),
            Self::JoinSwapPoolAmountOut {
                provider,
                pool_out,
                token_in,
                max_amount_in,
            } => (
                provider,
                PoolAction::JoinSwapPoolAmountOut {
                    pool_out,
                    token_in,
                    max_amount_in,
                },
            ),
            Self::ExitSwapExternAmountOut {
                provider,
                token_out,
                max_pool_in,
            } => (
                provider,
                PoolAction::ExitSwapExternAmountOut {
                    token_out,
                    max_pool_in,
                },
            ),
            Self::ExitSwapPoolAmountIn {
                provider,
                pool_in,
                token_out,
                min_amount_out,
            } => (
                provider,
                PoolAction::ExitSwapPoolAmountIn {
                    pool_in,
                    token_out,
                    min_amount_out,
                },
            ),
            Self::ExitPool { provider, pool_in } => (provider, PoolAction::ExitPool { pool_in }),
            Self::SwapExactAmountIn {
                provider,
                token_in,
                token_out,
                min_amount_out,
            } => (
                provider,
                PoolAction::SwapExactAmountIn {
                    token_in,
                    token_out,
                    min_amount_out,
                },
            ),
            Self::SwapExactAmountOut {
                provider,
                token_out,
                token_in,
                max_amount_in,
            } => (
                provider,
                PoolAction::SwapExactAmountOut {
                    token_out,
                    token_in,
                    max_amount_in,
                },
            ),
        }
    }
}

/// Applies `records` to `exchange` in order.
///
/// Stops at the first failing record; the records before it stay
/// applied and the failing one leaves the exchange untouched.
///
/// # Errors
///
/// Returns the error of the first record that fails.
pub fn replay<I>(exchange: &mut Exchange, records: I) -> Result<Vec<ActionOutcome>>
where
    I: IntoIterator<Item = ActionRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let (provider, action) = record.into_action();
            trace!(pool = %exchange.symbol(), index, action = action.name(), provider = %provider, "replay");
            exchange.apply(&action, &provider)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::Token;
    use crate::error::AmmError;
    use crate::factory::ExchangeData;
    use crate::traits::{FromConfig, LiquidityPool};
    use crate::vault::Vault;
    use rust_decimal_macros::dec;

    fn decode(json: &str) -> ActionRecord {
        match serde_json::from_str(json) {
            Ok(record) => record,
            Err(e) => panic!("decode failed: {e}"),
        }
    }

    fn pool() -> Exchange {
        let Ok(vault) = Vault::from_tokens([
            Token::new("WETH", dec!(100), Decimal::ONE),
            Token::new("DAI", dec!(100), Decimal::ONE),
        ]) else {
            panic!("expected Ok");
        };
        let Ok(ex) = Exchange::from_config(&ExchangeData::new(vault, "WD", "0x01")) else {
            panic!("expected Ok");
        };
        ex
    }

    #[test]
    fn decodes_swap_with_limit() {
        let record = decode(
            r#"{"action":"swap_exact_amount_in","provider":"bob",
                "token_in":{"symbol":"WETH","amount":"10"},
                "token_out":"DAI","min_amount_out":"9"}"#,
        );
        assert_eq!(record.provider().as_str(), "bob");
        let (provider, action) = record.into_action();
        assert_eq!(provider, Provider::new("bob"));
        assert_eq!(
            action,
            PoolAction::SwapExactAmountIn {
                token_in: TokenAmount::new("WETH", dec!(10)),
                token_out: Symbol::new("DAI"),
                min_amount_out: Some(dec!(9)),
            }
        );
    }

    #[test]
    fn missing_limit_defaults_to_none() {
        let record = decode(
            r#"{"action":"exit_swap_pool_amount_in","provider":"alice",
                "pool_in":"2.5","token_out":"WETH"}"#,
        );
        let (_, action) = record.into_action();
        assert_eq!(
            action,
            PoolAction::ExitSwapPoolAmountIn {
                pool_in: dec!(2.5),
                token_out: Symbol::new("WETH"),
                min_amount_out: None,
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        let r: core::result::Result<ActionRecord, _> =
            serde_json::from_str(r#"{"action":"mint","provider":"alice","shares":"1"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn serialize_then_decode_keeps_the_record() {
        let record = ActionRecord::JoinSwapPoolAmountOut {
            provider: Provider::new("carol"),
            pool_out: dec!(1.25),
            token_in: Symbol::new("DAI"),
            max_amount_in: Some(dec!(3)),
        };
        let Ok(json) = serde_json::to_string(&record) else {
            panic!("expected Ok");
        };
        assert!(json.contains(r#""action":"join_swap_pool_amount_out""#));
        assert_eq!(decode(&json), record);
    }

    #[test]
    fn replay_runs_records_in_order() {
        let mut ex = pool();
        let records = [
            r#"{"action":"join_pool","provider":"alice","shares":"100"}"#,
            r#"{"action":"swap_exact_amount_in","provider":"bob",
                "token_in":{"symbol":"WETH","amount":"10"},"token_out":"DAI"}"#,
            r#"{"action":"exit_pool","provider":"alice","pool_in":"50"}"#,
        ]
        .map(decode);
        let Ok(outcomes) = replay(&mut ex, records) else {
            panic!("expected Ok");
        };
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], ActionOutcome::Joined(dec!(100)));
        assert!(outcomes[1].result().is_some());
        assert_eq!(outcomes[2].basket().map(<[TokenAmount]>::len), Some(2));
        assert_eq!(ex.total_shares(), dec!(50));
    }

    #[test]
    fn replay_stops_at_first_failure() {
        let mut ex = pool();
        let records = [
            r#"{"action":"join_pool","provider":"alice","shares":"100"}"#,
            r#"{"action":"join_pool","provider":"bob","shares":"100"}"#,
            r#"{"action":"exit_pool","provider":"alice","pool_in":"100"}"#,
        ]
        .map(decode);
        assert_eq!(replay(&mut ex, records), Err(AmmError::PoolAlreadyJoined));
        assert!(ex.is_joined());
        assert_eq!(ex.total_shares(), dec!(100));
    }
}
