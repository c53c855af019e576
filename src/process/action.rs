//! Typed exchange operations.

use rust_decimal::Decimal;

use crate::domain::{MathResult, Provider, Symbol, TokenAmount};
use crate::error::Result;
use crate::pools::Exchange;

/// Input of one exchange operation.
///
/// The optional limits are checked against the priced result before
/// anything is committed; `None` disables the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolAction {
    /// Seed an unjoined pool with `shares`.
    JoinPool {
        /// Shares minted to the provider.
        shares: Decimal,
    },
    /// Deposit an exact token amount.
    JoinSwapExternAmountIn {
        /// Token and amount deposited.
        token_in: TokenAmount,
        /// Fewest shares the provider accepts.
        min_pool_out: Option<Decimal>,
    },
    /// Mint an exact share amount.
    JoinSwapPoolAmountOut {
        /// Shares minted.
        pool_out: Decimal,
        /// Token deposited.
        token_in: Symbol,
        /// Largest deposit the provider accepts.
        max_amount_in: Option<Decimal>,
    },
    /// Withdraw an exact token amount.
    ExitSwapExternAmountOut {
        /// Token and amount withdrawn.
        token_out: TokenAmount,
        /// Most shares the provider is willing to burn.
        max_pool_in: Option<Decimal>,
    },
    /// Burn an exact share amount for one token.
    ExitSwapPoolAmountIn {
        /// Shares burned.
        pool_in: Decimal,
        /// Token withdrawn.
        token_out: Symbol,
        /// Smallest withdrawal the provider accepts.
        min_amount_out: Option<Decimal>,
    },
    /// Burn shares for a proportional slice of every reserve.
    ExitPool {
        /// Shares burned.
        pool_in: Decimal,
    },
    /// Sell an exact amount of one token.
    SwapExactAmountIn {
        /// Token and amount sold.
        token_in: TokenAmount,
        /// Token bought.
        token_out: Symbol,
        /// Smallest output the trader accepts.
        min_amount_out: Option<Decimal>,
    },
    /// Buy an exact amount of one token.
    SwapExactAmountOut {
        /// Token and amount bought.
        token_out: TokenAmount,
        /// Token sold.
        token_in: Symbol,
        /// Largest input the trader accepts.
        max_amount_in: Option<Decimal>,
    },
}

impl PoolAction {
    /// Returns the operation name, e.g. `"swap_exact_amount_in"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinPool { .. } => "join_pool",
            Self::JoinSwapExternAmountIn { .. } => "join_swap_extern_amount_in",
            Self::JoinSwapPoolAmountOut { .. } => "join_swap_pool_amount_out",
            Self::ExitSwapExternAmountOut { .. } => "exit_swap_extern_amount_out",
            Self::ExitSwapPoolAmountIn { .. } => "exit_swap_pool_amount_in",
            Self::ExitPool { .. } => "exit_pool",
            Self::SwapExactAmountIn { .. } => "swap_exact_amount_in",
            Self::SwapExactAmountOut { .. } => "swap_exact_amount_out",
        }
    }
}

/// What an applied [`PoolAction`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The pool was seeded with this many shares.
    Joined(Decimal),
    /// A swap or single-asset join/exit: derived quantity and fee.
    Single(MathResult),
    /// A proportional exit: amount withdrawn per token.
    Basket(Vec<TokenAmount>),
}

impl ActionOutcome {
    /// Returns the `(quantity, fee)` pair of a single-result outcome.
    #[must_use]
    pub const fn result(&self) -> Option<MathResult> {
        match self {
            Self::Single(res) => Some(*res),
            Self::Joined(_) | Self::Basket(_) => None,
        }
    }

    /// Returns the withdrawn amounts of a basket outcome.
    #[must_use]
    pub fn basket(&self) -> Option<&[TokenAmount]> {
        match self {
            Self::Basket(amounts) => Some(amounts),
            Self::Joined(_) | Self::Single(_) => None,
        }
    }
}

impl Exchange {
    /// Executes `action` on behalf of `provider`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutput`](crate::error::AmmError::InsufficientOutput)
    ///   if a minimum limit is not met.
    /// - [`AmmError::LimitIn`](crate::error::AmmError::LimitIn) if a
    ///   maximum limit is exceeded.
    /// - Any error of the underlying operation.
    pub fn apply(&mut self, action: &PoolAction, provider: &Provider) -> Result<ActionOutcome> {
        match action {
            PoolAction::JoinPool { shares } => {
                self.execute_join_pool(*shares, provider)?;
                Ok(ActionOutcome::Joined(*shares))
            }
            PoolAction::JoinSwapExternAmountIn {
                token_in,
                min_pool_out,
            } => self
                .execute_join_extern_in(
                    token_in.amount(),
                    token_in.symbol().as_str(),
                    *min_pool_out,
                    provider,
                )
                .map(ActionOutcome::Single),
            PoolAction::JoinSwapPoolAmountOut {
                pool_out,
                token_in,
                max_amount_in,
            } => self
                .execute_join_pool_out(*pool_out, token_in.as_str(), *max_amount_in, provider)
                .map(ActionOutcome::Single),
            PoolAction::ExitSwapExternAmountOut {
                token_out,
                max_pool_in,
            } => self
                .execute_exit_extern_out(
                    token_out.amount(),
                    token_out.symbol().as_str(),
                    *max_pool_in,
                    provider,
                )
                .map(ActionOutcome::Single),
            PoolAction::ExitSwapPoolAmountIn {
                pool_in,
                token_out,
                min_amount_out,
            } => self
                .execute_exit_pool_in(*pool_in, token_out.as_str(), *min_amount_out, provider)
                .map(ActionOutcome::Single),
            PoolAction::ExitPool { pool_in } => self
                .execute_exit_pool(*pool_in, provider)
                .map(ActionOutcome::Basket),
            PoolAction::SwapExactAmountIn {
                token_in,
                token_out,
                min_amount_out,
            } => self
                .execute_swap_exact_in(
                    token_in.amount(),
                    token_in.symbol().as_str(),
                    token_out.as_str(),
                    *min_amount_out,
                    provider,
                )
                .map(ActionOutcome::Single),
            PoolAction::SwapExactAmountOut {
                token_out,
                token_in,
                max_amount_in,
            } => self
                .execute_swap_exact_out(
                    token_out.amount(),
                    token_out.symbol().as_str(),
                    token_in.as_str(),
                    *max_amount_in,
                    provider,
                )
                .map(ActionOutcome::Single),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Token;
    use crate::error::AmmError;
    use crate::factory::ExchangeData;
    use crate::traits::{FromConfig, LiquidityPool, SwapPool};
    use crate::vault::Vault;
    use rust_decimal_macros::dec;

    fn alice() -> Provider {
        Provider::new("alice")
    }

    fn unjoined() -> Exchange {
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

    fn joined() -> Exchange {
        let mut ex = unjoined();
        let Ok(_) = ex.apply(&PoolAction::JoinPool { shares: dec!(100) }, &alice()) else {
            panic!("expected Ok");
        };
        ex
    }

    #[test]
    fn join_pool_outcome() {
        let mut ex = unjoined();
        let Ok(out) = ex.apply(&PoolAction::JoinPool { shares: dec!(50) }, &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(out, ActionOutcome::Joined(dec!(50)));
        assert_eq!(out.result(), None);
        assert_eq!(ex.total_shares(), dec!(50));
    }

    #[test]
    fn apply_matches_trait_call() {
        let mut a = joined();
        let mut b = joined();
        let action = PoolAction::SwapExactAmountIn {
            token_in: TokenAmount::new("WETH", dec!(10)),
            token_out: Symbol::new("DAI"),
            min_amount_out: None,
        };
        let Ok(out) = a.apply(&action, &alice()) else {
            panic!("expected Ok");
        };
        let Ok(res) = b.swap_exact_amount_in(dec!(10), "WETH", "DAI", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(out.result(), Some(res));
        assert_eq!(a, b);
    }

    #[test]
    fn limits_reject_before_commit() {
        let mut ex = joined();
        let before = ex.clone();
        let cases = [
            (
                PoolAction::SwapExactAmountIn {
                    token_in: TokenAmount::new("WETH", dec!(10)),
                    token_out: Symbol::new("DAI"),
                    min_amount_out: Some(dec!(9.1)),
                },
                AmmError::InsufficientOutput,
            ),
            (
                PoolAction::SwapExactAmountOut {
                    token_out: TokenAmount::new("DAI", dec!(10)),
                    token_in: Symbol::new("WETH"),
                    max_amount_in: Some(dec!(11)),
                },
                AmmError::LimitIn,
            ),
            (
                PoolAction::JoinSwapExternAmountIn {
                    token_in: TokenAmount::new("WETH", dec!(10)),
                    min_pool_out: Some(dec!(5)),
                },
                AmmError::InsufficientOutput,
            ),
            (
                PoolAction::JoinSwapPoolAmountOut {
                    pool_out: dec!(5),
                    token_in: Symbol::new("WETH"),
                    max_amount_in: Some(dec!(10)),
                },
                AmmError::LimitIn,
            ),
            (
                PoolAction::ExitSwapExternAmountOut {
                    token_out: TokenAmount::new("DAI", dec!(10)),
                    max_pool_in: Some(dec!(5)),
                },
                AmmError::LimitIn,
            ),
            (
                PoolAction::ExitSwapPoolAmountIn {
                    pool_in: dec!(10),
                    token_out: Symbol::new("DAI"),
                    min_amount_out: Some(dec!(19)),
                },
                AmmError::InsufficientOutput,
            ),
        ];
        for (action, expected) in cases {
            assert_eq!(ex.apply(&action, &alice()), Err(expected), "{}", action.name());
            assert_eq!(ex, before, "{} mutated the pool", action.name());
        }
    }

    #[test]
    fn limits_that_hold_pass() {
        let mut ex = joined();
        let action = PoolAction::ExitSwapPoolAmountIn {
            pool_in: dec!(10),
            token_out: Symbol::new("DAI"),
            min_amount_out: Some(dec!(18.9)),
        };
        let Ok(out) = ex.apply(&action, &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(out.result().map(|r| r.quantity()), Some(dec!(18.97625)));
    }

    #[test]
    fn exit_pool_outcome_is_a_basket() {
        let mut ex = joined();
        let Ok(out) = ex.apply(&PoolAction::ExitPool { pool_in: dec!(50) }, &alice()) else {
            panic!("expected Ok");
        };
        let Some(basket) = out.basket() else {
            panic!("expected basket");
        };
        assert_eq!(
            basket,
            &[
                TokenAmount::new("WETH", dec!(50)),
                TokenAmount::new("DAI", dec!(50))
            ]
        );
    }

    #[test]
    fn names_follow_operations() {
        assert_eq!(PoolAction::ExitPool { pool_in: dec!(1) }.name(), "exit_pool");
        assert_eq!(
            PoolAction::JoinPool { shares: dec!(1) }.name(),
            "join_pool"
        );
    }
}
