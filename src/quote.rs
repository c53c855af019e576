//! Read-only price and amount quotes.
//!
//! A [`Quote`] borrows an [`Exchange`] and answers "what would this
//! operation yield" with the same pricing path the operation itself uses,
//! so a quote and the committed result agree to the last digit.  Nothing
//! is mutated.
//!
//! A zero or negative amount quotes [`MathResult::default`] instead of
//! failing.  The token is still checked first.

use rust_decimal::Decimal;

use crate::domain::{MathResult, TokenAmount};
use crate::error::Result;
use crate::pools::Exchange;
use crate::traits::SwapPool;

/// Quotes against the current state of one exchange.
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::{Provider, Token};
/// use weighted_amm::factory::ExchangeData;
/// use weighted_amm::pools::Exchange;
/// use weighted_amm::quote::Quote;
/// use weighted_amm::traits::{FromConfig, LiquidityPool, SwapPool};
/// use weighted_amm::vault::Vault;
///
/// let vault = Vault::from_tokens([
///     Token::new("WETH", Decimal::ONE_HUNDRED, Decimal::ONE),
///     Token::new("DAI", Decimal::ONE_HUNDRED, Decimal::ONE),
/// ])
/// .expect("distinct symbols");
/// let mut pool = Exchange::from_config(&ExchangeData::new(vault, "WD", "0x01"))
///     .expect("valid pool");
/// let alice = Provider::new("alice");
/// pool.join_pool(Decimal::ONE_HUNDRED, &alice).expect("join");
///
/// let quoted = Quote::new(&pool)
///     .amount_out(Decimal::TEN, "WETH", "DAI")
///     .expect("quote");
/// let swapped = pool
///     .swap_exact_amount_in(Decimal::TEN, "WETH", "DAI", &alice)
///     .expect("swap");
/// assert_eq!(quoted, swapped);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Quote<'a> {
    exchange: &'a Exchange,
}

impl<'a> Quote<'a> {
    /// Creates a quote helper over `exchange`.
    #[must_use]
    pub const fn new(exchange: &'a Exchange) -> Self {
        Self { exchange }
    }

    /// Returns the quoted exchange.
    #[must_use]
    pub const fn exchange(&self) -> &'a Exchange {
        self.exchange
    }

    /// Output of swapping exactly `amount_in` of `token_in`.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`SwapPool::swap_exact_amount_in`](crate::traits::SwapPool::swap_exact_amount_in)
    /// up to the post-trade checks.
    pub fn amount_out(&self, amount_in: Decimal, token_in: &str, token_out: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_in)?;
        self.exchange.ensure_listed(token_out)?;
        if amount_in <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_swap_exact_in(amount_in, token_in, token_out)
    }

    /// Input required to receive exactly `amount_out` of `token_out`.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`SwapPool::swap_exact_amount_out`](crate::traits::SwapPool::swap_exact_amount_out)
    /// up to the post-trade checks.
    pub fn amount_in(&self, amount_out: Decimal, token_out: &str, token_in: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_out)?;
        self.exchange.ensure_listed(token_in)?;
        if amount_out <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_swap_exact_out(amount_out, token_out, token_in)
    }

    /// Spot price of `quote` in units of `base`, fee included.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::spot_price`](crate::traits::SwapPool::spot_price).
    pub fn spot_price(&self, base: &str, quote: &str) -> Result<Decimal> {
        self.exchange.spot_price(base, quote)
    }

    /// Shares minted for depositing `amount_in` of `token_in`.
    ///
    /// On an unjoined pool this is the gross bootstrap amount, before the
    /// minimum shares are burned.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`LiquidityPool::join_swap_extern_amount_in`](crate::traits::LiquidityPool::join_swap_extern_amount_in)
    /// up to the mint reconciliation.
    pub fn shares_for_deposit(&self, amount_in: Decimal, token_in: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_in)?;
        if amount_in <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joinable(token_in)?;
        self.exchange.plan_join_extern_in(amount_in, token_in)
    }

    /// Deposit of `token_in` required to mint exactly `pool_out` shares.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`LiquidityPool::join_swap_pool_amount_out`](crate::traits::LiquidityPool::join_swap_pool_amount_out)
    /// up to the mint reconciliation.
    pub fn deposit_for_shares(&self, pool_out: Decimal, token_in: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_in)?;
        if pool_out <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_join_pool_out(pool_out, token_in)
    }

    /// Shares burned to withdraw exactly `amount_out` of `token_out`.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`LiquidityPool::exit_swap_extern_amount_out`](crate::traits::LiquidityPool::exit_swap_extern_amount_out)
    /// apart from the provider balance check.
    pub fn shares_for_withdrawal(&self, amount_out: Decimal, token_out: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_out)?;
        if amount_out <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_exit_extern_out(amount_out, token_out)
    }

    /// Amount of `token_out` withdrawn for burning exactly `pool_in`
    /// shares.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`LiquidityPool::exit_swap_pool_amount_in`](crate::traits::LiquidityPool::exit_swap_pool_amount_in)
    /// apart from the provider balance check.
    pub fn withdrawal_for_shares(&self, pool_in: Decimal, token_out: &str) -> Result<MathResult> {
        self.exchange.ensure_listed(token_out)?;
        if pool_in <= Decimal::ZERO {
            return Ok(MathResult::default());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_exit_pool_in(pool_in, token_out)
    }

    /// Basket paid out for burning `pool_in` shares, in pool order.
    ///
    /// # Errors
    ///
    /// Same as
    /// [`LiquidityPool::exit_pool`](crate::traits::LiquidityPool::exit_pool)
    /// apart from the provider balance check.
    pub fn basket_for_shares(&self, pool_in: Decimal) -> Result<Vec<TokenAmount>> {
        if pool_in <= Decimal::ZERO {
            return Ok(Vec::new());
        }
        self.exchange.ensure_joined()?;
        self.exchange.plan_exit_pool(pool_in)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Provider, Symbol, Token};
    use crate::error::AmmError;
    use crate::factory::ExchangeData;
    use crate::traits::{FromConfig, LiquidityPool};
    use crate::vault::Vault;
    use rust_decimal_macros::dec;

    fn pool(join: bool) -> Exchange {
        let Ok(vault) = Vault::from_tokens([
            Token::new("WETH", dec!(100), dec!(2)),
            Token::new("DAI", dec!(400), dec!(3)),
        ]) else {
            panic!("expected Ok");
        };
        let Ok(mut ex) = Exchange::from_config(&ExchangeData::new(vault, "WD", "0x01")) else {
            panic!("expected Ok");
        };
        if join {
            let Ok(()) = ex.join_pool(dec!(100), &Provider::new("alice")) else {
                panic!("expected Ok");
            };
        }
        ex
    }

    fn alice() -> Provider {
        Provider::new("alice")
    }

    #[test]
    fn amount_out_matches_swap() {
        let mut ex = pool(true);
        let Ok(q) = Quote::new(&ex).amount_out(dec!(7), "WETH", "DAI") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.swap_exact_amount_in(dec!(7), "WETH", "DAI", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);
    }

    #[test]
    fn amount_in_matches_swap() {
        let mut ex = pool(true);
        let Ok(q) = Quote::new(&ex).amount_in(dec!(20), "DAI", "WETH") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.swap_exact_amount_out(dec!(20), "DAI", "WETH", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);
    }

    #[test]
    fn join_quotes_match_operations() {
        let mut ex = pool(true);
        let Ok(q) = Quote::new(&ex).shares_for_deposit(dec!(5), "DAI") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.join_swap_extern_amount_in(dec!(5), "DAI", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);

        let Ok(q) = Quote::new(&ex).deposit_for_shares(dec!(3), "WETH") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.join_swap_pool_amount_out(dec!(3), "WETH", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);
    }

    #[test]
    fn exit_quotes_match_operations() {
        let mut ex = pool(true);
        let Ok(q) = Quote::new(&ex).shares_for_withdrawal(dec!(12), "DAI") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.exit_swap_extern_amount_out(dec!(12), "DAI", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);

        let Ok(q) = Quote::new(&ex).withdrawal_for_shares(dec!(4), "WETH") else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.exit_swap_pool_amount_in(dec!(4), "WETH", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);

        let Ok(q) = Quote::new(&ex).basket_for_shares(dec!(10)) else {
            panic!("expected Ok");
        };
        let Ok(r) = ex.exit_pool(dec!(10), &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);
    }

    #[test]
    fn non_positive_amounts_quote_zero() {
        let ex = pool(true);
        let quote = Quote::new(&ex);
        assert_eq!(quote.amount_out(Decimal::ZERO, "WETH", "DAI"), Ok(MathResult::default()));
        assert_eq!(quote.withdrawal_for_shares(dec!(-1), "DAI"), Ok(MathResult::default()));
        assert_eq!(quote.basket_for_shares(Decimal::ZERO), Ok(Vec::new()));
    }

    #[test]
    fn unknown_token_is_checked_before_the_zero_guard() {
        let ex = pool(true);
        assert_eq!(
            Quote::new(&ex).shares_for_withdrawal(Decimal::ZERO, "USDC"),
            Err(AmmError::TokenNotInPool(Symbol::new("USDC")))
        );
    }

    #[test]
    fn quotes_do_not_mutate() {
        let ex = pool(true);
        let before = ex.clone();
        let quote = Quote::new(&ex);
        let _ = quote.amount_out(dec!(10), "WETH", "DAI");
        let _ = quote.shares_for_deposit(dec!(10), "WETH");
        let _ = quote.basket_for_shares(dec!(50));
        assert_eq!(ex, before);
    }

    #[test]
    fn unjoined_pool_quotes_bootstrap_deposit_only() {
        let ex = pool(false);
        let quote = Quote::new(&ex);
        assert_eq!(
            quote.amount_out(dec!(1), "WETH", "DAI"),
            Err(AmmError::PoolNotJoined)
        );
        let Ok(q) = quote.shares_for_deposit(dec!(10), "WETH") else {
            panic!("expected Ok");
        };
        assert!(q.quantity() > Decimal::ZERO);

        let mut ex = ex;
        let Ok(r) = ex.join_swap_extern_amount_in(dec!(10), "WETH", &alice()) else {
            panic!("expected Ok");
        };
        assert_eq!(q, r);
    }

    #[test]
    fn spot_price_delegates() {
        let ex = pool(true);
        assert_eq!(Quote::new(&ex).spot_price("WETH", "DAI"), ex.spot_price("WETH", "DAI"));
    }
}
