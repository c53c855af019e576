//! Weighted pool state machine (Balancer V1 style).
//!
//! An [`Exchange`] owns a [`Vault`] and the mutable pool state that
//! mirrors it: reserves, the weights snapshot taken at join time, the
//! share ledger and the per-token fee tally.
//!
//! # Lifecycle
//!
//! ```text
//! Unjoined ──join_pool / first single-asset join──▶ Joined
//!    ▲                                                 │
//!    └────────── exit_pool drains the supply ──────────┘
//! ```
//!
//! # Validate, stage, commit
//!
//! Every operation:
//!
//! 1. prices the request with the bonding curves and checks the ratio
//!    bounds and caller limits against the current state;
//! 2. applies token transfers, mint/burn and reserve updates to a staged
//!    copy of the state;
//! 3. runs the post-conditions (mint reconciliation, realized swap input,
//!    balance-product invariant) on the staged copy;
//! 4. replaces the live state only if every check passed.
//!
//! A failed call therefore leaves the exchange exactly as it was.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use super::ShareLedger;
use crate::config::PoolConfig;
use crate::domain::{MathResult, Provider, Symbol, Token, TokenAmount};
use crate::error::{AmmError, Result};
use crate::factory::ExchangeData;
use crate::math::{weighted_invariant, BalancerPow, CheckedArithmetic, SingleAssetCurve, SwapCurve};
use crate::traits::{FromConfig, LiquidityPool, SwapPool};
use crate::vault::Vault;

/// A weighted constant-product pool over the tokens of one vault.
///
/// Created unjoined from an [`ExchangeData`] via [`FromConfig`], usually
/// by the [`ExchangeFactory`](crate::factory::ExchangeFactory).
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::{Provider, Token};
/// use weighted_amm::factory::ExchangeData;
/// use weighted_amm::pools::Exchange;
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
///
/// let alice = Provider::new("alice");
/// pool.join_pool(Decimal::ONE_HUNDRED, &alice).expect("join");
///
/// let res = pool
///     .swap_exact_amount_in(Decimal::TEN, "WETH", "DAI", &alice)
///     .expect("swap");
/// assert!(res.quantity() > Decimal::new(907, 2));
/// assert_eq!(res.fee(), Decimal::new(25, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    name: String,
    symbol: Symbol,
    address: String,
    config: PoolConfig,
    pow: BalancerPow,
    state: PoolState,
}

/// The mutable part of an exchange; cloned to stage an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PoolState {
    vault: Vault,
    reserves: IndexMap<Symbol, Decimal>,
    weights: IndexMap<Symbol, Decimal>,
    ledger: ShareLedger,
    collected_fees: IndexMap<Symbol, Decimal>,
    joined: bool,
}

impl PoolState {
    fn new(vault: Vault) -> Self {
        Self {
            vault,
            reserves: IndexMap::new(),
            weights: IndexMap::new(),
            ledger: ShareLedger::new(),
            collected_fees: IndexMap::new(),
            joined: false,
        }
    }

    /// Copies vault balances and normalized weights into the pool state.
    fn snapshot(&mut self) -> Result<()> {
        let mut reserves = IndexMap::with_capacity(self.vault.len());
        let mut weights = IndexMap::with_capacity(self.vault.len());
        for token in self.vault.tokens() {
            let symbol = token.symbol();
            reserves.insert(symbol.clone(), token.balance());
            weights.insert(symbol.clone(), self.vault.normalized_weight(symbol.as_str())?);
        }
        self.reserves = reserves;
        self.weights = weights;
        Ok(())
    }

    fn reserve(&self, symbol: &str) -> Result<Decimal> {
        self.reserves
            .get(symbol)
            .copied()
            .ok_or_else(|| AmmError::TokenNotInPool(Symbol::new(symbol)))
    }

    /// Overwrites the mirrored reserve of `symbol` with its vault balance.
    fn update(&mut self, symbol: &str) -> Result<()> {
        let balance = self.vault.balance(symbol)?;
        let reserve = self
            .reserves
            .get_mut(symbol)
            .ok_or_else(|| AmmError::TokenNotInPool(Symbol::new(symbol)))?;
        *reserve = balance;
        Ok(())
    }

    fn tally_fee(&mut self, symbol: &str, fee: Decimal) -> Result<()> {
        let tally = self
            .collected_fees
            .entry(Symbol::new(symbol))
            .or_insert(Decimal::ZERO);
        *tally = tally.safe_add(&fee)?;
        Ok(())
    }

    /// Checks that the vault balance grew by `amount` since the last
    /// reserve update, compared at `dp` decimal places.
    fn reconcile_deposit(&self, symbol: &str, amount: Decimal, dp: u32) -> Result<()> {
        let balance = self.vault.balance(symbol)?;
        let reserve = self.reserve(symbol)?;
        let observed = balance
            .checked_sub(reserve)
            .ok_or(AmmError::Overflow("balance delta overflow"))?;
        if observed.round_dp(dp) != amount.round_dp(dp) {
            warn!(token = symbol, expected = %amount, observed = %observed, "mint reconciliation failed");
            return Err(AmmError::MintReconciliation {
                expected: amount,
                observed,
            });
        }
        Ok(())
    }
}

impl Exchange {
    // -- accessors ------------------------------------------------------------

    /// Returns the token-set name, e.g. `"WETH-DAI"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pool share symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the pool address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the configuration captured at creation.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the power function the curves are evaluated with.
    #[must_use]
    pub const fn power(&self) -> &BalancerPow {
        &self.pow
    }

    /// Returns the token vault.
    #[must_use]
    pub const fn vault(&self) -> &Vault {
        &self.state.vault
    }

    /// Returns the token vault for external deposits and transfers.
    ///
    /// Balance changes made here are not mirrored into the reserves; the
    /// next deposit or swap that touches an affected token detects the
    /// drift and is rejected.
    pub fn vault_mut(&mut self) -> &mut Vault {
        &mut self.state.vault
    }

    /// Returns `true` once the pool holds liquidity.
    #[must_use]
    pub const fn is_joined(&self) -> bool {
        self.state.joined
    }

    /// Returns the mirrored reserves in pool order.
    #[must_use]
    pub const fn reserves(&self) -> &IndexMap<Symbol, Decimal> {
        &self.state.reserves
    }

    /// Returns the mirrored reserve of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TokenNotInPool`] if the pool has no reserve for
    /// `symbol`.
    pub fn reserve(&self, symbol: &str) -> Result<Decimal> {
        self.state.reserve(symbol)
    }

    /// Returns the normalized weights snapshotted at join time.
    #[must_use]
    pub const fn weights(&self) -> &IndexMap<Symbol, Decimal> {
        &self.state.weights
    }

    /// Returns the share ledger.
    #[must_use]
    pub const fn ledger(&self) -> &ShareLedger {
        &self.state.ledger
    }

    /// Returns the share balance of `provider`.
    #[must_use]
    pub fn provider_shares(&self, provider: &str) -> Decimal {
        self.state.ledger.balance_of(provider)
    }

    /// Returns the amount of the most recent share mint.
    #[must_use]
    pub const fn last_pool_deposit(&self) -> Decimal {
        self.state.ledger.last_mint()
    }

    /// Returns the cumulative fees per token.
    #[must_use]
    pub const fn collected_fees(&self) -> &IndexMap<Symbol, Decimal> {
        &self.state.collected_fees
    }

    /// Returns the cumulative fee collected in `symbol`.
    #[must_use]
    pub fn collected_fee(&self, symbol: &str) -> Decimal {
        self.state
            .collected_fees
            .get(symbol)
            .copied()
            .unwrap_or_default()
    }

    /// Spot price of `quote` in units of `base`, without the fee.
    ///
    /// # Errors
    ///
    /// Same as [`SwapPool::spot_price`].
    pub fn spot_price_sans_fee(&self, base: &str, quote: &str) -> Result<Decimal> {
        self.swap_curve(base, quote)?.spot_price_sans_fee()
    }

    /// Weighted geometric mean of the reserves, `∏ Bᵢ ^ wᵢ`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotJoined`] if the pool is unjoined.
    /// - [`AmmError::Overflow`] if the value is not representable.
    pub fn invariant(&self) -> Result<Decimal> {
        self.ensure_joined()?;
        let weights = &self.state.weights;
        weighted_invariant(self.state.reserves.iter().filter_map(|(symbol, reserve)| {
            weights
                .get(symbol)
                .filter(|w| !w.is_zero())
                .map(|w| (*reserve, *w))
        }))
    }

    // -- pricing --------------------------------------------------------------

    pub(crate) fn ensure_joined(&self) -> Result<()> {
        if self.state.joined {
            Ok(())
        } else {
            Err(AmmError::PoolNotJoined)
        }
    }

    fn ensure_amount(amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AmmError::InvalidQuantity("amount must not be negative"));
        }
        Ok(())
    }

    fn ensure_withdrawable(provider: &Provider) -> Result<()> {
        if provider.is_null() {
            return Err(AmmError::InsufficientShares(
                "null provider shares are locked",
            ));
        }
        Ok(())
    }

    /// Fails with [`AmmError::TokenNotInPool`] unless `symbol` is in the
    /// vault.
    pub(crate) fn ensure_listed(&self, symbol: &str) -> Result<()> {
        self.state.vault.token(symbol).map(|_| ())
    }

    fn bound_token(&self, symbol: &str) -> Result<&Token> {
        let token = self.state.vault.token(symbol)?;
        if !token.is_bound() {
            return Err(AmmError::InvalidToken("token is not bound"));
        }
        Ok(token)
    }

    /// Share supply the single-asset curve is priced against: the live
    /// supply, or the initial supply while the pool is unjoined.
    fn pricing_supply(&self) -> Decimal {
        if self.state.joined {
            self.state.ledger.total()
        } else {
            self.config.init_pool_supply()
        }
    }

    fn swap_curve(&self, token_in: &str, token_out: &str) -> Result<SwapCurve> {
        if token_in == token_out {
            return Err(AmmError::InvalidToken("cannot swap a token for itself"));
        }
        let t_in = self.bound_token(token_in)?;
        let t_out = self.bound_token(token_out)?;
        Ok(SwapCurve {
            balance_in: t_in.balance(),
            weight_in: t_in.denorm_weight(),
            balance_out: t_out.balance(),
            weight_out: t_out.denorm_weight(),
            swap_fee: self.config.swap_fee(),
        })
    }

    fn single_curve(&self, symbol: &str) -> Result<SingleAssetCurve> {
        let token = self.bound_token(symbol)?;
        Ok(SingleAssetCurve {
            balance: token.balance(),
            weight: token.denorm_weight(),
            pool_supply: self.pricing_supply(),
            total_weight: self.state.vault.total_denorm_weight(),
            swap_fee: self.config.swap_fee(),
            exit_fee: self.config.exit_fee(),
        })
    }

    fn max_in(&self, balance: Decimal) -> Result<Decimal> {
        balance.safe_mul(&self.config.max_in_ratio())
    }

    fn max_out(&self, balance: Decimal) -> Result<Decimal> {
        balance.safe_mul(&self.config.max_out_ratio())
    }

    pub(crate) fn plan_swap_exact_in(
        &self,
        amount_in: Decimal,
        token_in: &str,
        token_out: &str,
    ) -> Result<MathResult> {
        let curve = self.swap_curve(token_in, token_out)?;
        if amount_in > self.max_in(curve.balance_in)? {
            return Err(AmmError::RatioExceeded("swap input exceeds max in ratio"));
        }
        curve.out_given_in(amount_in, &self.pow)
    }

    pub(crate) fn plan_swap_exact_out(
        &self,
        amount_out: Decimal,
        token_out: &str,
        token_in: &str,
    ) -> Result<MathResult> {
        let curve = self.swap_curve(token_in, token_out)?;
        if amount_out >= self.max_out(curve.balance_out)? {
            return Err(AmmError::RatioExceeded("swap output exceeds max out ratio"));
        }
        let res = curve.in_given_out(amount_out, &self.pow)?;
        if res.quantity() > self.max_in(curve.balance_in)? {
            return Err(AmmError::RatioExceeded("swap input exceeds max in ratio"));
        }
        Ok(res)
    }

    pub(crate) fn plan_join_extern_in(&self, amount_in: Decimal, token_in: &str) -> Result<MathResult> {
        let curve = self.single_curve(token_in)?;
        if amount_in > self.max_in(curve.balance)? {
            return Err(AmmError::RatioExceeded("deposit exceeds max in ratio"));
        }
        curve.pool_out_given_single_in(amount_in, &self.pow)
    }

    pub(crate) fn plan_join_pool_out(&self, pool_out: Decimal, token_in: &str) -> Result<MathResult> {
        let curve = self.single_curve(token_in)?;
        let res = curve.single_in_given_pool_out(pool_out, &self.pow)?;
        if res.quantity() > self.max_in(curve.balance)? {
            return Err(AmmError::RatioExceeded("deposit exceeds max in ratio"));
        }
        Ok(res)
    }

    pub(crate) fn plan_exit_extern_out(
        &self,
        amount_out: Decimal,
        token_out: &str,
    ) -> Result<MathResult> {
        let curve = self.single_curve(token_out)?;
        if amount_out >= self.max_out(curve.balance)? {
            return Err(AmmError::RatioExceeded("withdrawal exceeds max out ratio"));
        }
        curve.pool_in_given_single_out(amount_out, &self.pow)
    }

    pub(crate) fn plan_exit_pool_in(&self, pool_in: Decimal, token_out: &str) -> Result<MathResult> {
        let curve = self.single_curve(token_out)?;
        if pool_in >= self.max_out(curve.pool_supply)? {
            return Err(AmmError::RatioExceeded("shares in exceed max out ratio"));
        }
        let res = curve.single_out_given_pool_in(pool_in, &self.pow)?;
        if res.quantity() >= self.max_out(curve.balance)? {
            return Err(AmmError::RatioExceeded("withdrawal exceeds max out ratio"));
        }
        Ok(res)
    }

    /// Token amounts paid out for burning `pool_in` shares, in pool order.
    /// Unbound tokens with an empty reserve are left out of the basket.
    pub(crate) fn plan_exit_pool(&self, pool_in: Decimal) -> Result<Vec<TokenAmount>> {
        let total = self.state.ledger.total();
        if pool_in > total {
            return Err(AmmError::InsufficientShares(
                "amount exceeds the pool share supply",
            ));
        }
        let net = pool_in.safe_sub(&pool_in.safe_mul(&self.config.exit_fee())?)?;
        let ratio = net.safe_div(&total)?;
        let vault = &self.state.vault;
        self.state
            .reserves
            .iter()
            .filter(|(symbol, reserve)| {
                !reserve.is_zero() || vault.token(symbol.as_str()).is_ok_and(Token::is_bound)
            })
            .map(|(symbol, reserve)| {
                let amount = ratio.safe_mul(reserve)?;
                if amount.is_zero() {
                    return Err(AmmError::MathExitError("token amount out is zero"));
                }
                Ok(TokenAmount::new(symbol.clone(), amount))
            })
            .collect()
    }

    // -- execution ------------------------------------------------------------

    fn commit(&mut self, staged: PoolState) {
        trace!(
            pool = %self.symbol,
            total_shares = %staged.ledger.total(),
            joined = staged.joined,
            reserves = ?staged.reserves,
            "commit staged state"
        );
        self.state = staged;
    }

    /// Fails unless the realized input is positive and the post-trade
    /// balance product matches the reserves adjusted by the trade.
    fn check_swap(
        &self,
        staged: &PoolState,
        token_in: &str,
        token_out: &str,
        amount_out: Decimal,
    ) -> Result<()> {
        let res_in = staged.reserve(token_in)?;
        let res_out = staged.reserve(token_out)?;
        let new_in = staged.vault.balance(token_in)?;
        let new_out = staged.vault.balance(token_out)?;

        let realized_in = if new_in > res_in {
            new_in.safe_sub(&res_in)?
        } else {
            Decimal::ZERO
        };
        if realized_in.is_zero() {
            warn!(pool = %self.symbol, token_in, "swap realized no input");
            return Err(AmmError::InsufficientInput);
        }

        // (Ri + ΔIi)·(Ro − Ao) == Bi'·Bo', compared as ratios so large
        // reserves never form the raw product.
        let dp = self.config.invariant_decimals();
        let before = res_out
            .safe_sub(&amount_out)?
            .safe_div(&new_out)?
            .round_dp(dp);
        let after = new_in
            .safe_div(&res_in.safe_add(&realized_in)?)?
            .round_dp(dp);
        if before != after {
            warn!(pool = %self.symbol, %before, %after, "swap broke the balance invariant");
            return Err(AmmError::InvariantViolation { before, after });
        }
        Ok(())
    }

    fn stage_swap(
        &self,
        token_in: &str,
        amount_in: Decimal,
        token_out: &str,
        amount_out: Decimal,
        fee: Decimal,
    ) -> Result<PoolState> {
        let mut staged = self.state.clone();
        staged.vault.deposit(token_in, amount_in)?;
        staged.vault.transfer(token_out, amount_out)?;
        self.check_swap(&staged, token_in, token_out, amount_out)?;
        staged.update(token_in)?;
        staged.update(token_out)?;
        staged.tally_fee(token_in, fee)?;
        Ok(staged)
    }

    pub(crate) fn execute_swap_exact_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        token_out: &str,
        min_amount_out: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.ensure_joined()?;
        Self::ensure_amount(amount_in)?;
        let res = self.plan_swap_exact_in(amount_in, token_in, token_out)?;
        if min_amount_out.is_some_and(|min| res.quantity() < min) {
            return Err(AmmError::InsufficientOutput);
        }

        let staged = self.stage_swap(token_in, amount_in, token_out, res.quantity(), res.fee())?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_in,
            token_out,
            amount_in = %amount_in,
            amount_out = %res.quantity(),
            fee = %res.fee(),
            "swap exact amount in"
        );
        Ok(res)
    }

    pub(crate) fn execute_swap_exact_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        token_in: &str,
        max_amount_in: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.ensure_joined()?;
        Self::ensure_amount(amount_out)?;
        let res = self.plan_swap_exact_out(amount_out, token_out, token_in)?;
        if max_amount_in.is_some_and(|max| res.quantity() > max) {
            return Err(AmmError::LimitIn);
        }

        let staged = self.stage_swap(token_in, res.quantity(), token_out, amount_out, res.fee())?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_in,
            token_out,
            amount_in = %res.quantity(),
            amount_out = %amount_out,
            fee = %res.fee(),
            "swap exact amount out"
        );
        Ok(res)
    }

    /// Checks that an unjoined pool can be seeded from its vault.
    fn ensure_bootstrappable(&self) -> Result<()> {
        self.state.vault.validate(&self.config)?;
        if self
            .state
            .vault
            .bound_tokens()
            .any(|t| t.balance() < self.config.min_balance())
        {
            return Err(AmmError::InvalidQuantity(
                "bound token balance below min balance",
            ));
        }
        Ok(())
    }

    /// A single-asset deposit into an unjoined pool seeds it, so the vault
    /// must be bootstrappable.
    pub(crate) fn ensure_joinable(&self, token_in: &str) -> Result<()> {
        if !self.state.joined {
            self.bound_token(token_in)?;
            self.ensure_bootstrappable()?;
        }
        Ok(())
    }

    /// Deposits `amount_in`, reconciles it and mints `shares` to
    /// `provider`, burning the minimum shares when seeding the pool.
    fn stage_join(
        &self,
        token_in: &str,
        amount_in: Decimal,
        shares: Decimal,
        fee: Decimal,
        provider: &Provider,
    ) -> Result<PoolState> {
        let mut staged = self.state.clone();
        let bootstrap = !staged.joined;
        if bootstrap {
            staged.snapshot()?;
        }
        staged.vault.deposit(token_in, amount_in)?;
        staged.reconcile_deposit(token_in, amount_in, self.config.invariant_decimals())?;

        let mut minted = shares;
        if bootstrap {
            let minimum = self.config.minimum_shares();
            if minted <= minimum {
                return Err(AmmError::MathExitError(
                    "first mint does not cover the minimum shares",
                ));
            }
            staged.ledger.mint(&Provider::null(), minimum)?;
            minted = minted.safe_sub(&minimum)?;
        }
        staged.ledger.mint(provider, minted)?;
        staged.update(token_in)?;
        staged.tally_fee(token_in, fee)?;
        staged.joined = true;
        Ok(staged)
    }

    pub(crate) fn execute_join_extern_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        min_pool_out: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        Self::ensure_amount(amount_in)?;
        self.ensure_joinable(token_in)?;
        let res = self.plan_join_extern_in(amount_in, token_in)?;
        if min_pool_out.is_some_and(|min| res.quantity() < min) {
            return Err(AmmError::InsufficientOutput);
        }

        let staged = self.stage_join(token_in, amount_in, res.quantity(), res.fee(), provider)?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_in,
            amount_in = %amount_in,
            pool_out = %res.quantity(),
            fee = %res.fee(),
            "join swap extern amount in"
        );
        Ok(res)
    }

    pub(crate) fn execute_join_pool_out(
        &mut self,
        pool_out: Decimal,
        token_in: &str,
        max_amount_in: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.ensure_joined()?;
        Self::ensure_amount(pool_out)?;
        let res = self.plan_join_pool_out(pool_out, token_in)?;
        if max_amount_in.is_some_and(|max| res.quantity() > max) {
            return Err(AmmError::LimitIn);
        }

        let staged = self.stage_join(token_in, res.quantity(), pool_out, res.fee(), provider)?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_in,
            amount_in = %res.quantity(),
            pool_out = %pool_out,
            fee = %res.fee(),
            "join swap pool amount out"
        );
        Ok(res)
    }

    /// Burns `shares` from `provider` and transfers `amount_out` of
    /// `token_out` out of the pool.
    fn stage_exit(
        &self,
        token_out: &str,
        amount_out: Decimal,
        shares: Decimal,
        fee: Decimal,
        provider: &Provider,
    ) -> Result<PoolState> {
        let mut staged = self.state.clone();
        staged
            .ledger
            .burn(provider, shares, self.config.exit_fee())?;
        staged.vault.transfer(token_out, amount_out)?;
        staged.update(token_out)?;
        staged.tally_fee(token_out, fee)?;
        Ok(staged)
    }

    pub(crate) fn execute_exit_extern_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        max_pool_in: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.ensure_joined()?;
        Self::ensure_amount(amount_out)?;
        Self::ensure_withdrawable(provider)?;
        let res = self.plan_exit_extern_out(amount_out, token_out)?;
        if max_pool_in.is_some_and(|max| res.quantity() > max) {
            return Err(AmmError::LimitIn);
        }

        let staged = self.stage_exit(token_out, amount_out, res.quantity(), res.fee(), provider)?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_out,
            amount_out = %amount_out,
            pool_in = %res.quantity(),
            fee = %res.fee(),
            "exit swap extern amount out"
        );
        Ok(res)
    }

    pub(crate) fn execute_exit_pool_in(
        &mut self,
        pool_in: Decimal,
        token_out: &str,
        min_amount_out: Option<Decimal>,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.ensure_joined()?;
        Self::ensure_amount(pool_in)?;
        Self::ensure_withdrawable(provider)?;
        let res = self.plan_exit_pool_in(pool_in, token_out)?;
        if min_amount_out.is_some_and(|min| res.quantity() < min) {
            return Err(AmmError::InsufficientOutput);
        }

        let staged = self.stage_exit(token_out, res.quantity(), pool_in, res.fee(), provider)?;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            token_out,
            amount_out = %res.quantity(),
            pool_in = %pool_in,
            fee = %res.fee(),
            "exit swap pool amount in"
        );
        Ok(res)
    }

    pub(crate) fn execute_exit_pool(
        &mut self,
        pool_in: Decimal,
        provider: &Provider,
    ) -> Result<Vec<TokenAmount>> {
        self.ensure_joined()?;
        Self::ensure_amount(pool_in)?;
        Self::ensure_withdrawable(provider)?;
        let amounts = self.plan_exit_pool(pool_in)?;

        let mut staged = self.state.clone();
        staged
            .ledger
            .burn(provider, pool_in, self.config.exit_fee())?;
        for out in &amounts {
            let symbol = out.symbol().as_str();
            staged.vault.transfer(symbol, out.amount())?;
            staged.update(symbol)?;
        }
        if staged.ledger.total().is_zero() {
            staged.joined = false;
        }
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            pool_in = %pool_in,
            joined = self.state.joined,
            "exit pool"
        );
        Ok(amounts)
    }

    pub(crate) fn execute_join_pool(
        &mut self,
        initial_shares: Decimal,
        provider: &Provider,
    ) -> Result<()> {
        if self.state.joined {
            return Err(AmmError::PoolAlreadyJoined);
        }
        if initial_shares <= Decimal::ZERO {
            return Err(AmmError::InvalidQuantity("initial shares must be positive"));
        }
        self.ensure_bootstrappable()?;

        let mut staged = self.state.clone();
        staged.snapshot()?;
        staged.ledger.mint(provider, initial_shares)?;
        staged.joined = true;
        self.commit(staged);
        debug!(
            pool = %self.symbol,
            provider = %provider,
            shares = %initial_shares,
            "join pool"
        );
        Ok(())
    }
}

impl FromConfig<ExchangeData> for Exchange {
    /// Creates an unjoined exchange.
    ///
    /// # Errors
    ///
    /// - Propagates any error from [`PoolConfig::validate`].
    /// - Propagates any error from [`Vault::validate`].
    fn from_config(data: &ExchangeData) -> Result<Self> {
        let config = data.config().clone();
        config.validate()?;
        data.vault().validate(&config)?;
        Ok(Self {
            name: data.name(),
            symbol: data.symbol().clone(),
            address: data.address().to_owned(),
            pow: config.power(),
            config,
            state: PoolState::new(data.vault().clone()),
        })
    }
}

impl SwapPool for Exchange {
    fn swap_exact_amount_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_swap_exact_in(amount_in, token_in, token_out, None, provider)
    }

    fn swap_exact_amount_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_swap_exact_out(amount_out, token_out, token_in, None, provider)
    }

    /// Returns `(Bb / Wb) / (Bq / Wq) / (1 − f)` over the vault balances.
    fn spot_price(&self, base: &str, quote: &str) -> Result<Decimal> {
        self.swap_curve(base, quote)?.spot_price()
    }

    fn swap_fee(&self) -> Decimal {
        self.config.swap_fee()
    }
}

impl LiquidityPool for Exchange {
    fn join_pool(&mut self, initial_shares: Decimal, provider: &Provider) -> Result<()> {
        self.execute_join_pool(initial_shares, provider)
    }

    fn join_swap_extern_amount_in(
        &mut self,
        amount_in: Decimal,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_join_extern_in(amount_in, token_in, None, provider)
    }

    fn join_swap_pool_amount_out(
        &mut self,
        pool_out: Decimal,
        token_in: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_join_pool_out(pool_out, token_in, None, provider)
    }

    fn exit_swap_extern_amount_out(
        &mut self,
        amount_out: Decimal,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_exit_extern_out(amount_out, token_out, None, provider)
    }

    fn exit_swap_pool_amount_in(
        &mut self,
        pool_in: Decimal,
        token_out: &str,
        provider: &Provider,
    ) -> Result<MathResult> {
        self.execute_exit_pool_in(pool_in, token_out, None, provider)
    }

    fn exit_pool(&mut self, pool_in: Decimal, provider: &Provider) -> Result<Vec<TokenAmount>> {
        self.execute_exit_pool(pool_in, provider)
    }

    fn total_shares(&self) -> Decimal {
        self.state.ledger.total()
    }
}
