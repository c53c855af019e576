//! Token registry of a single pool.
//!
//! The [`Vault`] is an ordered, duplicate-free collection of
//! [`Token`]s keyed by [`Symbol`].  Insertion order is the pool's token
//! order: it determines the token-set name the factory indexes pools
//! by and the order in which a full exit walks the reserves.
//!
//! The vault knows nothing about fees or curves.  It derives the active
//! weight sum and normalized weights on demand and exposes the
//! deposit/transfer primitives that move token balances.

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::config::PoolConfig;
use crate::domain::{Symbol, Token};
use crate::error::{AmmError, Result};
use crate::math::CheckedArithmetic;

/// Ordered registry of the tokens held by one pool.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::Token;
/// use weighted_amm::vault::Vault;
///
/// let mut vault = Vault::new();
/// vault.add_token(Token::new("WETH", Decimal::TEN, Decimal::from(8))).expect("add");
/// vault.add_token(Token::new("DAI", Decimal::from(1000), Decimal::TWO)).expect("add");
///
/// assert_eq!(vault.name(), "WETH-DAI");
/// assert_eq!(vault.total_denorm_weight(), Decimal::TEN);
/// assert_eq!(vault.normalized_weight("WETH").expect("weth"), Decimal::new(8, 1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vault {
    tokens: IndexMap<Symbol, Token>,
}

impl Vault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vault holding `tokens` in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DuplicateToken`] if a symbol repeats.
    pub fn from_tokens<I>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut vault = Self::new();
        for token in tokens {
            vault.add_token(token)?;
        }
        Ok(vault)
    }

    /// Registers a token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DuplicateToken`] if the symbol is already
    /// registered; the vault is left unchanged.
    pub fn add_token(&mut self, token: Token) -> Result<()> {
        if self.tokens.contains_key(token.symbol()) {
            return Err(AmmError::DuplicateToken(token.symbol().clone()));
        }
        self.tokens.insert(token.symbol().clone(), token);
        Ok(())
    }

    /// Returns `true` if `symbol` is registered.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.tokens.contains_key(symbol)
    }

    /// Looks up a token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    pub fn token(&self, symbol: &str) -> Result<&Token> {
        self.tokens
            .get(symbol)
            .ok_or_else(|| AmmError::TokenNotInPool(Symbol::new(symbol)))
    }

    /// Looks up a token for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    pub fn token_mut(&mut self, symbol: &str) -> Result<&mut Token> {
        self.tokens
            .get_mut(symbol)
            .ok_or_else(|| AmmError::TokenNotInPool(Symbol::new(symbol)))
    }

    /// Returns the balance of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    pub fn balance(&self, symbol: &str) -> Result<Decimal> {
        self.token(symbol).map(Token::balance)
    }

    /// Returns the denormalized weight of `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    pub fn denorm_weight(&self, symbol: &str) -> Result<Decimal> {
        self.token(symbol).map(Token::denorm_weight)
    }

    /// Sum of the denormalized weights of all bound tokens.
    #[must_use]
    pub fn total_denorm_weight(&self) -> Decimal {
        self.bound_tokens()
            .map(Token::denorm_weight)
            .fold(Decimal::ZERO, |acc, w| acc.saturating_add(w))
    }

    /// Weight of `symbol` relative to the active weight sum.  Unbound
    /// tokens have a normalized weight of zero.
    ///
    /// # Errors
    ///
    /// - [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    /// - [`AmmError::DivisionByZero`] if no token is bound.
    pub fn normalized_weight(&self, symbol: &str) -> Result<Decimal> {
        let token = self.token(symbol)?;
        if !token.is_bound() {
            return Ok(Decimal::ZERO);
        }
        token.denorm_weight().safe_div(&self.total_denorm_weight())
    }

    /// Adds `amount` to the balance of `symbol`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    /// - Propagates [`Token::deposit`] errors.
    pub fn deposit(&mut self, symbol: &str, amount: Decimal) -> Result<()> {
        self.token_mut(symbol)?.deposit(amount)
    }

    /// Removes `amount` from the balance of `symbol`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::TokenNotInPool`] if `symbol` is not registered.
    /// - Propagates [`Token::transfer`] errors.
    pub fn transfer(&mut self, symbol: &str, amount: Decimal) -> Result<()> {
        self.token_mut(symbol)?.transfer(amount)
    }

    /// Iterates over the tokens in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Iterates over the bound tokens in registration order.
    pub fn bound_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values().filter(|t| t.is_bound())
    }

    /// Iterates over the symbols in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.tokens.keys()
    }

    /// Number of registered tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if no token is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token-set identity: symbols joined by `-`, e.g. `"WETH-DAI"`.
    #[must_use]
    pub fn name(&self) -> String {
        self.join_symbols("-")
    }

    /// Trading-pair notation: symbols joined by `/`, e.g. `"WETH/DAI"`.
    #[must_use]
    pub fn coins(&self) -> String {
        self.join_symbols("/")
    }

    fn join_symbols(&self, sep: &str) -> String {
        self.symbols()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Checks the vault against the pool's token-count and weight bounds.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if the number of bound tokens
    ///   is outside `[min_bound_tokens, max_bound_tokens]`.
    /// - [`AmmError::InvalidWeight`] if a bound weight is outside
    ///   `[min_weight, max_weight]` or the total exceeds
    ///   `max_total_weight`.
    pub fn validate(&self, config: &PoolConfig) -> Result<()> {
        let bound = self.bound_tokens().count();
        if bound < config.min_bound_tokens() || bound > config.max_bound_tokens() {
            return Err(AmmError::InvalidConfiguration(
                "bound token count outside the configured limits",
            ));
        }
        for token in self.bound_tokens() {
            let w = token.denorm_weight();
            if w < config.min_weight() || w > config.max_weight() {
                return Err(AmmError::InvalidWeight(
                    "token weight outside [min_weight, max_weight]",
                ));
            }
        }
        let total = self
            .bound_tokens()
            .try_fold(Decimal::ZERO, |acc, t| acc.safe_add(&t.denorm_weight()))?;
        if total > config.max_total_weight() {
            return Err(AmmError::InvalidWeight("total weight exceeds max_total_weight"));
        }
        Ok(())
    }
}
