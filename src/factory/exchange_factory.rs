//! Registry that deploys and indexes exchanges.

use indexmap::IndexMap;
use tracing::info;

use super::ExchangeData;
use crate::domain::Symbol;
use crate::error::{AmmError, Result};
use crate::pools::Exchange;
use crate::traits::FromConfig;
use crate::vault::Vault;

/// Deploys at most one [`Exchange`] per pool symbol and per token set.
///
/// Exchanges are indexed both by their share symbol and by the token-set
/// name of their vault (symbols joined by `-`, in vault order).
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::Token;
/// use weighted_amm::factory::{ExchangeData, ExchangeFactory};
/// use weighted_amm::vault::Vault;
///
/// let vault = Vault::from_tokens([
///     Token::new("WETH", Decimal::TEN, Decimal::ONE),
///     Token::new("DAI", Decimal::ONE_HUNDRED, Decimal::ONE),
/// ])
/// .expect("distinct symbols");
///
/// let mut factory = ExchangeFactory::new("pool factory", "0x00");
/// factory
///     .deploy(ExchangeData::new(vault, "WD", "0x01"))
///     .expect("first deployment");
///
/// assert!(factory.get_exchange("WETH-DAI").is_some());
/// assert!(factory.exchange("WD").is_some());
/// assert_eq!(factory.exchange_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExchangeFactory {
    name: String,
    address: String,
    exchanges: IndexMap<Symbol, Exchange>,
    by_token_set: IndexMap<String, Symbol>,
}

impl ExchangeFactory {
    /// Creates an empty factory.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            exchanges: IndexMap::new(),
            by_token_set: IndexMap::new(),
        }
    }

    /// Returns the factory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the factory address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Builds an unjoined exchange from `data` and registers it.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ExchangeAlreadyCreated`] if an exchange already uses
    ///   the symbol or the token set.
    /// - Any error from [`Exchange::from_config`].
    pub fn deploy(&mut self, data: ExchangeData) -> Result<&mut Exchange> {
        let symbol = data.symbol().clone();
        let token_set = data.name();
        if self.exchanges.contains_key(&symbol) {
            return Err(AmmError::ExchangeAlreadyCreated(symbol.to_string()));
        }
        if self.by_token_set.contains_key(&token_set) {
            return Err(AmmError::ExchangeAlreadyCreated(token_set));
        }

        let exchange = Exchange::from_config(&data)?;
        info!(
            factory = %self.name,
            pool = %symbol,
            tokens = %token_set,
            address = exchange.address(),
            "exchange deployed"
        );
        self.by_token_set.insert(token_set, symbol.clone());
        Ok(self.exchanges.entry(symbol).or_insert(exchange))
    }

    /// Looks an exchange up by the token-set name of its vault.
    #[must_use]
    pub fn get_exchange(&self, token_set: &str) -> Option<&Exchange> {
        self.by_token_set
            .get(token_set)
            .and_then(|symbol| self.exchanges.get(symbol))
    }

    /// Mutable variant of [`get_exchange`](Self::get_exchange).
    pub fn get_exchange_mut(&mut self, token_set: &str) -> Option<&mut Exchange> {
        let symbol = self.by_token_set.get(token_set)?;
        self.exchanges.get_mut(symbol)
    }

    /// Looks an exchange up by its pool share symbol.
    #[must_use]
    pub fn exchange(&self, symbol: &str) -> Option<&Exchange> {
        self.exchanges.get(symbol)
    }

    /// Mutable variant of [`exchange`](Self::exchange).
    pub fn exchange_mut(&mut self, symbol: &str) -> Option<&mut Exchange> {
        self.exchanges.get_mut(symbol)
    }

    /// Returns the token map of the exchange deployed under `symbol`.
    #[must_use]
    pub fn tokens_of(&self, symbol: &str) -> Option<&Vault> {
        self.exchanges.get(symbol).map(Exchange::vault)
    }

    /// Iterates over the deployed exchanges in deployment order.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.values()
    }

    /// Returns the number of deployed exchanges.
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }
}
