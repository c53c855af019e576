//! Description of an exchange to deploy.

use crate::config::PoolConfig;
use crate::domain::Symbol;
use crate::vault::Vault;

/// Everything needed to build an [`Exchange`](crate::pools::Exchange):
/// the token vault, the pool's share symbol and address, and its
/// configuration.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use weighted_amm::domain::Token;
/// use weighted_amm::factory::ExchangeData;
/// use weighted_amm::vault::Vault;
///
/// let vault = Vault::from_tokens([
///     Token::new("WETH", Decimal::TEN, Decimal::ONE),
///     Token::new("DAI", Decimal::ONE_HUNDRED, Decimal::ONE),
/// ])
/// .expect("distinct symbols");
/// let data = ExchangeData::new(vault, "WETH-DAI-LP", "0x01");
/// assert_eq!(data.name(), "WETH-DAI");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExchangeData {
    vault: Vault,
    symbol: Symbol,
    address: String,
    #[cfg_attr(feature = "serde", serde(default))]
    config: PoolConfig,
}

impl ExchangeData {
    /// Describes an exchange with the default configuration.
    #[must_use]
    pub fn new(vault: Vault, symbol: impl Into<Symbol>, address: impl Into<String>) -> Self {
        Self {
            vault,
            symbol: symbol.into(),
            address: address.into(),
            config: PoolConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the token-set name of the vault.
    #[must_use]
    pub fn name(&self) -> String {
        self.vault.name()
    }

    /// Returns the vault.
    #[must_use]
    pub const fn vault(&self) -> &Vault {
        &self.vault
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

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }
}
