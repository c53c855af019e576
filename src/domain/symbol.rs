//! Token symbol and liquidity-provider identities.

use core::borrow::Borrow;
use core::fmt;

/// The identity of a token inside a pool, e.g. `"WETH"`.
///
/// Symbols are compared byte-for-byte; `"weth"` and `"WETH"` are distinct
/// tokens.  `Symbol` borrows as `str`, so symbol-keyed maps can be queried
/// with plain string slices.
///
/// # Examples
///
/// ```
/// use weighted_amm::domain::Symbol;
///
/// let sym = Symbol::new("WETH");
/// assert_eq!(sym.as_str(), "WETH");
/// assert_eq!(sym, Symbol::from("WETH"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from any string-like value.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// An account that holds pool shares.
///
/// The null provider (`"0"`) is the sink for the minimum shares burned on
/// the first mint and for exit-fee shares; nobody can withdraw from it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Provider(String);

impl Provider {
    const NULL: &'static str = "0";

    /// Creates a provider from any string-like account name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the null account.
    #[must_use]
    pub fn null() -> Self {
        Self(Self::NULL.to_owned())
    }

    /// Returns `true` for the null account.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL
    }

    /// Returns the account name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Provider {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for Provider {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_round_trip() {
        let sym = Symbol::new("DAI");
        assert_eq!(sym.as_str(), "DAI");
        assert_eq!(sym.to_string(), "DAI");
    }

    #[test]
    fn symbols_are_case_sensitive() {
        assert_ne!(Symbol::new("dai"), Symbol::new("DAI"));
    }

    #[test]
    fn symbol_ordering_is_lexicographic() {
        assert!(Symbol::new("AAA") < Symbol::new("BBB"));
    }

    #[test]
    fn symbol_borrows_as_str() {
        let mut map = indexmap::IndexMap::new();
        map.insert(Symbol::new("WETH"), 1_u8);
        assert_eq!(map.get("WETH"), Some(&1));
    }

    #[test]
    fn null_provider() {
        let null = Provider::null();
        assert!(null.is_null());
        assert_eq!(null.as_str(), "0");
        assert!(!Provider::new("alice").is_null());
    }

    #[test]
    fn provider_from_str() {
        assert_eq!(Provider::from("bob"), Provider::new("bob"));
    }

    #[test]
    fn debug_format() {
        let dbg = format!("{:?}", Symbol::new("X"));
        assert!(dbg.contains("Symbol"));
    }
}
