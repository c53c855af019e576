//! Process kinds and their dispatchers.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{MathResult, Provider};
use crate::error::{AmmError, Result};
use crate::traits::{LiquidityPool, SwapPool};

/// Which flavour of a swap, deposit or withdrawal to run.
///
/// | Kind | Process | Operation | `amount` is |
/// |------|---------|-----------|-------------|
/// | `SwapOut` | swap | `swap_exact_amount_in` | tokens sold |
/// | `SwapIn` | swap | `swap_exact_amount_out` | tokens bought |
/// | `AddToken` | add liquidity | `join_swap_extern_amount_in` | tokens deposited |
/// | `AddShares` | add liquidity | `join_swap_pool_amount_out` | shares minted |
/// | `RemoveToken` | remove liquidity | `exit_swap_extern_amount_out` | tokens withdrawn |
/// | `RemoveShares` | remove liquidity | `exit_swap_pool_amount_in` | shares burned |
///
/// `SwapOut` names the side the pool computes: the caller fixes the input
/// and the pool derives what goes out.
///
/// # Example
///
/// ```rust
/// use weighted_amm::process::Proc;
///
/// let kind: Proc = "addshares".parse().expect("known kind");
/// assert_eq!(kind, Proc::AddShares);
/// assert_eq!(kind.to_string(), "addshares");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Proc {
    /// Buy an exact amount of the output token.
    SwapIn,
    /// Sell an exact amount of the input token.
    SwapOut,
    /// Deposit an exact token amount.
    #[cfg_attr(feature = "serde", serde(rename = "addtkn"))]
    AddToken,
    /// Mint an exact share amount.
    AddShares,
    /// Withdraw an exact token amount.
    #[cfg_attr(feature = "serde", serde(rename = "removetkn"))]
    RemoveToken,
    /// Burn an exact share amount.
    RemoveShares,
}

impl Proc {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SwapIn => "swapin",
            Self::SwapOut => "swapout",
            Self::AddToken => "addtkn",
            Self::AddShares => "addshares",
            Self::RemoveToken => "removetkn",
            Self::RemoveShares => "removeshares",
        }
    }

    /// Runs a swap of `amount` between `token_in` and `token_out`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `self` is not a swap kind.
    /// - Any error of the routed operation.
    pub fn swap<P: SwapPool + ?Sized>(
        self,
        pool: &mut P,
        token_in: &str,
        token_out: &str,
        provider: &Provider,
        amount: Decimal,
    ) -> Result<MathResult> {
        match self {
            Self::SwapOut => pool.swap_exact_amount_in(amount, token_in, token_out, provider),
            Self::SwapIn => pool.swap_exact_amount_out(amount, token_out, token_in, provider),
            _ => Err(AmmError::InvalidConfiguration("not a swap process")),
        }
    }

    /// Adds liquidity in `token_in`, `amount` being tokens or shares per
    /// kind.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `self` is not a deposit
    ///   kind.
    /// - Any error of the routed operation.
    pub fn add_liquidity<P: LiquidityPool + ?Sized>(
        self,
        pool: &mut P,
        token_in: &str,
        provider: &Provider,
        amount: Decimal,
    ) -> Result<MathResult> {
        match self {
            Self::AddToken => pool.join_swap_extern_amount_in(amount, token_in, provider),
            Self::AddShares => pool.join_swap_pool_amount_out(amount, token_in, provider),
            _ => Err(AmmError::InvalidConfiguration("not an add liquidity process")),
        }
    }

    /// Removes liquidity into `token_out`, `amount` being tokens or shares
    /// per kind.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if `self` is not a withdrawal
    ///   kind.
    /// - Any error of the routed operation.
    pub fn remove_liquidity<P: LiquidityPool + ?Sized>(
        self,
        pool: &mut P,
        token_out: &str,
        provider: &Provider,
        amount: Decimal,
    ) -> Result<MathResult> {
        match self {
            Self::RemoveToken => pool.exit_swap_extern_amount_out(amount, token_out, provider),
            Self::RemoveShares => pool.exit_swap_pool_amount_in(amount, token_out, provider),
            _ => Err(AmmError::InvalidConfiguration(
                "not a remove liquidity process",
            )),
        }
    }
}

impl fmt::Display for Proc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Proc {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "swapin" => Ok(Self::SwapIn),
            "swapout" => Ok(Self::SwapOut),
            "addtkn" => Ok(Self::AddToken),
            "addshares" => Ok(Self::AddShares),
            "removetkn" => Ok(Self::RemoveToken),
            "removeshares" => Ok(Self::RemoveShares),
            _ => Err(AmmError::InvalidConfiguration("unknown process kind")),
        }
    }
}
