//! Unified error types for the weighted AMM engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every variant is a synchronous validation failure: the
//! pool that produced it has not been mutated.

use rust_decimal::Decimal;

use crate::domain::Symbol;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every way an engine, registry, pool or factory call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmmError {
    // -- pool state machine ------------------------------------------------
    /// The referenced token symbol is not registered in the pool's vault.
    #[error("token {0} is not part of the pool")]
    TokenNotInPool(Symbol),

    /// `join_pool` was called on a pool that already holds liquidity.
    #[error("pool already joined")]
    PoolAlreadyJoined,

    /// The operation needs liquidity but the pool is unjoined.
    #[error("pool has not been joined")]
    PoolNotJoined,

    /// A swap, join or exit exceeds the configured in/out ratio.
    #[error("ratio exceeded: {0}")]
    RatioExceeded(&'static str),

    /// A derived principal quantity rounded to zero.
    #[error("math exit error: {0}")]
    MathExitError(&'static str),

    /// A swap produced less output than required.
    #[error("insufficient output amount")]
    InsufficientOutput,

    /// The realized input of a swap is not strictly positive.
    #[error("insufficient input amount")]
    InsufficientInput,

    /// The derived input (token or shares) exceeds the caller's limit.
    #[error("derived input exceeds the caller limit")]
    LimitIn,

    /// The post-trade balance product does not match the pre-trade one.
    ///
    /// The products are compared as ratios, `(Ro − Ao) / Bo'` against
    /// `Bi' / (Ri + ΔIi)`, which agree exactly when the products do.
    #[error("invariant violation: before={before} after={after}")]
    InvariantViolation {
        /// Adjusted pre-trade output reserve over the post-trade output
        /// balance.
        before: Decimal,
        /// Post-trade input balance over the adjusted pre-trade input
        /// reserve.
        after: Decimal,
    },

    /// The observed token balance delta disagrees with the claimed deposit.
    #[error("mint reconciliation failed: expected {expected}, observed {observed}")]
    MintReconciliation {
        /// Amount the caller claims to deposit.
        expected: Decimal,
        /// Balance delta actually observed on the token.
        observed: Decimal,
    },

    /// A withdrawal exceeds a provider's or the pool's share balance.
    #[error("insufficient shares: {0}")]
    InsufficientShares(&'static str),

    // -- registry and factory ----------------------------------------------
    /// A token transfer would drive its balance negative.
    #[error("insufficient balance of token {0}")]
    InsufficientBalance(Symbol),

    /// The symbol is already registered in the vault.
    #[error("token {0} already exists in the vault")]
    DuplicateToken(Symbol),

    /// An exchange already exists for this symbol or token set.
    #[error("exchange already created: {0}")]
    ExchangeAlreadyCreated(String),

    // -- validation --------------------------------------------------------
    /// Invalid pool or vault configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Fee outside its permitted range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Token weight outside its permitted range.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// Zero, negative or otherwise unusable quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// Token arguments are inconsistent (e.g. swapping a token for itself).
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    // -- arithmetic --------------------------------------------------------
    /// Arithmetic overflow.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// A non-negative quantity would become negative.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Power-function base outside `[MIN_BPOW_BASE, MAX_BPOW_BASE]`.
    #[error("power base out of range")]
    PowBaseOutOfRange,

    /// The fractional power series did not converge within its iteration cap.
    #[error("power approximation did not converge")]
    PowNonConvergence,
}
