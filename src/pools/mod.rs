//! Pool state machine and share accounting.
//!
//! [`Exchange`] is the weighted constant-product pool: it mirrors the
//! balances of its [`Vault`](crate::vault::Vault), prices every operation
//! with the curves in [`crate::math`], and commits a change only after
//! all of its post-conditions hold.  [`ShareLedger`] keeps the pool share
//! balances of every provider.

mod exchange;
mod ledger;

pub use exchange::Exchange;
pub use ledger::ShareLedger;

#[cfg(test)]
#[allow(clippy::panic)]
#[allow(clippy::indexing_slicing)]
mod proptest_properties;
