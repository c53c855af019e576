//! Action routing on top of the pool traits.
//!
//! - [`Proc`] selects between the two flavours of a swap, a deposit or a
//!   withdrawal and forwards to the matching trait method.
//! - [`PoolAction`] is the typed input of any of the eight exchange
//!   operations, with optional caller limits; [`Exchange::apply`]
//!   executes one.
//! - With the `serde` feature, [`ActionRecord`] decodes raw action
//!   records into `PoolAction`s and [`replay`] runs a sequence of them.
//!
//! [`Exchange::apply`]: crate::pools::Exchange::apply

mod action;
#[cfg(feature = "serde")]
mod decoder;
mod kind;

pub use action::{ActionOutcome, PoolAction};
#[cfg(feature = "serde")]
pub use decoder::{replay, ActionRecord};
pub use kind::Proc;
