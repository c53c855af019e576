//! Exchange deployment via the factory pattern.
//!
//! [`ExchangeData`] describes one pool (vault, share symbol, address and
//! configuration); [`ExchangeFactory`] validates it, builds the
//! [`Exchange`](crate::pools::Exchange) through
//! [`FromConfig`](crate::traits::FromConfig) and indexes it by symbol and
//! by token set.

mod exchange_data;
mod exchange_factory;

pub use exchange_data::ExchangeData;
pub use exchange_factory::ExchangeFactory;
