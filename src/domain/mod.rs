//! Fundamental domain value types used throughout the engine.
//!
//! Token identities, provider accounts, token records held by the vault,
//! and the `(quantity, fee)` result pair returned by every formula.

mod math_result;
mod symbol;
mod token;
mod token_amount;

pub use math_result::MathResult;
pub use symbol::{Provider, Symbol};
pub use token::Token;
pub use token_amount::TokenAmount;
