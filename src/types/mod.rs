//! Core value types of the exchange
//!
//! All amounts are exact integer arithmetic in canonical form; no code path
//! touches floating point.
//!
//! ## Types
//!
//! - [`Issue`]: A currency identity (native, or code plus issuer)
//! - [`Amount`]: An exact quantity of one issue
//! - [`Amounts`]: The (input, output) pair of an offer or flow
//! - [`Quality`]: A bit-packed exchange rate, ordered best-first
//! - [`Rate`]: An issuer transfer-fee multiplier
//!
//! ## Arithmetic
//!
//! [`multiply`]/[`divide`] round to nearest through 128-bit intermediates;
//! [`mul_round`]/[`div_round`] take an explicit [`Rounding`] direction.

pub mod amount;
pub mod amounts;
pub mod arith;
pub mod issue;
pub mod quality;
pub mod rate;

// Re-export all types at module level
pub use amount::{
    Amount, MAX_EXPONENT, MAX_MANTISSA, MAX_NATIVE_DROPS, MIN_EXPONENT, MIN_MANTISSA,
};
pub use amounts::Amounts;
pub use arith::{div_round, divide, mul_round, multiply, Rounding};
pub use issue::{AccountId, CurrencyCode, Issue, NATIVE_TICKER};
pub use quality::{amount_from_quality, composed_quality, get_rate, Quality};
pub use rate::{effective_rate, Rate};
