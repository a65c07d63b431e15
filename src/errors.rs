//! Error conditions for the exchange core.
//!
//! ## Taxonomy
//!
//! Three kinds of outcomes exist in this crate and only the first two are
//! represented here:
//!
//! 1. **Contract errors** ([`AmountError::CurrencyMismatch`],
//!    [`AmountError::WrongAmountType`], [`TakerError::ZeroOffer`], ...):
//!    caller bugs. They abort the enclosing transaction and are never
//!    recovered locally.
//! 2. **Numeric boundary failures** ([`AmountError::DivideByZero`],
//!    [`AmountError::ValueOverflow`], [`AmountError::CorruptAmount`]):
//!    operations the ledger rules treat as invalid.
//! 3. **Economic rejections** (quality below threshold, unfunded offers):
//!    these are *not* errors. The engine reports them as zeroed flows and
//!    the caller decides whether to skip or remove the offer.
//!
//! Underflow to zero is deliberately absent: a result too small to represent
//! is worth nothing and becomes a zero amount, not an error.

use thiserror::Error;

use crate::types::Issue;

/// Errors raised by amount construction, arithmetic and codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Two amounts of different issues were combined or compared.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Issue of the left-hand operand.
        left: Issue,
        /// Issue of the right-hand operand.
        right: Issue,
    },

    /// Division by a zero amount.
    #[error("division by zero")]
    DivideByZero,

    /// Text that does not parse to a representable amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A native accessor was used on an issued amount, or vice versa.
    #[error("wrong amount type: {0}")]
    WrongAmountType(&'static str),

    /// A value fell outside the representable range (overflow side only;
    /// underflow clamps to zero by design).
    #[error("amount out of range: {0}")]
    ValueOverflow(&'static str),

    /// Serialized bytes that decode to a non-canonical or impossible amount.
    #[error("corrupt amount: {0}")]
    CorruptAmount(&'static str),

    /// Text that does not name a valid currency code.
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    /// Text that does not name a valid account identifier.
    #[error("invalid account: {0}")]
    InvalidAccount(String),
}

/// Errors raised by the crossing engine.
///
/// Quality rejections and unfunded offers are *not* represented here; they
/// are ordinary zeroed results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TakerError {
    /// A resting offer's legs do not match the taker's issues.
    #[error("offer currencies do not match the taker")]
    CurrencyMismatch,

    /// An offer (or the taker's own offer) has a zero or negative leg.
    #[error("offer has a zero or negative leg")]
    ZeroOffer,

    /// Native currency cannot be exchanged for itself.
    #[error("cannot cross native currency for native currency")]
    NativeForNative,

    /// An offer trades a currency for itself.
    #[error("offer trades a currency for itself")]
    RedundantOffer,

    /// An offer whose rate cannot be represented as a quality.
    #[error("offer rate is not representable")]
    UnpricedOffer,

    /// A transfer fee rate of zero was supplied.
    #[error("invalid transfer rate")]
    InvalidRate,

    /// A bridged crossing was attempted with legs that do not bridge
    /// through the native currency.
    #[error("bridge legs must meet in the native currency")]
    BadBridge,

    /// A computed flow failed its internal invariant check.
    #[error("computed flow violates an invariant: {0}")]
    FlowInvariant(&'static str),

    /// An arithmetic failure surfaced while computing a flow.
    #[error(transparent)]
    Amount(#[from] AmountError),
}
