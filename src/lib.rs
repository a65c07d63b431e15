//! # crossbook
//!
//! Deterministic offer-crossing core for a distributed ledger exchange.
//!
//! ## Architecture
//!
//! - **Types**: exact ledger amounts ([`types::Amount`]), currency
//!   identities ([`types::Issue`]), bit-packed exchange rates
//!   ([`types::Quality`]) and transfer fees ([`types::Rate`])
//! - **Book**: resting offers in best-quality-first, FIFO-within-level
//!   order, backed by slab storage
//! - **Engine**: the [`engine::Taker`], which crosses resting offers
//!   (directly or bridged through the native currency) under funding,
//!   quality and buy/sell constraints
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs realize identical flows on every
//!    platform
//! 2. **No Floating Point**: all math is integer sign/mantissa/exponent
//!    with 128-bit intermediates
//! 3. **No Side Effects**: balances are read through an injected
//!    [`engine::FundSource`] and never written; the engine reports flows
//! 4. **Zeroed, Not Failed**: economically rejected offers (bad price,
//!    unfunded owner) yield zeroed flows; errors are reserved for caller
//!    bugs and numeric range violations

// ============================================================================
// Module declarations
// ============================================================================

/// Resting offers and the quality-ordered book
pub mod book;

/// The crossing engine
pub mod engine;

/// Error taxonomy
pub mod errors;

/// Amounts, issues, qualities, rates and their arithmetic
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use book::{Offer, OfferBook, OfferId};
pub use engine::{CrossType, FundSource, Side, Taker};
pub use errors::{AmountError, TakerError};
pub use types::{Amount, Amounts, Issue, Quality, Rate};
