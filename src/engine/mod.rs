//! Offer-crossing engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same inputs always realize the same flows
//! 2. **Exact Math**: no floating-point operations anywhere
//! 3. **No Side Effects**: balances are read through an injected
//!    [`FundSource`]; realized legs are returned, never applied
//! 4. **Zeroed, Not Failed**: offers priced below the taker's threshold or
//!    left unfunded by their owner produce zeroed results, not errors
//!
//! ## Crossing Rules
//!
//! Each [`Taker::cross`] call clamps the resting offer down by, in order:
//! the owner's balance, the taker's output limit (buy only), the taker's
//! input offer, and the taker's spendable funds. Transfer fees gross up the
//! issuer-facing legs. Bridged crossing composes an issued-to-native and a
//! native-to-issued offer with conservation at the native midpoint.
//!
//! ## Example
//!
//! ```
//! use crossbook::book::Offer;
//! use crossbook::engine::{Side, Taker};
//! use crossbook::types::{AccountId, Amount, Amounts, Issue, Quality, Rate};
//!
//! let usd = Issue::issued("USD".parse().unwrap(), AccountId::from_u64(9));
//! let taker = AccountId::from_u64(1);
//! let owner = AccountId::from_u64(2);
//!
//! // Everyone holds 1000 drops and 100 USD.
//! let funds = move |_: &AccountId, issue: &Issue| {
//!     if issue.is_native() {
//!         Amount::drops(1_000).unwrap()
//!     } else {
//!         Amount::from_text(usd, "100").unwrap()
//!     }
//! };
//!
//! // The taker sells 100 drops for 2 USD.
//! let desire = Amounts::new(
//!     Amount::drops(100).unwrap(),
//!     Amount::from_text(usd, "2").unwrap(),
//! );
//! let mut engine = Taker::new(
//!     taker,
//!     desire,
//!     Quality::from_amounts(&desire),
//!     Side::Sell,
//!     Rate::PARITY,
//!     Rate::PARITY,
//!     funds,
//! )
//! .unwrap();
//!
//! // A resting offer at the same price fills it completely.
//! let resting = Offer::new(
//!     owner,
//!     Amounts::new(
//!         Amount::drops(100).unwrap(),
//!         Amount::from_text(usd, "2").unwrap(),
//!     ),
//! )
//! .unwrap();
//! let filled = engine.cross(&resting).unwrap();
//!
//! assert_eq!(filled.input.drop_count().unwrap(), 100);
//! assert!(engine.done());
//! ```

mod taker;

use crate::types::{AccountId, Amount, Issue};

pub use taker::Taker;

/// The shape of a crossing, derived from the taker's two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossType {
    /// Taker pays native, receives an issued currency.
    NativeToIssued,
    /// Taker pays an issued currency, receives native.
    IssuedToNative,
    /// Both legs issued; may cross directly or bridge through native.
    IssuedToIssued,
}

/// Whether the taker stops on spent input or on received output.
///
/// A seller keeps crossing until the entire input amount is spent; a buyer
/// also stops as soon as the desired output has been received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// Read-only access to spendable balances.
///
/// Implemented for any `Fn(&AccountId, &Issue) -> Amount`, so callers can
/// hand the engine a closure over whatever balance store they keep.
pub trait FundSource {
    /// The spendable balance of `account`, denominated in `issue`.
    fn funds(&self, account: &AccountId, issue: &Issue) -> Amount;
}

impl<F> FundSource for F
where
    F: Fn(&AccountId, &Issue) -> Amount,
{
    fn funds(&self, account: &AccountId, issue: &Issue) -> Amount {
        self(account, issue)
    }
}
