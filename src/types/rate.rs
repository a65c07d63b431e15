//! Issuer transfer-fee rates.
//!
//! An issuer may charge a fee whenever its currency moves between two other
//! accounts. The fee is expressed as a multiplier on the transferred amount,
//! quantized to nine decimal places and stored as a `u32`: parity (no fee)
//! is 10^9, a 50% fee is 1_500_000_000.

use crate::errors::AmountError;
use crate::types::amount::Amount;
use crate::types::arith::{divide, multiply};
use crate::types::issue::{AccountId, Issue};

/// A transfer-fee multiplier scaled by 10^9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rate(u32);

impl Rate {
    /// The identity rate: no transfer fee.
    pub const PARITY: Rate = Rate(1_000_000_000);

    pub fn new(value: u32) -> Self {
        Rate(value)
    }

    /// The raw quantized multiplier.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_parity(&self) -> bool {
        *self == Self::PARITY
    }

    /// The multiplier as a dimensionless amount.
    fn as_amount(&self) -> Result<Amount, AmountError> {
        Amount::new(Issue::no_issue(), self.0 as u64, -9)
    }

    /// Grosses an amount up by this rate (nearest rounding). Parity is an
    /// exact no-op.
    pub fn multiply(&self, amount: &Amount) -> Result<Amount, AmountError> {
        if self.is_parity() {
            return Ok(*amount);
        }
        multiply(amount, &self.as_amount()?, amount.issue())
    }

    /// Removes this rate from a grossed-up amount (nearest rounding).
    /// Parity is an exact no-op.
    pub fn divide(&self, amount: &Amount) -> Result<Amount, AmountError> {
        if self.is_parity() {
            return Ok(*amount);
        }
        divide(amount, &self.as_amount()?, amount.issue())
    }
}

/// The rate actually charged when `issue` moves from `from` to `to`.
///
/// A fee applies only to third-party transfers of an issued currency: the
/// issuer never pays its own fee, and a self-transfer moves nothing.
pub fn effective_rate(rate: Rate, issue: &Issue, from: &AccountId, to: &AccountId) -> Rate {
    match issue.issuer() {
        Some(issuer) if !rate.is_parity() && from != to && *from != issuer && *to != issuer => {
            rate
        }
        _ => Rate::PARITY,
    }
}
