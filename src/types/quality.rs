//! Offer quality: the bit-packed exchange rate.
//!
//! A quality is the ratio `input / output` of an offer, packed into a single
//! `u64` so offers can be ordered and stored by rate without carrying a full
//! amount around:
//!
//! ```text
//!   bits 63-56: exponent + 100
//!   bits 55-0:  mantissa
//! ```
//!
//! Because a *smaller* ratio means the taker pays less per unit of output,
//! the packed integer orders worst-first. [`Quality`] reverses that
//! comparison so `q1 > q2` reads as "q1 is the better price", while the raw
//! packed value stays available as an ascending best-first storage key.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::AmountError;
use crate::types::amount::Amount;
use crate::types::amounts::Amounts;
use crate::types::arith::{divide, mul_round, Rounding};
use crate::types::issue::Issue;

const MANTISSA_MASK: u64 = (1 << 56) - 1;

/// Packs the rate `offer_in / offer_out` of an offer.
///
/// Returns 0 when either leg is zero or when the ratio cannot be
/// represented; callers treat 0 as "no usable rate".
pub fn get_rate(offer_out: &Amount, offer_in: &Amount) -> u64 {
    if offer_out.is_zero() {
        return 0;
    }
    let rate = match divide(offer_in, offer_out, Issue::no_issue()) {
        Ok(rate) => rate,
        Err(_) => return 0,
    };
    if rate.is_zero() {
        return 0;
    }
    pack(&rate)
}

/// Unpacks a rate produced by [`get_rate`] back into a dimensionless amount.
pub fn amount_from_quality(rate: u64) -> Result<Amount, AmountError> {
    if rate == 0 {
        return Ok(Amount::zero(Issue::no_issue()));
    }
    let mantissa = rate & MANTISSA_MASK;
    let exponent = (rate >> 56) as i32 - 100;
    Amount::new(Issue::no_issue(), mantissa, exponent)
}

fn pack(rate: &Amount) -> u64 {
    ((rate.exponent() + 100) as u64) << 56 | rate.mantissa()
}

// ============================================================================
// Quality
// ============================================================================

/// An offer's rate with "greater is better for the taker" ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(u64);

impl Quality {
    /// Wraps an already-packed rate.
    pub fn from_packed(packed: u64) -> Self {
        Quality(packed)
    }

    /// The quality of an offer taking `amounts.input` for `amounts.output`.
    pub fn from_amounts(amounts: &Amounts) -> Self {
        Quality(get_rate(&amounts.output, &amounts.input))
    }

    /// The raw packed value. Ascending packed order is best-quality-first.
    #[inline]
    pub fn packed(&self) -> u64 {
        self.0
    }

    /// No usable rate.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The rate as a dimensionless amount, for arithmetic against real legs.
    pub fn rate(&self) -> Result<Amount, AmountError> {
        amount_from_quality(self.0)
    }
}

impl Ord for Quality {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: a lower packed rate is a better price.
        other.0.cmp(&self.0)
    }
}

impl PartialOrd for Quality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rate() {
            Ok(rate) => write!(f, "{}", rate),
            Err(_) => write!(f, "{:#x}", self.0),
        }
    }
}

/// The quality of two offers taken back to back.
///
/// Computed as a single rounded multiplication of the two unpacked rates and
/// one repack, never as two sequential quantizations; composing and then
/// packing twice would drift by an extra unit in the last place.
pub fn composed_quality(q1: Quality, q2: Quality) -> Result<Quality, AmountError> {
    let r1 = q1.rate()?;
    let r2 = q2.rate()?;
    let product = mul_round(&r1, &r2, Issue::no_issue(), Rounding::FavorReceiver)?;
    if product.is_zero() {
        return Ok(Quality(0));
    }
    Ok(Quality(pack(&product)))
}

// ============================================================================
// Unit Tests
// ============================================================================
