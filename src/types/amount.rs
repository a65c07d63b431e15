//! Ledger amount type.
//!
//! ## Representation
//!
//! An [`Amount`] is an exact, deterministic quantity of one [`Issue`]. Two
//! internal shapes share the struct:
//!
//! - **Native** amounts count drops as an integer. Magnitude is capped at
//!   10^17 and the exponent is always zero.
//! - **Issued** amounts are sign/mantissa/exponent with the mantissa
//!   normalized into `[10^15, 10^16 - 1]` and the exponent in `[-96, 80]`.
//!   Zero is canonical: mantissa 0, exponent -100, positive.
//!
//! Canonical form is an invariant of every constructed value, which makes
//! equality a plain field comparison and keeps all arithmetic bit-stable
//! across platforms. No floating point is used anywhere.
//!
//! ## Range behavior
//!
//! The two ends of the exponent range are treated asymmetrically: values too
//! large to represent are an error, values too small collapse to zero. A
//! quantity below the precision floor is worth nothing and pretending
//! otherwise would let dust amounts accumulate rounding debt.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use crate::errors::AmountError;
use crate::types::issue::{CurrencyCode, Issue};

// ============================================================================
// Constants
// ============================================================================

/// Smallest normalized issued mantissa (10^15).
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;

/// Largest normalized issued mantissa (10^16 - 1).
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;

/// Smallest issued exponent.
pub const MIN_EXPONENT: i32 = -96;

/// Largest issued exponent.
pub const MAX_EXPONENT: i32 = 80;

/// Exponent of the canonical issued zero.
pub(crate) const ZERO_EXPONENT: i32 = -100;

/// Largest native magnitude, in drops (10^17).
pub const MAX_NATIVE_DROPS: u64 = 100_000_000_000_000_000;

// Wire layout of the 64-bit value word.
const WIRE_NOT_NATIVE: u64 = 0x8000_0000_0000_0000;
const WIRE_POSITIVE: u64 = 0x4000_0000_0000_0000;
const WIRE_MANTISSA_MASK: u64 = (1 << 54) - 1;

/// Serialized size of a native amount.
pub const WIRE_NATIVE_LEN: usize = 8;

/// Serialized size of an issued amount (value word + currency + issuer).
pub const WIRE_ISSUED_LEN: usize = 48;

// ============================================================================
// Amount
// ============================================================================

/// An exact quantity of one currency, always held in canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub(crate) issue: Issue,
    pub(crate) mantissa: u64,
    pub(crate) exponent: i32,
    pub(crate) negative: bool,
}

impl Amount {
    /// The zero amount of a given issue.
    pub fn zero(issue: Issue) -> Self {
        Amount {
            issue,
            mantissa: 0,
            exponent: if issue.is_native() { 0 } else { ZERO_EXPONENT },
            negative: false,
        }
    }

    /// A native amount from a signed count of drops.
    pub fn drops(value: i64) -> Result<Self, AmountError> {
        let negative = value < 0;
        Self::from_parts(Issue::Native, value.unsigned_abs(), 0, negative)
    }

    /// A positive amount from mantissa and exponent, canonicalized.
    pub fn new(issue: Issue, mantissa: u64, exponent: i32) -> Result<Self, AmountError> {
        Self::from_parts(issue, mantissa, exponent, false)
    }

    /// A signed amount from mantissa and exponent, canonicalized.
    pub fn new_signed(
        issue: Issue,
        mantissa: u64,
        exponent: i32,
        negative: bool,
    ) -> Result<Self, AmountError> {
        Self::from_parts(issue, mantissa, exponent, negative)
    }

    /// The smallest positive amount of an issue: one drop, or the minimum
    /// mantissa at the minimum exponent.
    pub fn min_positive(issue: Issue) -> Self {
        if issue.is_native() {
            Amount {
                issue,
                mantissa: 1,
                exponent: 0,
                negative: false,
            }
        } else {
            Amount {
                issue,
                mantissa: MIN_MANTISSA,
                exponent: MIN_EXPONENT,
                negative: false,
            }
        }
    }

    /// Builds and canonicalizes. All construction funnels through here.
    pub(crate) fn from_parts(
        issue: Issue,
        mantissa: u64,
        exponent: i32,
        negative: bool,
    ) -> Result<Self, AmountError> {
        let mut amount = Amount {
            issue,
            mantissa,
            exponent,
            negative,
        };
        amount.canonicalize()?;
        Ok(amount)
    }

    fn canonicalize(&mut self) -> Result<(), AmountError> {
        if self.issue.is_native() {
            // Fold any exponent into the drop count.
            while self.exponent < 0 {
                self.mantissa /= 10;
                self.exponent += 1;
            }
            while self.exponent > 0 {
                self.mantissa = self
                    .mantissa
                    .checked_mul(10)
                    .ok_or(AmountError::ValueOverflow("native amount"))?;
                self.exponent -= 1;
            }
            if self.mantissa > MAX_NATIVE_DROPS {
                return Err(AmountError::ValueOverflow("native amount"));
            }
            if self.mantissa == 0 {
                self.negative = false;
            }
            return Ok(());
        }

        if self.mantissa == 0 {
            *self = Amount::zero(self.issue);
            return Ok(());
        }

        while self.mantissa < MIN_MANTISSA && self.exponent > MIN_EXPONENT {
            self.mantissa *= 10;
            self.exponent -= 1;
        }
        while self.mantissa > MAX_MANTISSA {
            if self.exponent >= MAX_EXPONENT {
                return Err(AmountError::ValueOverflow("issued amount"));
            }
            self.mantissa /= 10;
            self.exponent += 1;
        }

        // Below the precision floor the value collapses to zero.
        if self.exponent < MIN_EXPONENT || self.mantissa < MIN_MANTISSA {
            *self = Amount::zero(self.issue);
            return Ok(());
        }
        if self.exponent > MAX_EXPONENT {
            return Err(AmountError::ValueOverflow("issued amount"));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The issue this amount is denominated in.
    #[inline]
    pub fn issue(&self) -> Issue {
        self.issue
    }

    /// Whether this is a native amount.
    #[inline]
    pub fn is_native(&self) -> bool {
        self.issue.is_native()
    }

    /// Raw mantissa (drop count for native amounts).
    #[inline]
    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    /// Exponent (always 0 for native amounts, -100 for issued zero).
    #[inline]
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.mantissa != 0 && !self.negative
    }

    /// The signed drop count. Fails on issued amounts.
    pub fn drop_count(&self) -> Result<i64, AmountError> {
        if !self.is_native() {
            return Err(AmountError::WrongAmountType(
                "drop count requested from an issued amount",
            ));
        }
        let magnitude = self.mantissa as i64;
        Ok(if self.negative { -magnitude } else { magnitude })
    }

    /// The (mantissa, exponent, negative) triple. Fails on native amounts.
    pub fn issued_parts(&self) -> Result<(u64, i32, bool), AmountError> {
        if self.is_native() {
            return Err(AmountError::WrongAmountType(
                "issued parts requested from a native amount",
            ));
        }
        Ok((self.mantissa, self.exponent, self.negative))
    }

    /// This amount with its sign dropped.
    pub fn abs(&self) -> Self {
        let mut out = *self;
        out.negative = false;
        out
    }

    // ------------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------------

    /// Compares two amounts of the same issue; amounts of different issues
    /// have no order.
    pub fn checked_cmp(&self, other: &Amount) -> Result<Ordering, AmountError> {
        if self.issue != other.issue {
            return Err(AmountError::CurrencyMismatch {
                left: self.issue,
                right: other.issue,
            });
        }
        Ok(self.cmp_same_issue(other))
    }

    fn cmp_same_issue(&self, other: &Amount) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        // Canonical form makes (exponent, mantissa) a magnitude order; the
        // issued zero sits below everything at exponent -100.
        let magnitude = (self.exponent, self.mantissa).cmp(&(other.exponent, other.mantissa));
        if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

impl PartialOrd for Amount {
    /// `None` across issues; a magnitude-and-sign order within one issue.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.issue != other.issue {
            return None;
        }
        Some(self.cmp_same_issue(other))
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        let mut out = self;
        if out.mantissa != 0 {
            out.negative = !out.negative;
        }
        out
    }
}

// ============================================================================
// Text encoding
// ============================================================================

impl fmt::Display for Amount {
    /// Renders the value alone, without its issue.
    ///
    /// Native amounts print as a signed drop count. Issued amounts print
    /// positionally when the exponent is 0 or in `[-25, -5]`, in
    /// `<mantissa>e<exponent>` scientific form otherwise. The output parses
    /// back to an equal amount.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let sign = if self.negative { "-" } else { "" };
        if self.is_native() {
            return write!(f, "{}{}", sign, self.mantissa);
        }

        let scientific =
            self.exponent != 0 && (self.exponent < -25 || self.exponent > -5);
        if scientific {
            return write!(f, "{}{}e{}", sign, self.mantissa, self.exponent);
        }

        // Canonical nonzero mantissas are exactly 16 digits.
        let digits = self.mantissa.to_string();
        let int_len = 16 + self.exponent;
        if int_len <= 0 {
            let frac = digits.trim_end_matches('0');
            write!(f, "{}0.", sign)?;
            for _ in 0..-int_len {
                write!(f, "0")?;
            }
            write!(f, "{}", frac)
        } else {
            let int_len = int_len as usize;
            let (int_part, frac_part) = digits.split_at(int_len.min(16));
            write!(f, "{}{}", sign, int_part)?;
            let frac = frac_part.trim_end_matches('0');
            if !frac.is_empty() {
                write!(f, ".{}", frac)?;
            }
            Ok(())
        }
    }
}

impl Amount {
    /// Parses a decimal string as an amount of `issue`.
    ///
    /// Grammar: optional sign, integer digits without a superfluous leading
    /// zero, optional `.fraction`, optional `e`/`E` exponent. Native amounts
    /// accept only a signed integer drop count. Issued amounts with more
    /// than 16 significant digits are rejected rather than silently losing
    /// precision.
    pub fn from_text(issue: Issue, text: &str) -> Result<Self, AmountError> {
        let invalid = || AmountError::InvalidAmount(text.to_string());
        let bytes = text.as_bytes();
        let mut pos = 0usize;

        let negative = match bytes.first() {
            Some(b'-') => {
                pos = 1;
                true
            }
            Some(b'+') => {
                pos = 1;
                false
            }
            _ => false,
        };

        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let int_digits = &text[int_start..pos];
        if int_digits.is_empty() {
            return Err(invalid());
        }
        if int_digits.len() > 1 && int_digits.starts_with('0') {
            return Err(invalid());
        }

        let mut frac_digits = "";
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            frac_digits = &text[frac_start..pos];
            if frac_digits.is_empty() {
                return Err(invalid());
            }
        }

        // Wide enough that the digit-count adjustments below cannot wrap.
        let mut exponent: i64 = 0;
        if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
            pos += 1;
            let exp_negative = match bytes.get(pos) {
                Some(b'-') => {
                    pos += 1;
                    true
                }
                Some(b'+') => {
                    pos += 1;
                    false
                }
                _ => false,
            };
            let exp_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let exp_digits = &text[exp_start..pos];
            if exp_digits.is_empty() {
                return Err(invalid());
            }
            let magnitude: i64 = exp_digits.parse().map_err(|_| invalid())?;
            exponent = if exp_negative { -magnitude } else { magnitude };
        }

        if pos != bytes.len() {
            return Err(invalid());
        }

        if issue.is_native() {
            if !frac_digits.is_empty() || exponent != 0 {
                return Err(invalid());
            }
            let drops: u64 = int_digits.parse().map_err(|_| invalid())?;
            return Self::from_parts(issue, drops, 0, negative);
        }

        // Combine integer and fraction digits into one mantissa string.
        let mut combined = String::with_capacity(int_digits.len() + frac_digits.len());
        combined.push_str(int_digits);
        combined.push_str(frac_digits);
        exponent -= frac_digits.len() as i64;

        let trimmed = combined.trim_start_matches('0');
        let significant = trimmed.trim_end_matches('0');
        if significant.len() > 16 {
            return Err(invalid());
        }
        if significant.is_empty() {
            return Ok(Amount::zero(issue));
        }
        exponent += (trimmed.len() - significant.len()) as i64;
        // Normalization shifts the exponent by at most the mantissa width, so
        // anything this far out is decided before narrowing back to i32.
        if exponent > (MAX_EXPONENT + 16) as i64 {
            return Err(AmountError::ValueOverflow("text exponent"));
        }
        if exponent < (MIN_EXPONENT - 16) as i64 {
            return Ok(Amount::zero(issue));
        }
        let mantissa: u64 = significant.parse().map_err(|_| invalid())?;
        Self::from_parts(issue, mantissa, exponent as i32, negative)
    }
}

// ============================================================================
// Wire encoding
// ============================================================================

impl Amount {
    /// Serializes to the ledger wire form: an 8-byte big-endian value word,
    /// followed for issued amounts by the 20-byte currency code and 20-byte
    /// issuer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let word = if self.is_native() {
            let mut word = self.mantissa;
            if !self.negative {
                word |= WIRE_POSITIVE;
            }
            word
        } else if self.is_zero() {
            WIRE_NOT_NATIVE
        } else {
            let sign_bit = if self.negative { 0 } else { 0x100 };
            let field = 0x200 | sign_bit | (self.exponent + 97) as u64;
            self.mantissa | (field << 54)
        };

        match self.issue {
            Issue::Native => word.to_be_bytes().to_vec(),
            Issue::Issued { currency, issuer } => {
                let mut out = Vec::with_capacity(WIRE_ISSUED_LEN);
                out.extend_from_slice(&word.to_be_bytes());
                out.extend_from_slice(currency.as_bytes());
                out.extend_from_slice(issuer.as_bytes());
                out
            }
        }
    }

    /// Deserializes the wire form, rejecting every non-canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AmountError> {
        if bytes.len() != WIRE_NATIVE_LEN && bytes.len() != WIRE_ISSUED_LEN {
            return Err(AmountError::CorruptAmount("bad length"));
        }
        let mut word_bytes = [0u8; 8];
        word_bytes.copy_from_slice(&bytes[..8]);
        let word = u64::from_be_bytes(word_bytes);

        if word & WIRE_NOT_NATIVE == 0 {
            if bytes.len() != WIRE_NATIVE_LEN {
                return Err(AmountError::CorruptAmount(
                    "native value with trailing issue",
                ));
            }
            let negative = word & WIRE_POSITIVE == 0;
            let magnitude = word & !WIRE_POSITIVE;
            if magnitude > MAX_NATIVE_DROPS {
                return Err(AmountError::CorruptAmount("native magnitude too large"));
            }
            if negative && magnitude == 0 {
                return Err(AmountError::CorruptAmount("negative native zero"));
            }
            return Ok(Amount {
                issue: Issue::Native,
                mantissa: magnitude,
                exponent: 0,
                negative,
            });
        }

        if bytes.len() != WIRE_ISSUED_LEN {
            return Err(AmountError::CorruptAmount("issued value without issue"));
        }
        let mut currency = [0u8; 20];
        currency.copy_from_slice(&bytes[8..28]);
        let currency = CurrencyCode(currency);
        if currency.is_native() {
            return Err(AmountError::CorruptAmount(
                "issued value carries the native currency",
            ));
        }
        let mut issuer = [0u8; 20];
        issuer.copy_from_slice(&bytes[28..48]);
        let issue = Issue::Issued {
            currency,
            issuer: crate::types::issue::AccountId(issuer),
        };

        let mantissa = word & WIRE_MANTISSA_MASK;
        let field = word >> 54;
        if mantissa == 0 {
            // Zero admits exactly one encoding: the bare not-native flag.
            if field != 0x200 {
                return Err(AmountError::CorruptAmount("non-canonical issued zero"));
            }
            return Ok(Amount::zero(issue));
        }
        let negative = field & 0x100 == 0;
        let exponent = (field & 0xFF) as i32 - 97;
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(AmountError::CorruptAmount("issued exponent out of range"));
        }
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa) {
            return Err(AmountError::CorruptAmount("issued mantissa out of range"));
        }
        Ok(Amount {
            issue,
            mantissa,
            exponent,
            negative,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::issue::AccountId;

    fn usd() -> Issue {
        Issue::issued("USD".parse().unwrap(), AccountId::from_u64(1))
    }

    fn iou(text: &str) -> Amount {
        Amount::from_text(usd(), text).unwrap()
    }

    #[test]
    fn test_native_text_valid() {
        for (text, drops) in [
            ("0", 0i64),
            ("1", 1),
            ("22", 22),
            ("3000000000", 3_000_000_000),
            ("-1", -1),
            ("-3000000000", -3_000_000_000),
            ("100000000000000000", 100_000_000_000_000_000),
        ] {
            let a = Amount::from_text(Issue::Native, text).unwrap();
            assert_eq!(a.drop_count().unwrap(), drops, "{text}");
        }
    }

    #[test]
    fn test_native_text_invalid() {
        for text in [
            "",
            "-",
            "1.1",
            "0.0",
            "1e2",
            "1 ",
            " 1",
            "x",
            "012",
            "100000000000000001",
        ] {
            assert!(
                Amount::from_text(Issue::Native, text).is_err(),
                "{text:?} should not parse as native"
            );
        }
    }

    #[test]
    fn test_issued_text_valid() {
        for (text, mantissa, exponent, negative) in [
            ("1", MIN_MANTISSA, -15, false),
            ("-1", MIN_MANTISSA, -15, true),
            ("22", 2_200_000_000_000_000, -14, false),
            ("1234567.123456789", 1_234_567_123_456_789, -9, false),
            ("0.31", 3_100_000_000_000_000, -16, false),
            ("1e10", MIN_MANTISSA, -5, false),
            ("1.5e-60", MIN_MANTISSA + MIN_MANTISSA / 2, -75, false),
        ] {
            let a = iou(text);
            assert_eq!(
                a.issued_parts().unwrap(),
                (mantissa, exponent, negative),
                "{text}"
            );
        }
    }

    #[test]
    fn test_issued_text_invalid() {
        for text in ["", "-", "1.", ".5", "1e", "1.2.3", "x", "01", "1 "] {
            assert!(Amount::from_text(usd(), text).is_err(), "{text:?}");
        }
    }

    #[test]
    fn test_issued_text_rejects_excess_precision() {
        assert!(Amount::from_text(usd(), "12345678901234567").is_err());
        assert!(Amount::from_text(usd(), "1.2345678901234567").is_err());
        // Trailing and leading zeros are not significant.
        assert!(Amount::from_text(usd(), "12345678901234560000").is_ok());
        assert!(Amount::from_text(usd(), "0.0001234567890123456").is_ok());
    }

    #[test]
    fn test_issued_text_extreme_exponents() {
        // Exponents far past the representable range, including ones that
        // would wrap a 32-bit accumulator.
        assert!(matches!(
            Amount::from_text(usd(), "10e2147483647"),
            Err(AmountError::ValueOverflow(_))
        ));
        assert!(matches!(
            Amount::from_text(usd(), "1e9223372036854775807"),
            Err(AmountError::ValueOverflow(_))
        ));
        assert!(Amount::from_text(usd(), "1e99999999999999999999").is_err());
        assert!(Amount::from_text(usd(), "1e-2147483648").unwrap().is_zero());
        // The boundary itself stays representable.
        assert_eq!(
            iou("9.9e80").issued_parts().unwrap(),
            (9_900_000_000_000_000, 65, false)
        );
        assert!(Amount::from_text(usd(), "1e97").is_err());
    }

    #[test]
    fn test_display_positional() {
        for text in [
            "310",
            "3.1",
            "0.31",
            "0.031",
            "1234567.123456789",
            "10000000000",
            "-3.1",
        ] {
            assert_eq!(iou(text).to_string(), text);
        }
    }

    #[test]
    fn test_display_scientific() {
        assert_eq!(iou("1e-30").to_string(), "1000000000000000e-45");
        assert_eq!(iou("2e40").to_string(), "2000000000000000e25");
        assert_eq!(Amount::zero(usd()).to_string(), "0");
        assert_eq!(Amount::drops(-25).unwrap().to_string(), "-25");
    }

    #[test]
    fn test_text_roundtrip() {
        for text in ["1", "-1", "0.5", "999999999999999.9", "1e-50", "7e62"] {
            let a = iou(text);
            assert_eq!(Amount::from_text(usd(), &a.to_string()).unwrap(), a);
        }
    }

    #[test]
    fn test_canonical_zero() {
        let z = iou("0");
        assert_eq!(z, Amount::zero(usd()));
        assert_eq!(z.exponent(), -100);
        assert!(!z.is_negative());
        assert_eq!(iou("-0"), z);
    }

    #[test]
    fn test_underflow_collapses_to_zero() {
        let tiny = Amount::new(usd(), 1, -120).unwrap();
        assert!(tiny.is_zero());
        let floor = Amount::min_positive(usd());
        assert!(!floor.is_zero());
        assert_eq!(floor.issued_parts().unwrap(), (MIN_MANTISSA, MIN_EXPONENT, false));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(Amount::new(usd(), MAX_MANTISSA, MAX_EXPONENT + 1).is_err());
        assert!(Amount::new(usd(), MAX_MANTISSA, MAX_EXPONENT).is_ok());
        assert!(Amount::drops(1 + MAX_NATIVE_DROPS as i64).is_err());
    }

    #[test]
    fn test_comparison_same_issue() {
        let rows = ["-10", "-1", "-0.5", "0", "0.5", "1", "10"];
        for (i, &a) in rows.iter().enumerate() {
            for (j, &b) in rows.iter().enumerate() {
                assert_eq!(
                    iou(a).partial_cmp(&iou(b)),
                    Some(i.cmp(&j)),
                    "{a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn test_comparison_across_issues() {
        let eur = Issue::issued("EUR".parse().unwrap(), AccountId::from_u64(1));
        let a = iou("1");
        let b = Amount::from_text(eur, "1").unwrap();
        assert_eq!(a.partial_cmp(&b), None);
        assert!(a.checked_cmp(&b).is_err());
        assert_ne!(a, b);
    }

    #[test]
    fn test_negation() {
        assert_eq!(-iou("3.1"), iou("-3.1"));
        assert_eq!(-iou("0"), iou("0"));
        assert_eq!((-Amount::drops(7).unwrap()).drop_count().unwrap(), -7);
    }

    #[test]
    fn test_wrong_type_accessors() {
        assert!(iou("1").drop_count().is_err());
        assert!(Amount::drops(1).unwrap().issued_parts().is_err());
    }

    #[test]
    fn test_wire_native_roundtrip() {
        for drops in [0i64, 1, -1, 25, -25, 100_000_000_000_000_000] {
            let a = Amount::drops(drops).unwrap();
            let bytes = a.to_bytes();
            assert_eq!(bytes.len(), WIRE_NATIVE_LEN);
            assert_eq!(Amount::from_bytes(&bytes).unwrap(), a);
        }
        // Positive flag layout.
        let one = Amount::drops(1).unwrap().to_bytes();
        assert_eq!(u64::from_be_bytes(one.try_into().unwrap()), 0x4000_0000_0000_0001);
        let neg = Amount::drops(-1).unwrap().to_bytes();
        assert_eq!(u64::from_be_bytes(neg.try_into().unwrap()), 1);
    }

    #[test]
    fn test_wire_issued_roundtrip() {
        for text in ["0", "1", "-1", "0.000001", "9999999999999999e80", "1e-81"] {
            let a = iou(text);
            let bytes = a.to_bytes();
            assert_eq!(bytes.len(), WIRE_ISSUED_LEN);
            assert_eq!(Amount::from_bytes(&bytes).unwrap(), a, "{text}");
        }
    }

    #[test]
    fn test_wire_rejects_corrupt() {
        // Negative native zero.
        assert!(Amount::from_bytes(&0u64.to_be_bytes()).is_err());
        // Native magnitude above the cap.
        assert!(
            Amount::from_bytes(&(WIRE_POSITIVE | (MAX_NATIVE_DROPS + 1)).to_be_bytes())
                .is_err()
        );
        // Truncated and oversized fields.
        assert!(Amount::from_bytes(&[0u8; 7]).is_err());
        assert!(Amount::from_bytes(&[0u8; 9]).is_err());

        let mut good = iou("1").to_bytes();
        // Out-of-range mantissa (below 10^15).
        let word = (0x200u64 | 0x100 | (97 - 15) as u64) << 54 | 1;
        good[..8].copy_from_slice(&word.to_be_bytes());
        assert!(Amount::from_bytes(&good).is_err());

        // Issued zero with stray sign or exponent bits.
        let mut zero = Amount::zero(usd()).to_bytes();
        let word = WIRE_NOT_NATIVE | WIRE_POSITIVE;
        zero[..8].copy_from_slice(&word.to_be_bytes());
        assert!(Amount::from_bytes(&zero).is_err());

        // Issued field carrying the native currency code.
        let mut native_code = iou("1").to_bytes();
        native_code[8..28].copy_from_slice(&[0u8; 20]);
        assert!(Amount::from_bytes(&native_code).is_err());
    }

    #[test]
    fn test_native_exponent_folds() {
        let a = Amount::new(Issue::Native, 25, 2).unwrap();
        assert_eq!(a.drop_count().unwrap(), 2500);
        let b = Amount::new(Issue::Native, 2500, -2).unwrap();
        assert_eq!(b.drop_count().unwrap(), 25);
    }
}
