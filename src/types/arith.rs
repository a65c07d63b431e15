//! Amount arithmetic.
//!
//! All multiplication and division goes through 128-bit intermediates so the
//! 16-digit mantissa products never lose high bits. The nearest-rounding
//! entry points ([`multiply`], [`divide`]) bias the intermediate by half a
//! unit of the digit about to drop and then let truncating canonicalization
//! finish the job; the directed entry points ([`mul_round`], [`div_round`])
//! take an explicit [`Rounding`] and guarantee a one-sided bound on the
//! result.
//!
//! Sign convention for directed rounding: `FavorReceiver` rounds the signed
//! result up (a positive result never shrinks, a negative one moves toward
//! zero), `FavorGiver` rounds it down. A positive result that would vanish
//! under `FavorReceiver` becomes the smallest representable positive amount
//! so the receiving party is never silently zeroed.

use crate::errors::AmountError;
use crate::types::amount::{
    Amount, MAX_MANTISSA, MAX_NATIVE_DROPS, MIN_MANTISSA,
};
use crate::types::issue::Issue;

/// Rounding direction for the directed multiply/divide variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Half-up on the first dropped digit, then truncate.
    Nearest,
    /// Round the signed result down.
    FavorGiver,
    /// Round the signed result up.
    FavorReceiver,
}

const TEN_TO_14: u128 = 100_000_000_000_000;
const TEN_TO_17: u128 = 100_000_000_000_000_000;

// Native fast-path guards: products below these bounds fit 63 bits exactly.
const NATIVE_MUL_MIN_CAP: u64 = 3_000_000_000;
const NATIVE_MUL_HIGH_CAP: u64 = 2_095_475_792;

// ============================================================================
// Addition / subtraction
// ============================================================================

impl Amount {
    /// Adds two amounts of the same issue; a zero operand of any issue is
    /// the identity.
    ///
    /// Issued operands are aligned to the larger exponent before the signed
    /// mantissas are summed, so up to one unit of the smaller operand's low
    /// digit can be lost. A residue with magnitude 10 or less collapses to
    /// zero, which keeps near-cancellations from manufacturing dust.
    pub fn checked_add(&self, other: &Amount) -> Result<Amount, AmountError> {
        if self.is_zero() {
            return Ok(*other);
        }
        if other.is_zero() {
            return Ok(*self);
        }
        if self.issue != other.issue {
            return Err(AmountError::CurrencyMismatch {
                left: self.issue,
                right: other.issue,
            });
        }

        if self.is_native() {
            let sum = self
                .drop_count()?
                .checked_add(other.drop_count()?)
                .ok_or(AmountError::ValueOverflow("native sum"))?;
            if sum.unsigned_abs() > MAX_NATIVE_DROPS {
                return Err(AmountError::ValueOverflow("native sum"));
            }
            return Amount::drops(sum);
        }

        let mut m1 = self.signed_mantissa();
        let mut m2 = other.signed_mantissa();
        let mut e1 = self.exponent;
        let mut e2 = other.exponent;
        while e1 < e2 {
            m1 /= 10;
            e1 += 1;
        }
        while e2 < e1 {
            m2 /= 10;
            e2 += 1;
        }
        let sum = m1 + m2;
        if (-10..=10).contains(&sum) {
            return Ok(Amount::zero(self.issue));
        }
        Amount::from_parts(self.issue, sum.unsigned_abs(), e1, sum < 0)
    }

    /// Subtracts `other` from `self`; same rules as [`Amount::checked_add`].
    pub fn checked_sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        self.checked_add(&-*other)
    }

    fn signed_mantissa(&self) -> i64 {
        let magnitude = self.mantissa as i64;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

// ============================================================================
// Multiplication / division, nearest rounding
// ============================================================================

/// Multiplies two amounts, producing an amount of `issue`.
///
/// When everything involved is native the product is computed exactly or
/// rejected as an overflow. Otherwise both mantissas are normalized into
/// issued range and the 128-bit product is scaled down by 10^14 with a
/// half-up bias before canonicalization truncates to 16 digits.
pub fn multiply(v1: &Amount, v2: &Amount, issue: Issue) -> Result<Amount, AmountError> {
    if v1.is_zero() || v2.is_zero() {
        return Ok(Amount::zero(issue));
    }
    let negative = v1.is_negative() != v2.is_negative();

    if v1.is_native() && v2.is_native() && issue.is_native() {
        let product = native_product(v1.mantissa(), v2.mantissa())?;
        return Amount::from_parts(issue, product, 0, negative);
    }

    let (m1, e1) = normalized(v1);
    let (m2, e2) = normalized(v2);
    // Native mantissas can sit as high as 10^17, so the scaled product can
    // exceed 64 bits and must be rejected, not truncated.
    let wide = (m1 as u128 * m2 as u128) / TEN_TO_14 + 7;
    if wide > u64::MAX as u128 {
        return Err(AmountError::ValueOverflow("product"));
    }
    Amount::from_parts(issue, wide as u64, e1 + e2 + 14, negative)
}

/// Divides `num` by `den`, producing an amount of `issue`.
pub fn divide(num: &Amount, den: &Amount, issue: Issue) -> Result<Amount, AmountError> {
    if den.is_zero() {
        return Err(AmountError::DivideByZero);
    }
    if num.is_zero() {
        return Ok(Amount::zero(issue));
    }
    let negative = num.is_negative() != den.is_negative();
    let (mn, en) = normalized(num);
    let (md, ed) = normalized(den);
    let amount = (mn as u128 * TEN_TO_17) / md as u128 + 5;
    Amount::from_parts(issue, amount as u64, en - ed - 17, negative)
}

// ============================================================================
// Multiplication / division, directed rounding
// ============================================================================

/// Multiplies with a directed rounding bound. `Rounding::Nearest` defers to
/// [`multiply`].
pub fn mul_round(
    v1: &Amount,
    v2: &Amount,
    issue: Issue,
    rounding: Rounding,
) -> Result<Amount, AmountError> {
    let round_up = match rounding {
        Rounding::Nearest => return multiply(v1, v2, issue),
        Rounding::FavorGiver => false,
        Rounding::FavorReceiver => true,
    };
    if v1.is_zero() || v2.is_zero() {
        return Ok(Amount::zero(issue));
    }
    let negative = v1.is_negative() != v2.is_negative();

    if v1.is_native() && v2.is_native() && issue.is_native() {
        let product = native_product(v1.mantissa(), v2.mantissa())?;
        return Amount::from_parts(issue, product, 0, negative);
    }

    let (m1, e1) = normalized(v1);
    let (m2, e2) = normalized(v2);
    // Rounding the signed value up means rounding the magnitude up exactly
    // when the result is positive.
    let magnitude_up = negative != round_up;
    let bias = if magnitude_up { TEN_TO_14 - 1 } else { 0 };
    let wide = (m1 as u128 * m2 as u128 + bias) / TEN_TO_14;
    if wide > u64::MAX as u128 {
        return Err(AmountError::ValueOverflow("product"));
    }
    let mut amount = wide as u64;
    let mut exponent = e1 + e2 + 14;
    if magnitude_up {
        round_scaling(issue.is_native(), &mut amount, &mut exponent);
    }
    let result = Amount::from_parts(issue, amount, exponent, negative)?;
    if round_up && !negative && result.is_zero() {
        return Ok(Amount::min_positive(issue));
    }
    Ok(result)
}

/// Divides with a directed rounding bound. `Rounding::Nearest` defers to
/// [`divide`].
pub fn div_round(
    num: &Amount,
    den: &Amount,
    issue: Issue,
    rounding: Rounding,
) -> Result<Amount, AmountError> {
    let round_up = match rounding {
        Rounding::Nearest => return divide(num, den, issue),
        Rounding::FavorGiver => false,
        Rounding::FavorReceiver => true,
    };
    if den.is_zero() {
        return Err(AmountError::DivideByZero);
    }
    if num.is_zero() {
        return Ok(Amount::zero(issue));
    }
    let negative = num.is_negative() != den.is_negative();
    let (mn, en) = normalized(num);
    let (md, ed) = normalized(den);

    let magnitude_up = negative != round_up;
    let bias = if magnitude_up { md as u128 - 1 } else { 0 };
    let mut amount = ((mn as u128 * TEN_TO_17 + bias) / md as u128) as u64;
    let mut exponent = en - ed - 17;
    if magnitude_up {
        round_scaling(issue.is_native(), &mut amount, &mut exponent);
    }
    let result = Amount::from_parts(issue, amount, exponent, negative)?;
    if round_up && !negative && result.is_zero() {
        return Ok(Amount::min_positive(issue));
    }
    Ok(result)
}

// ============================================================================
// Internals
// ============================================================================

/// Mantissa and exponent with native drop counts scaled into issued range.
fn normalized(v: &Amount) -> (u64, i32) {
    let mut mantissa = v.mantissa();
    let mut exponent = v.exponent();
    if v.is_native() {
        while mantissa < MIN_MANTISSA {
            mantissa *= 10;
            exponent -= 1;
        }
    }
    (mantissa, exponent)
}

/// Exact product of two drop magnitudes, or an overflow error. The guards
/// bound the product below 2^63 without a 128-bit multiply.
fn native_product(a: u64, b: u64) -> Result<u64, AmountError> {
    let (min_v, max_v) = if a < b { (a, b) } else { (b, a) };
    if min_v > NATIVE_MUL_MIN_CAP || (max_v >> 32) * min_v > NATIVE_MUL_HIGH_CAP {
        return Err(AmountError::ValueOverflow("native product"));
    }
    Ok(min_v * max_v)
}

/// Pre-biases a magnitude that truncating canonicalization is about to scale
/// down, so the dropped digits round up instead.
fn round_scaling(native: bool, value: &mut u64, exponent: &mut i32) {
    if native {
        if *exponent < 0 {
            let mut loops = 0;
            while *exponent < -1 {
                *value /= 10;
                *exponent += 1;
                loops += 1;
            }
            // Canonicalization performs the final divide by ten.
            *value += if loops >= 2 { 9 } else { 10 };
        }
    } else if *value > MAX_MANTISSA {
        while *value > 10 * MAX_MANTISSA {
            *value /= 10;
            *exponent += 1;
        }
        *value += 9;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::issue::AccountId;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rust_decimal::Decimal;

    fn usd() -> Issue {
        Issue::issued("USD".parse().unwrap(), AccountId::from_u64(1))
    }

    fn iou(text: &str) -> Amount {
        Amount::from_text(usd(), text).unwrap()
    }

    #[test]
    fn test_add_native() {
        let a = Amount::drops(100).unwrap();
        let b = Amount::drops(-30).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().drop_count().unwrap(), 70);
        assert_eq!(a.checked_sub(&b).unwrap().drop_count().unwrap(), 130);
        let cap = Amount::drops(MAX_NATIVE_DROPS as i64).unwrap();
        assert!(cap.checked_add(&Amount::drops(1).unwrap()).is_err());
    }

    #[test]
    fn test_add_issued() {
        assert_eq!(iou("1.5").checked_add(&iou("2.25")).unwrap(), iou("3.75"));
        assert_eq!(iou("1").checked_sub(&iou("3")).unwrap(), iou("-2"));
    }

    #[test]
    fn test_add_zero_identity() {
        let zero_eur = Amount::zero(Issue::issued(
            "EUR".parse().unwrap(),
            AccountId::from_u64(1),
        ));
        assert_eq!(iou("5").checked_add(&zero_eur).unwrap(), iou("5"));
        assert_eq!(zero_eur.checked_add(&iou("5")).unwrap(), iou("5"));
    }

    #[test]
    fn test_add_mismatched_issues() {
        let eur = Amount::from_text(
            Issue::issued("EUR".parse().unwrap(), AccountId::from_u64(1)),
            "1",
        )
        .unwrap();
        assert!(iou("1").checked_add(&eur).is_err());
    }

    #[test]
    fn test_add_cancellation_residue_is_zero() {
        // The last mantissa digit of the near-equal operand is lost.
        let sum = iou("1.000000000000001").checked_sub(&iou("1")).unwrap();
        assert!(sum.is_zero());
        let exact = iou("3.75").checked_sub(&iou("3.75")).unwrap();
        assert!(exact.is_zero());
    }

    #[test]
    fn test_multiply_native() {
        let a = Amount::drops(20).unwrap();
        let b = Amount::drops(3).unwrap();
        let p = multiply(&a, &b, Issue::Native).unwrap();
        assert_eq!(p.drop_count().unwrap(), 60);
        let n = multiply(&(-a), &b, Issue::Native).unwrap();
        assert_eq!(n.drop_count().unwrap(), -60);
    }

    #[test]
    fn test_multiply_native_overflow_guard() {
        let big = Amount::drops(4_000_000_000).unwrap();
        assert!(multiply(&big, &big, Issue::Native).is_err());
        let edge = Amount::drops(3_000_000_000).unwrap();
        assert_eq!(
            multiply(&edge, &Amount::drops(2).unwrap(), Issue::Native)
                .unwrap()
                .drop_count()
                .unwrap(),
            6_000_000_000
        );
    }

    #[test]
    fn test_multiply_large_native_mantissas_overflow() {
        // Two near-maximal drop counts: the scaled 128-bit product no longer
        // fits 64 bits and must be rejected, not truncated.
        let big = Amount::drops(43_000_000_000_000_000).unwrap();
        assert!(matches!(
            multiply(&big, &big, usd()),
            Err(AmountError::ValueOverflow(_))
        ));
        assert!(matches!(
            mul_round(&big, &big, usd(), Rounding::FavorReceiver),
            Err(AmountError::ValueOverflow(_))
        ));
        // Just inside the limit the product still canonicalizes.
        let edge = Amount::drops(42_000_000_000_000_000).unwrap();
        assert_eq!(
            multiply(&edge, &edge, usd()).unwrap().issued_parts().unwrap(),
            (1_764_000_000_000_000, 18, false)
        );
    }

    #[test]
    fn test_multiply_issued() {
        assert_eq!(multiply(&iou("20"), &iou("3"), usd()).unwrap(), iou("60"));
        assert_eq!(
            multiply(&iou("1.5"), &iou("1.5"), usd()).unwrap(),
            iou("2.25")
        );
        assert!(multiply(&iou("0"), &iou("3"), usd()).unwrap().is_zero());
    }

    #[test]
    fn test_multiply_mixed_native_issued() {
        let drops = Amount::drops(20).unwrap();
        assert_eq!(multiply(&drops, &iou("3"), usd()).unwrap(), iou("60"));
        let back = multiply(&iou("20"), &Amount::drops(3).unwrap(), Issue::Native).unwrap();
        assert_eq!(back.drop_count().unwrap(), 60);
    }

    #[test]
    fn test_multiply_underflow_is_zero() {
        let tiny = iou("1e-48");
        assert!(multiply(&tiny, &tiny, usd()).unwrap().is_zero());
    }

    #[test]
    fn test_divide_issued() {
        assert_eq!(divide(&iou("60"), &iou("3"), usd()).unwrap(), iou("20"));
        assert_eq!(
            divide(&iou("1"), &iou("1.5"), usd()).unwrap().to_string(),
            "0.6666666666666667"
        );
        assert_eq!(
            divide(&iou("4"), &iou("1.5"), usd()).unwrap().to_string(),
            "2.666666666666666"
        );
    }

    #[test]
    fn test_divide_by_zero() {
        assert!(matches!(
            divide(&iou("1"), &iou("0"), usd()),
            Err(AmountError::DivideByZero)
        ));
        assert!(divide(&iou("0"), &iou("1"), usd()).unwrap().is_zero());
    }

    #[test]
    fn test_div_round_native() {
        let seven = Amount::drops(7).unwrap();
        let three = Amount::drops(3).unwrap();
        let up = div_round(&seven, &three, Issue::Native, Rounding::FavorReceiver).unwrap();
        assert_eq!(up.drop_count().unwrap(), 3);
        let down = div_round(&seven, &three, Issue::Native, Rounding::FavorGiver).unwrap();
        assert_eq!(down.drop_count().unwrap(), 2);
    }

    #[test]
    fn test_div_round_issued() {
        let up = div_round(&iou("1"), &iou("3"), usd(), Rounding::FavorReceiver).unwrap();
        assert_eq!(up.to_string(), "0.3333333333333334");
        let down = div_round(&iou("1"), &iou("3"), usd(), Rounding::FavorGiver).unwrap();
        assert_eq!(down.to_string(), "0.3333333333333333");
    }

    #[test]
    fn test_directed_rounding_orders_results() {
        let pairs = [("7", "3"), ("1", "7"), ("22.5", "0.7"), ("1e-5", "3e7")];
        for (n, d) in pairs {
            let lo = div_round(&iou(n), &iou(d), usd(), Rounding::FavorGiver).unwrap();
            let mid = divide(&iou(n), &iou(d), usd()).unwrap();
            let hi = div_round(&iou(n), &iou(d), usd(), Rounding::FavorReceiver).unwrap();
            assert!(lo <= mid && mid <= hi, "{n}/{d}");
        }
    }

    #[test]
    fn test_directed_rounding_negative_mirrors() {
        let up = div_round(&iou("-1"), &iou("3"), usd(), Rounding::FavorReceiver).unwrap();
        assert_eq!(up.to_string(), "-0.3333333333333333");
        let down = div_round(&iou("-1"), &iou("3"), usd(), Rounding::FavorGiver).unwrap();
        assert_eq!(down.to_string(), "-0.3333333333333334");
    }

    #[test]
    fn test_round_up_never_yields_zero() {
        let tiny = iou("1e-48");
        let p = mul_round(&tiny, &tiny, usd(), Rounding::FavorReceiver).unwrap();
        assert_eq!(p, Amount::min_positive(usd()));
        let p = mul_round(&tiny, &tiny, usd(), Rounding::FavorGiver).unwrap();
        assert!(p.is_zero());

        let drop = Amount::drops(1).unwrap();
        let q = mul_round(&drop, &iou("1e-30"), Issue::Native, Rounding::FavorReceiver)
            .unwrap();
        assert_eq!(q.drop_count().unwrap(), 1);
    }

    #[test]
    fn test_exact_products_random_sweep() {
        // Products of seven-digit factors fit in sixteen significant digits,
        // so nearest multiplication must reproduce them exactly and agree
        // with an independent decimal implementation.
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..2_000 {
            let a: u64 = rng.gen_range(1..10_000_000);
            let b: u64 = rng.gen_range(1..10_000_000);
            let pa = Amount::from_text(usd(), &a.to_string()).unwrap();
            let pb = Amount::from_text(usd(), &b.to_string()).unwrap();
            let product = multiply(&pa, &pb, usd()).unwrap();
            assert_eq!(product, iou(&(a * b).to_string()), "{a}*{b}");

            let oracle = Decimal::from(a) * Decimal::from(b);
            assert_eq!(product.to_string(), oracle.normalize().to_string());
        }
    }

    #[test]
    fn test_divide_then_multiply_random_sweep() {
        // q = n/d then q*d must land within one unit in the last place of n.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ulp = iou("1e-14");
        for _ in 0..2_000 {
            let n: u64 = rng.gen_range(1..100_000_000);
            let d: u64 = rng.gen_range(1..100_000_000);
            let an = Amount::from_text(usd(), &n.to_string()).unwrap();
            let ad = Amount::from_text(usd(), &d.to_string()).unwrap();
            let q = divide(&an, &ad, usd()).unwrap();
            let back = multiply(&q, &ad, usd()).unwrap();
            let err = back.checked_sub(&an).unwrap().abs();
            let scale = multiply(&an, &ulp, usd()).unwrap();
            assert!(
                err <= scale || err <= iou("1e-6"),
                "{n}/{d}: err {err}"
            );
        }
    }
}
