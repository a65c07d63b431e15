//! Currency and account identity types.
//!
//! ## Design
//!
//! An [`Issue`] names a currency as traded on the ledger. It is a closed
//! tagged union: either the ledger's built-in native currency, or an issued
//! currency identified by a 20-byte currency code together with the 20-byte
//! account that issues it. Every branch of the exchange core pattern-matches
//! on this enum; there is no runtime-extensible currency registry.
//!
//! ## Currency codes
//!
//! A currency code is 160 bits. Two renderings exist:
//!
//! - **Standard**: bytes 0-11 and 15-19 are zero and bytes 12-14 hold a
//!   three-character ASCII ticker (e.g. `USD`).
//! - **Custom**: anything else renders as 40 uppercase hex characters.
//!
//! The all-zero code is reserved for the native currency and renders as
//! its ticker.

use std::fmt;
use std::str::FromStr;

use crate::errors::AmountError;

/// Ticker of the ledger's native currency.
pub const NATIVE_TICKER: &str = "NAT";

// ============================================================================
// CurrencyCode
// ============================================================================

/// A 160-bit currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(pub [u8; 20]);

impl CurrencyCode {
    /// The reserved all-zero code of the native currency.
    pub const NATIVE: CurrencyCode = CurrencyCode([0u8; 20]);

    /// Sentinel code used for dimensionless ratios (rates, qualities).
    /// Never appears on the ledger.
    pub const NO_CURRENCY: CurrencyCode = {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        CurrencyCode(bytes)
    };

    /// Raw bytes of the code.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the reserved native code.
    #[inline]
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    /// Whether the code is in the standard three-letter layout.
    fn is_standard(&self) -> bool {
        self.0[..12].iter().all(|&b| b == 0)
            && self.0[15..].iter().all(|&b| b == 0)
            && self.0[12..15]
                .iter()
                .all(|&b| b.is_ascii_alphanumeric() || b"?!@#$%^&*<>(){}[]|".contains(&b))
            && self.0[12..15] != [0, 0, 0]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "{}", NATIVE_TICKER)
        } else if self.is_standard() {
            // Safe: is_standard() only accepts ASCII bytes
            for &b in &self.0[12..15] {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{}", hex::encode_upper(self.0))
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = AmountError;

    /// Parses the native ticker, a three-character standard code, or a
    /// 40-character hex code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == NATIVE_TICKER {
            return Ok(Self::NATIVE);
        }

        if s.len() == 3 && s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            let mut bytes = [0u8; 20];
            bytes[12..15].copy_from_slice(s.as_bytes());
            return Ok(CurrencyCode(bytes));
        }

        if s.len() == 40 {
            let raw = hex::decode(s)
                .map_err(|_| AmountError::InvalidCurrency(s.to_string()))?;
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&raw);
            if bytes == [0u8; 20] {
                // The all-zero code is the native currency; spelling it in
                // hex would create a second spelling of the same identity.
                return Err(AmountError::InvalidCurrency(s.to_string()));
            }
            return Ok(CurrencyCode(bytes));
        }

        Err(AmountError::InvalidCurrency(s.to_string()))
    }
}

// ============================================================================
// AccountId
// ============================================================================

/// A 160-bit account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    /// Sentinel account paired with [`CurrencyCode::NO_CURRENCY`].
    pub const NO_ACCOUNT: AccountId = {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        AccountId(bytes)
    };

    /// Builds an identifier from an integer, big-endian in the low bytes.
    /// Convenient for tests and fixtures.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        AccountId(bytes)
    }

    /// Raw bytes of the identifier.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for AccountId {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 40 {
            return Err(AmountError::InvalidAccount(s.to_string()));
        }
        let raw =
            hex::decode(s).map_err(|_| AmountError::InvalidAccount(s.to_string()))?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(AccountId(bytes))
    }
}

// ============================================================================
// Issue
// ============================================================================

/// Identity of a currency: the native currency, or a code plus issuer.
///
/// Two issues are equal iff they are the same variant and, for issued
/// currencies, both code and issuer match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    /// The ledger's built-in currency, counted in drops.
    Native,
    /// An issued (IOU) currency.
    Issued {
        /// 20-byte currency code.
        currency: CurrencyCode,
        /// Account that issues this currency.
        issuer: AccountId,
    },
}

impl Issue {
    /// Builds an issued-currency identity.
    pub fn issued(currency: CurrencyCode, issuer: AccountId) -> Self {
        Issue::Issued { currency, issuer }
    }

    /// Sentinel issue for dimensionless ratios. Quality and rate values are
    /// carried as amounts of this issue so they can reuse the amount
    /// arithmetic without naming a real currency.
    pub fn no_issue() -> Self {
        Issue::Issued {
            currency: CurrencyCode::NO_CURRENCY,
            issuer: AccountId::NO_ACCOUNT,
        }
    }

    /// Whether this is the native currency.
    #[inline]
    pub fn is_native(&self) -> bool {
        matches!(self, Issue::Native)
    }

    /// The currency code (the reserved zero code for the native currency).
    pub fn currency(&self) -> CurrencyCode {
        match self {
            Issue::Native => CurrencyCode::NATIVE,
            Issue::Issued { currency, .. } => *currency,
        }
    }

    /// The issuing account, if this is an issued currency.
    pub fn issuer(&self) -> Option<AccountId> {
        match self {
            Issue::Native => None,
            Issue::Issued { issuer, .. } => Some(*issuer),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Native => write!(f, "{}", NATIVE_TICKER),
            Issue::Issued { currency, issuer } => write!(f, "{}/{}", currency, issuer),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_code_display() {
        assert_eq!(CurrencyCode::NATIVE.to_string(), "NAT");
        assert_eq!("NAT".parse::<CurrencyCode>().unwrap(), CurrencyCode::NATIVE);
    }

    #[test]
    fn test_standard_code_roundtrip() {
        let usd: CurrencyCode = "USD".parse().unwrap();
        assert_eq!(usd.to_string(), "USD");
        assert!(!usd.is_native());
        assert_eq!(usd.as_bytes()[12..15], *b"USD");
    }

    #[test]
    fn test_custom_code_roundtrip() {
        let cur = "015841551A748AD2C1F76FF6ECB0CCCD00000000";
        let code: CurrencyCode = cur.parse().unwrap();
        assert_eq!(code.to_string(), cur);
    }

    #[test]
    fn test_invalid_codes() {
        assert!("US".parse::<CurrencyCode>().is_err());
        assert!("USDA".parse::<CurrencyCode>().is_err());
        assert!("not hex and not three characters".parse::<CurrencyCode>().is_err());
        // Hex spelling of the native code is rejected
        assert!("0000000000000000000000000000000000000000"
            .parse::<CurrencyCode>()
            .is_err());
    }

    #[test]
    fn test_account_id_from_u64() {
        let a = AccountId::from_u64(0x4701);
        let b = AccountId::from_u64(0x4701);
        let c = AccountId::from_u64(0x4702);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_bytes()[18..], [0x47, 0x01]);
    }

    #[test]
    fn test_account_id_display_roundtrip() {
        let a = AccountId::from_u64(0x4985601);
        let s = a.to_string();
        assert_eq!(s.len(), 40);
        assert_eq!(s.parse::<AccountId>().unwrap(), a);
    }

    #[test]
    fn test_account_id_parse_rejects_bad_text() {
        assert!(matches!(
            "zz".parse::<AccountId>(),
            Err(AmountError::InvalidAccount(_))
        ));
        let not_hex = "G".repeat(40);
        assert!(matches!(
            not_hex.parse::<AccountId>(),
            Err(AmountError::InvalidAccount(_))
        ));
    }

    #[test]
    fn test_issue_equality() {
        let usd: CurrencyCode = "USD".parse().unwrap();
        let a1 = AccountId::from_u64(1);
        let a2 = AccountId::from_u64(2);

        assert_eq!(Issue::Native, Issue::Native);
        assert_eq!(Issue::issued(usd, a1), Issue::issued(usd, a1));
        assert_ne!(Issue::issued(usd, a1), Issue::issued(usd, a2));
        assert_ne!(Issue::issued(usd, a1), Issue::Native);
    }

    #[test]
    fn test_no_issue_is_not_native() {
        let no = Issue::no_issue();
        assert!(!no.is_native());
        assert_ne!(no.currency(), CurrencyCode::NATIVE);
    }
}
