//! A resting offer.

use std::fmt;

use crate::errors::TakerError;
use crate::types::{AccountId, Amounts, Issue, Quality};

/// An offer resting in a book: an owner willing to pay `amounts.output` in
/// exchange for `amounts.input`.
///
/// The quality is fixed at placement and never changes, even as partial
/// fills shrink the legs; a resting offer keeps its original price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offer {
    owner: AccountId,
    amounts: Amounts,
    quality: Quality,
}

impl Offer {
    /// Validates and prices a new offer.
    ///
    /// Both legs must be strictly positive and denominated in different
    /// currencies, and the implied rate must be representable.
    pub fn new(owner: AccountId, amounts: Amounts) -> Result<Self, TakerError> {
        if !amounts.input.is_positive() || !amounts.output.is_positive() {
            return Err(TakerError::ZeroOffer);
        }
        if amounts.input.issue() == amounts.output.issue() {
            return Err(TakerError::RedundantOffer);
        }
        let quality = Quality::from_amounts(&amounts);
        if quality.is_zero() {
            return Err(TakerError::UnpricedOffer);
        }
        Ok(Offer {
            owner,
            amounts,
            quality,
        })
    }

    #[inline]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    #[inline]
    pub fn amounts(&self) -> Amounts {
        self.amounts
    }

    /// The placement-time quality.
    #[inline]
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Currency the owner wants to receive.
    #[inline]
    pub fn issue_in(&self) -> Issue {
        self.amounts.input.issue()
    }

    /// Currency the owner pays out.
    #[inline]
    pub fn issue_out(&self) -> Issue {
        self.amounts.output.issue()
    }

    /// Shrinks both legs by a realized flow. The quality is left untouched.
    pub(crate) fn reduce(&mut self, flow: &Amounts) -> Result<(), TakerError> {
        self.amounts.input = self.amounts.input.checked_sub(&flow.input)?;
        self.amounts.output = self.amounts.output.checked_sub(&flow.output)?;
        Ok(())
    }

    /// Whether either leg has been exhausted.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer[{}: {}]", self.owner, self.amounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Amount;

    fn usd() -> Issue {
        Issue::issued("USD".parse().unwrap(), AccountId::from_u64(9))
    }

    fn iou(text: &str) -> Amount {
        Amount::from_text(usd(), text).unwrap()
    }

    #[test]
    fn test_valid_offer() {
        let offer = Offer::new(
            AccountId::from_u64(1),
            Amounts::new(Amount::drops(100).unwrap(), iou("2")),
        )
        .unwrap();
        assert_eq!(offer.issue_in(), Issue::Native);
        assert_eq!(offer.issue_out(), usd());
        assert!(!offer.is_empty());
    }

    #[test]
    fn test_rejects_zero_and_negative_legs() {
        let owner = AccountId::from_u64(1);
        assert!(matches!(
            Offer::new(owner, Amounts::new(Amount::drops(0).unwrap(), iou("2"))),
            Err(TakerError::ZeroOffer)
        ));
        assert!(matches!(
            Offer::new(owner, Amounts::new(Amount::drops(100).unwrap(), iou("-2"))),
            Err(TakerError::ZeroOffer)
        ));
    }

    #[test]
    fn test_rejects_same_currency() {
        let owner = AccountId::from_u64(1);
        assert!(matches!(
            Offer::new(owner, Amounts::new(iou("1"), iou("2"))),
            Err(TakerError::RedundantOffer)
        ));
        assert!(matches!(
            Offer::new(
                owner,
                Amounts::new(Amount::drops(1).unwrap(), Amount::drops(2).unwrap())
            ),
            Err(TakerError::RedundantOffer)
        ));
    }

    #[test]
    fn test_reduce_keeps_quality() {
        let mut offer = Offer::new(
            AccountId::from_u64(1),
            Amounts::new(iou("10"), Amount::drops(1000).unwrap()),
        )
        .unwrap();
        let before = offer.quality();
        offer
            .reduce(&Amounts::new(iou("4"), Amount::drops(400).unwrap()))
            .unwrap();
        assert_eq!(offer.quality(), before);
        assert_eq!(offer.amounts().input, iou("6"));
        assert!(!offer.is_empty());

        offer
            .reduce(&Amounts::new(iou("6"), Amount::drops(600).unwrap()))
            .unwrap();
        assert!(offer.is_empty());
    }
}
