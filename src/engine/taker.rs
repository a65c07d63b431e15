//! The taker: crosses resting offers against a desired exchange.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::book::Offer;
use crate::engine::{CrossType, FundSource, Side};
use crate::errors::TakerError;
use crate::types::{
    composed_quality, div_round, divide, effective_rate, mul_round, multiply, AccountId,
    Amount, Amounts, Issue, Quality, Rate, Rounding,
};

/// One computed crossing: the legs as the order sees them and the legs as
/// the issuers see them (grossed up by transfer fees; identical for native
/// legs).
#[derive(Debug, Clone, Copy)]
struct Flow {
    order: Amounts,
    issuers: Amounts,
}

impl Flow {
    fn check(&self) -> Result<(), TakerError> {
        if self.order.input.is_native() && self.order.output.is_native() {
            return Err(TakerError::FlowInvariant("native flows on both legs"));
        }
        if self.order.input.is_negative() || self.order.output.is_negative() {
            return Err(TakerError::FlowInvariant("negative order leg"));
        }
        if self.issuers.input.is_negative() || self.issuers.output.is_negative() {
            return Err(TakerError::FlowInvariant("negative issuer leg"));
        }
        Ok(())
    }
}

/// `a < b`, false when the two are not comparable.
///
/// Inside a flow every binding clamp compares like currencies; the one
/// cross-currency case is the buy-side output limit during the native leg of
/// a bridge, where the limit cannot bind and must be skipped.
fn lt(a: &Amount, b: &Amount) -> bool {
    matches!(a.partial_cmp(b), Some(Ordering::Less))
}

fn max(a: Amount, b: Amount) -> Amount {
    if lt(&a, &b) {
        b
    } else {
        a
    }
}

// ============================================================================
// Taker
// ============================================================================

/// A taker crossing the book: an account spending `input` currency to
/// acquire `output` currency, limited by its offer, its side, its spendable
/// funds and its quality threshold.
///
/// The taker never mutates balances. It tracks what it has consumed so the
/// funds it sees through the [`FundSource`] shrink across calls, and reports
/// each crossing as the realized legs for the caller to apply.
pub struct Taker<F: FundSource> {
    account: AccountId,
    cross_type: CrossType,
    original: Amounts,
    remaining: Amounts,
    /// Quality of the taker's own offer, used to scale the residual.
    quality: Quality,
    /// Offers strictly below this quality are not taken.
    threshold: Quality,
    sell: bool,
    rate_in: Rate,
    rate_out: Rate,
    /// Total input currency spent so far.
    consumed: Amount,
    funds: F,
}

impl<F: FundSource> Taker<F> {
    /// Builds a taker for `offer`: spend `offer.input` to acquire
    /// `offer.output`.
    ///
    /// `rate_in`/`rate_out` are the issuer transfer rates of the two
    /// currencies; pass [`Rate::PARITY`] when an issuer charges no fee.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account: AccountId,
        offer: Amounts,
        threshold: Quality,
        side: Side,
        rate_in: Rate,
        rate_out: Rate,
        funds: F,
    ) -> Result<Self, TakerError> {
        if !offer.input.is_positive() || !offer.output.is_positive() {
            return Err(TakerError::ZeroOffer);
        }
        let cross_type = match (offer.input.is_native(), offer.output.is_native()) {
            (true, true) => return Err(TakerError::NativeForNative),
            (true, false) => CrossType::NativeToIssued,
            (false, true) => CrossType::IssuedToNative,
            (false, false) => {
                if offer.input.issue() == offer.output.issue() {
                    return Err(TakerError::RedundantOffer);
                }
                CrossType::IssuedToIssued
            }
        };
        if rate_in.value() == 0 || rate_out.value() == 0 {
            return Err(TakerError::InvalidRate);
        }
        let quality = Quality::from_amounts(&offer);
        if quality.is_zero() || threshold.is_zero() {
            return Err(TakerError::UnpricedOffer);
        }
        Ok(Taker {
            account,
            cross_type,
            original: offer,
            remaining: offer,
            quality,
            threshold,
            sell: side == Side::Sell,
            rate_in,
            rate_out,
            consumed: Amount::zero(offer.input.issue()),
            funds,
        })
    }

    #[inline]
    pub fn account(&self) -> AccountId {
        self.account
    }

    #[inline]
    pub fn cross_type(&self) -> CrossType {
        self.cross_type
    }

    /// Currency the taker pays.
    #[inline]
    pub fn issue_in(&self) -> Issue {
        self.original.input.issue()
    }

    /// Currency the taker acquires.
    #[inline]
    pub fn issue_out(&self) -> Issue {
        self.original.output.issue()
    }

    /// What is still left of the taker's desire.
    #[inline]
    pub fn remaining(&self) -> Amounts {
        self.remaining
    }

    /// Total input currency spent across all crossings so far.
    #[inline]
    pub fn consumed(&self) -> Amount {
        self.consumed
    }

    /// Spendable input funds: the balance minus everything already spent
    /// through this taker.
    fn taker_funds(&self) -> Result<Amount, TakerError> {
        let balance = self.funds.funds(&self.account, &self.issue_in());
        Ok(balance.checked_sub(&self.consumed)?)
    }

    /// Whether the taker has no more crossing to do: input offer spent,
    /// output satisfied (buy only), or funds exhausted.
    pub fn done(&self) -> bool {
        if !self.remaining.input.is_positive() {
            return true;
        }
        if !self.sell && !self.remaining.output.is_positive() {
            return true;
        }
        match self.taker_funds() {
            Ok(funds) => !funds.is_positive(),
            Err(_) => true,
        }
    }

    /// The unfilled part of the taker's offer, scaled through its original
    /// quality so a partially-crossed offer can rest at its placement price.
    ///
    /// A seller keeps the remaining input and recomputes the output; a buyer
    /// keeps the remaining output and recomputes the input. Rounding favors
    /// the resting side.
    pub fn remaining_offer(&self) -> Result<Amounts, TakerError> {
        if self.done() {
            return Ok(self.original.zeroed());
        }
        if self.remaining == self.original {
            return Ok(self.original);
        }
        let rate = self.quality.rate()?;
        if self.sell {
            let output = div_round(
                &self.remaining.input,
                &rate,
                self.issue_out(),
                Rounding::FavorReceiver,
            )?;
            Ok(Amounts::new(self.remaining.input, output))
        } else {
            let input = mul_round(
                &self.remaining.output,
                &rate,
                self.issue_in(),
                Rounding::FavorReceiver,
            )?;
            Ok(Amounts::new(input, self.remaining.output))
        }
    }

    // ------------------------------------------------------------------------
    // Crossing
    // ------------------------------------------------------------------------

    /// Crosses one resting offer, returning the realized legs.
    ///
    /// Offers below the quality threshold, offers whose owner cannot fund
    /// the output leg, and calls after the taker is done all return zeroed
    /// legs; the caller decides whether to skip or retire the offer.
    pub fn cross(&mut self, offer: &Offer) -> Result<Amounts, TakerError> {
        if offer.issue_in() != self.issue_in() || offer.issue_out() != self.issue_out() {
            return Err(TakerError::CurrencyMismatch);
        }
        let amounts = offer.amounts();
        if !amounts.input.is_positive() || !amounts.output.is_positive() {
            return Err(TakerError::ZeroOffer);
        }
        if offer.quality() < self.threshold {
            debug!(%offer, "quality below threshold, not taken");
            return Ok(amounts.zeroed());
        }
        let owner_funds = self.funds.funds(&offer.owner(), &self.issue_out());
        if !owner_funds.is_positive() {
            debug!(%offer, "owner cannot fund the output leg");
            return Ok(amounts.zeroed());
        }
        if self.done() {
            return Ok(amounts.zeroed());
        }

        let flow = self.do_cross(amounts, offer.quality(), &offer.owner(), &owner_funds)?;
        Ok(flow.order)
    }

    /// Crosses a pair of offers bridged through the native currency:
    /// `leg1` sells native for the taker's input currency, `leg2` sells the
    /// taker's output currency for native.
    ///
    /// Returns the realized legs of both offers. The native amount leg1 pays
    /// out always equals the native amount leg2 takes in.
    pub fn cross_bridged(
        &mut self,
        leg1: &Offer,
        leg2: &Offer,
    ) -> Result<(Amounts, Amounts), TakerError> {
        if self.cross_type != CrossType::IssuedToIssued {
            return Err(TakerError::BadBridge);
        }
        if !leg1.issue_out().is_native() || !leg2.issue_in().is_native() {
            return Err(TakerError::BadBridge);
        }
        if leg1.issue_in() != self.issue_in() || leg2.issue_out() != self.issue_out() {
            return Err(TakerError::CurrencyMismatch);
        }
        let mut offer1 = leg1.amounts();
        let mut offer2 = leg2.amounts();
        if offer1.is_empty() || offer2.is_empty() {
            return Err(TakerError::ZeroOffer);
        }

        let q1 = leg1.quality();
        let q2 = leg2.quality();
        let composed = composed_quality(q1, q2)?;
        if composed < self.threshold {
            debug!(%composed, "bridged quality below threshold, not taken");
            return Ok((offer1.zeroed(), offer2.zeroed()));
        }
        if self.done() {
            return Ok((offer1.zeroed(), offer2.zeroed()));
        }

        let owner1 = leg1.owner();
        let owner2 = leg2.owner();

        // Funding of the three parties involved. A taker crossing its own
        // offer, or one owner carrying both legs, is always self-funded for
        // the overlapping amounts.
        let mut leg1_in_funds = self.taker_funds()?;
        if self.account == owner1 {
            leg1_in_funds = max(leg1_in_funds, offer1.input);
        }
        let mut leg2_out_funds = self.funds.funds(&owner2, &self.issue_out());
        if self.account == owner2 {
            leg2_out_funds = max(leg2_out_funds, offer2.output);
        }
        let mut native_funds = self.funds.funds(&owner1, &Issue::Native);
        if owner1 == owner2 {
            native_funds = max(offer1.output, offer2.input);
        }

        // Leg 1 can never need more input than the taker still wants to
        // spend; clamping here keeps depletion monotonic.
        if lt(&self.remaining.input, &offer1.input) {
            offer1.input = self.remaining.input;
            offer1.output = div_round(
                &offer1.input,
                &q1.rate()?,
                Issue::Native,
                Rounding::FavorReceiver,
            )?;
        }

        let rate1 = effective_rate(self.rate_in, &self.issue_in(), &self.account, &owner1);
        let mut flow1 =
            self.flow_issued_to_native(offer1, q1, &native_funds, &leg1_in_funds, rate1)?;

        // Leg 2 consumes what leg 1 produced, no more.
        if lt(&flow1.order.output, &offer2.input) {
            offer2.input = flow1.order.output;
            offer2.output = div_round(
                &offer2.input,
                &q2.rate()?,
                self.issue_out(),
                Rounding::FavorReceiver,
            )?;
        }
        let rate2 = effective_rate(self.rate_out, &self.issue_out(), &owner2, &self.account);
        let flow2 =
            self.flow_native_to_issued(offer2, q2, &leg2_out_funds, &native_funds, rate2)?;

        // If leg 2 could not carry everything, shrink leg 1 to match.
        if lt(&flow2.order.input, &flow1.order.output) {
            flow1.order.output = flow2.order.input;
            flow1.order.input = mul_round(
                &flow1.order.output,
                &q1.rate()?,
                self.issue_in(),
                Rounding::FavorReceiver,
            )?;
            flow1.issuers.input = rate1.multiply(&flow1.order.input)?;
            flow1.issuers.output = flow1.order.output;
        }

        flow1.check()?;
        flow2.check()?;
        trace!(leg1 = %flow1.order, leg2 = %flow2.order, "bridged flows");
        self.settle(&flow1.order.input, &flow2.order.output)?;
        Ok((flow1.order, flow2.order))
    }

    fn do_cross(
        &mut self,
        offer: Amounts,
        quality: Quality,
        owner: &AccountId,
        owner_funds: &Amount,
    ) -> Result<Flow, TakerError> {
        let taker_funds = self.taker_funds()?;

        let flow = match self.cross_type {
            CrossType::NativeToIssued => {
                let rate =
                    effective_rate(self.rate_out, &self.issue_out(), owner, &self.account);
                self.flow_native_to_issued(offer, quality, owner_funds, &taker_funds, rate)?
            }
            CrossType::IssuedToNative => {
                let rate =
                    effective_rate(self.rate_in, &self.issue_in(), &self.account, owner);
                self.flow_issued_to_native(offer, quality, owner_funds, &taker_funds, rate)?
            }
            CrossType::IssuedToIssued => {
                let rate_in =
                    effective_rate(self.rate_in, &self.issue_in(), &self.account, owner);
                let rate_out =
                    effective_rate(self.rate_out, &self.issue_out(), owner, &self.account);
                self.flow_issued_to_issued(
                    offer,
                    quality,
                    owner_funds,
                    &taker_funds,
                    rate_in,
                    rate_out,
                )?
            }
        };
        flow.check()?;
        trace!(order = %flow.order, issuers = %flow.issuers, "flow");
        self.settle(&flow.order.input, &flow.order.output)?;
        Ok(flow)
    }

    /// Books a realized crossing against the taker's state.
    fn settle(&mut self, spent: &Amount, received: &Amount) -> Result<(), TakerError> {
        self.remaining.input = self.remaining.input.checked_sub(spent)?;
        self.remaining.output = self.remaining.output.checked_sub(received)?;
        self.consumed = self.consumed.checked_add(spent)?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Flows
    // ------------------------------------------------------------------------

    /// Converts an output-leg amount into the input leg through `quality`,
    /// never exceeding the pre-clamp input value.
    fn qual_mul(
        &self,
        output: &Amount,
        quality: Quality,
        cap: &Amount,
    ) -> Result<Amount, TakerError> {
        let result = multiply(output, &quality.rate()?, cap.issue())?;
        Ok(if lt(cap, &result) { *cap } else { result })
    }

    /// Converts an input-leg amount into the output leg through `quality`,
    /// never exceeding the pre-clamp output value.
    fn qual_div(
        &self,
        input: &Amount,
        quality: Quality,
        cap: &Amount,
    ) -> Result<Amount, TakerError> {
        let result = divide(input, &quality.rate()?, cap.issue())?;
        Ok(if lt(cap, &result) { *cap } else { result })
    }

    /// Taker pays native, owner pays an issued currency.
    fn flow_native_to_issued(
        &self,
        order: Amounts,
        quality: Quality,
        owner_funds: &Amount,
        taker_funds: &Amount,
        rate_out: Rate,
    ) -> Result<Flow, TakerError> {
        let mut f = Flow {
            order,
            issuers: order,
        };
        f.issuers.output = rate_out.multiply(&f.order.output)?;

        // Clamp on the owner's balance.
        if lt(owner_funds, &f.issuers.output) {
            f.issuers.output = *owner_funds;
            f.order.output = rate_out.divide(&f.issuers.output)?;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            trace!(output = %f.order.output, "owner balance clamp");
        }

        // Clamp if the taker only wants so much output.
        if !self.sell && lt(&self.remaining.output, &f.order.output) {
            f.order.output = self.remaining.output;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            trace!(output = %f.order.output, "output limit clamp");
        }

        // Clamp on the taker's funds.
        if lt(taker_funds, &f.order.input) {
            f.order.input = *taker_funds;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            trace!(input = %f.order.input, "taker funds clamp");
        }

        // Clamp on the taker's input offer, unless this is the native leg of
        // a bridge (where the offer is denominated in an issued currency).
        if self.cross_type == CrossType::NativeToIssued
            && lt(&self.remaining.input, &f.order.input)
        {
            f.order.input = self.remaining.input;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            trace!(input = %f.order.input, "input offer clamp");
        }

        f.issuers.input = f.order.input;
        Ok(f)
    }

    /// Taker pays an issued currency, owner pays native.
    fn flow_issued_to_native(
        &self,
        order: Amounts,
        quality: Quality,
        owner_funds: &Amount,
        taker_funds: &Amount,
        rate_in: Rate,
    ) -> Result<Flow, TakerError> {
        let mut f = Flow {
            order,
            issuers: order,
        };
        f.issuers.input = rate_in.multiply(&f.order.input)?;

        // Clamp on the owner's balance.
        if lt(owner_funds, &f.order.output) {
            f.order.output = *owner_funds;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            trace!(output = %f.order.output, "owner balance clamp");
        }

        // Clamp if the taker only wants so much output. Never binds on the
        // first leg of a bridge, whose output is the intermediate native.
        if !self.sell && lt(&self.remaining.output, &f.order.output) {
            f.order.output = self.remaining.output;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            trace!(output = %f.order.output, "output limit clamp");
        }

        // Clamp on the taker's input offer, unless bridging.
        if self.cross_type == CrossType::IssuedToNative
            && lt(&self.remaining.input, &f.order.input)
        {
            f.order.input = self.remaining.input;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            trace!(input = %f.order.input, "input offer clamp");
        }

        // Clamp on the taker's funds, fee included.
        if lt(taker_funds, &f.issuers.input) {
            f.issuers.input = *taker_funds;
            f.order.input = rate_in.divide(&f.issuers.input)?;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            trace!(input = %f.order.input, "taker funds clamp");
        }

        f.issuers.output = f.order.output;
        Ok(f)
    }

    /// Both legs issued; fees can apply on both sides.
    fn flow_issued_to_issued(
        &self,
        order: Amounts,
        quality: Quality,
        owner_funds: &Amount,
        taker_funds: &Amount,
        rate_in: Rate,
        rate_out: Rate,
    ) -> Result<Flow, TakerError> {
        let mut f = Flow {
            order,
            issuers: order,
        };
        f.issuers.output = rate_out.multiply(&f.order.output)?;
        f.issuers.input = rate_in.multiply(&f.order.input)?;

        // Clamp on the owner's balance, fee included.
        if lt(owner_funds, &f.issuers.output) {
            f.issuers.output = *owner_funds;
            f.order.output = rate_out.divide(&f.issuers.output)?;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            trace!(output = %f.order.output, "owner balance clamp");
        }

        // Clamp if the taker only wants so much output.
        if !self.sell && lt(&self.remaining.output, &f.order.output) {
            f.order.output = self.remaining.output;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            f.order.input = self.qual_mul(&f.order.output, quality, &f.order.input)?;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            trace!(output = %f.order.output, "output limit clamp");
        }

        // Clamp on the taker's input offer.
        if lt(&self.remaining.input, &f.order.input) {
            f.order.input = self.remaining.input;
            f.issuers.input = rate_in.multiply(&f.order.input)?;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            trace!(input = %f.order.input, "input offer clamp");
        }

        // Clamp on the taker's funds, fee included.
        if lt(taker_funds, &f.issuers.input) {
            f.issuers.input = *taker_funds;
            f.order.input = rate_in.divide(&f.issuers.input)?;
            f.order.output = self.qual_div(&f.order.input, quality, &f.order.output)?;
            f.issuers.output = rate_out.multiply(&f.order.output)?;
            trace!(input = %f.order.input, "taker funds clamp");
        }

        Ok(f)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
