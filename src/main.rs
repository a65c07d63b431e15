//! crossbook - Binary Entry Point
//!
//! Walks a taker across a small demo book and prints the realized flows.

use std::error::Error;

use crossbook::book::{Offer, OfferBook};
use crossbook::engine::{Side, Taker};
use crossbook::types::{AccountId, Amount, Amounts, Issue, Quality, Rate};

fn main() -> Result<(), Box<dyn Error>> {
    println!("===========================================");
    println!("  crossbook - offer crossing demo");
    println!("===========================================");
    println!();

    let usd = Issue::issued("USD".parse()?, AccountId::from_u64(0x100));
    let taker_account = AccountId::from_u64(1);

    // Everyone is comfortably funded.
    let funds = move |_: &AccountId, issue: &Issue| {
        Amount::from_text(*issue, "1000000").unwrap_or_else(|_| Amount::zero(*issue))
    };

    // Three resting offers taking drops for USD, at three prices.
    let mut book = OfferBook::with_capacity(16);
    for (owner, drops, dollars) in [(2u64, 100i64, "2"), (3, 300, "3"), (4, 200, "2")] {
        let offer = Offer::new(
            AccountId::from_u64(owner),
            Amounts::new(Amount::drops(drops)?, Amount::from_text(usd, dollars)?),
        )?;
        println!("Resting: {offer} at quality {}", offer.quality());
        book.insert(offer);
    }
    println!();

    // The taker sells 350 drops for at least one USD per hundred drops.
    let desire = Amounts::new(Amount::drops(350)?, Amount::from_text(usd, "3.5")?);
    let mut taker = Taker::new(
        taker_account,
        desire,
        Quality::from_amounts(&desire),
        Side::Sell,
        Rate::PARITY,
        Rate::PARITY,
        funds,
    )?;
    println!("Taker wants: {desire}");
    println!();

    while let Some((id, offer)) = book.best() {
        let offer = *offer;
        if taker.done() {
            break;
        }
        let flow = taker.cross(&offer)?;
        if flow.input.is_zero() {
            println!("Stopping at {offer}: priced below the taker's threshold");
            break;
        }
        println!("Crossed {offer}: taker pays {}, receives {}", flow.input, flow.output);
        book.fill(id, &flow)?;
    }

    println!();
    println!("Remaining desire: {}", taker.remaining());
    println!("Input spent:      {}", taker.consumed());
    println!("Offers left:      {}", book.len());
    Ok(())
}
