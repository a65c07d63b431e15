//! Resting offers and the quality-ordered book that holds them.

mod book;
mod offer;

pub use book::{OfferBook, OfferId};
pub use offer::Offer;
