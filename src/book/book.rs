//! Quality-ordered offer storage.
//!
//! ## Architecture
//!
//! - `Slab<Offer>`: pre-allocatable storage, O(1) insert/remove, stable ids
//! - `BTreeMap<u64, VecDeque<OfferId>>`: packed rate -> FIFO queue of ids
//!
//! The map is keyed by the offer's packed rate, and a lower packed rate is a
//! better price, so ascending map order is exactly best-quality-first. Ids
//! within one level keep arrival order: equal prices fill first-come,
//! first-served.

use std::collections::{BTreeMap, VecDeque};

use slab::Slab;

use crate::book::offer::Offer;
use crate::errors::TakerError;
use crate::types::Amounts;

/// Stable handle of a resting offer.
pub type OfferId = usize;

/// An in-memory book of resting offers for one currency pair, ordered
/// best-quality-first with time priority inside a quality level.
#[derive(Debug, Default)]
pub struct OfferBook {
    offers: Slab<Offer>,
    levels: BTreeMap<u64, VecDeque<OfferId>>,
}

impl OfferBook {
    pub fn new() -> Self {
        OfferBook {
            offers: Slab::new(),
            levels: BTreeMap::new(),
        }
    }

    /// A book with pre-allocated storage for `capacity` offers.
    pub fn with_capacity(capacity: usize) -> Self {
        OfferBook {
            offers: Slab::with_capacity(capacity),
            levels: BTreeMap::new(),
        }
    }

    /// Number of resting offers.
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Rests an offer, behind any earlier offers of the same quality.
    pub fn insert(&mut self, offer: Offer) -> OfferId {
        let key = offer.quality().packed();
        let id = self.offers.insert(offer);
        self.levels.entry(key).or_default().push_back(id);
        id
    }

    /// Removes and returns an offer by id.
    pub fn remove(&mut self, id: OfferId) -> Option<Offer> {
        let offer = self.offers.try_remove(id)?;
        let key = offer.quality().packed();
        if let Some(queue) = self.levels.get_mut(&key) {
            queue.retain(|&other| other != id);
            if queue.is_empty() {
                self.levels.remove(&key);
            }
        }
        Some(offer)
    }

    /// The offer with a given id, if it is still resting.
    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        self.offers.get(id)
    }

    /// The best-quality, earliest-placed offer.
    pub fn best(&self) -> Option<(OfferId, &Offer)> {
        let (_, queue) = self.levels.iter().next()?;
        let id = *queue.front()?;
        Some((id, &self.offers[id]))
    }

    /// All resting offers, best quality first, FIFO within a level.
    pub fn iter_best_first(&self) -> impl Iterator<Item = (OfferId, &Offer)> {
        self.levels
            .values()
            .flat_map(|queue| queue.iter().map(|&id| (id, &self.offers[id])))
    }

    /// Applies a realized flow to a resting offer, removing it once either
    /// leg is exhausted. Returns whether the offer was removed.
    pub fn fill(&mut self, id: OfferId, flow: &Amounts) -> Result<bool, TakerError> {
        let offer = self
            .offers
            .get_mut(id)
            .ok_or(TakerError::FlowInvariant("fill of a vacated offer"))?;
        offer.reduce(flow)?;
        if offer.is_empty() {
            self.remove(id);
            return Ok(true);
        }
        Ok(false)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
