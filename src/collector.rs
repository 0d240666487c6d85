use crate::results::Listing;
use std::collections::HashSet;

/// Accumulates listings across pages and categories up to an optional cap
#[derive(Debug, Default)]
pub struct Collector {
    cap: Option<usize>,
    listings: Vec<Listing>,
}

impl Collector {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            cap,
            listings: Vec::new(),
        }
    }

    /// Append a listing; returns false once the cap is reached and the listing is dropped
    pub fn push(&mut self, listing: Listing) -> bool {
        if self.is_full() {
            ::log::trace!("Collector full, dropping {}", listing.url);
            return false;
        }
        self.listings.push(listing);
        true
    }

    pub fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.listings.len() >= cap)
    }

    /// Room left before the cap, `None` when uncapped
    pub fn remaining(&self) -> Option<usize> {
        self.cap.map(|cap| cap.saturating_sub(self.listings.len()))
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Consume the collector and return its listings deduplicated by URL
    pub fn into_deduplicated(self) -> Vec<Listing> {
        dedupe_by_url(self.listings)
    }
}

/// Drop every listing whose URL was already seen, keeping first-occurrence order
pub fn dedupe_by_url(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen = HashSet::new();
    let before = listings.len();
    let unique: Vec<Listing> = listings
        .into_iter()
        .filter(|listing| seen.insert(listing.url.clone()))
        .collect();

    if unique.len() < before {
        ::log::debug!("Removed {} duplicate listings", before - unique.len());
    }
    unique
}
