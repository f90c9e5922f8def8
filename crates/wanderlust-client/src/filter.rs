//! Filtering over listings that are already loaded.
//!
//! The client matches free text against `location` and `country`, which is a
//! different field set from the server search (`title` and `location`).
//! Matching is plain case-insensitive substring containment; no pattern
//! syntax is interpreted.

use std::collections::HashSet;

use wanderlust_core::{ListingId, ListingSummary, PriceRange, SearchCriteria};

/// Criteria with the text dimensions lowercased once up front.
struct CompiledFilter {
    text: Option<String>,
    price: Option<PriceRange>,
    country: Option<String>,
}

impl CompiledFilter {
    fn new(criteria: &SearchCriteria) -> Self {
        Self {
            text: criteria.free_text.as_deref().map(str::to_lowercase),
            price: criteria.price_range,
            country: criteria.country.as_deref().map(str::to_lowercase),
        }
    }

    fn matches(&self, listing: &ListingSummary) -> bool {
        let text_ok = self.text.as_deref().is_none_or(|needle| {
            listing.location.to_lowercase().contains(needle)
                || listing.country.to_lowercase().contains(needle)
        });
        let price_ok = self.price.is_none_or(|range| range.contains(listing.price));
        let country_ok = self
            .country
            .as_deref()
            .is_none_or(|country| listing.country.to_lowercase() == country);

        text_ok && price_ok && country_ok
    }
}

/// Returns whether a single listing satisfies `criteria`. `category` is not
/// considered.
#[must_use]
pub fn matches(listing: &ListingSummary, criteria: &SearchCriteria) -> bool {
    CompiledFilter::new(criteria).matches(listing)
}

/// Returns the ids of every listing that satisfies `criteria`.
pub fn apply<'a, I>(listings: I, criteria: &SearchCriteria) -> HashSet<ListingId>
where
    I: IntoIterator<Item = &'a ListingSummary>,
{
    let filter = CompiledFilter::new(criteria);
    listings
        .into_iter()
        .filter(|listing| filter.matches(listing))
        .map(|listing| listing.id)
        .collect()
}
