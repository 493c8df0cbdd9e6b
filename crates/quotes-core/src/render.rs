//! Quote views
//!
//! Decides what a display shows: a single random quote, a filtered list, or
//! one of the fixed empty-state messages. Drawing is left to the caller.

use rand::Rng;

use crate::category::CategoryFilter;
use crate::models::Quote;

/// Shown when the collection has no quotes at all
pub const EMPTY_COLLECTION_MESSAGE: &str = "No quotes available.";

/// Shown when a category filter matches nothing
pub const EMPTY_CATEGORY_MESSAGE: &str = "No quotes found for this category.";

/// What a quote display should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    /// A fixed message instead of quotes
    Empty(&'static str),
    /// One quote
    Single(Quote),
    /// Quotes in collection order
    List(Vec<Quote>),
}

impl QuoteView {
    /// Quotes contained in the view
    pub fn quotes(&self) -> &[Quote] {
        match self {
            QuoteView::Empty(_) => &[],
            QuoteView::Single(quote) => std::slice::from_ref(quote),
            QuoteView::List(quotes) => quotes,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, QuoteView::Empty(_))
    }
}

/// Pick one quote uniformly at random
///
/// Returns `None` without touching the RNG when there is nothing to pick.
pub fn pick_random<'a, R: Rng>(quotes: &'a [Quote], rng: &mut R) -> Option<&'a Quote> {
    if quotes.is_empty() {
        return None;
    }
    let index = rng.random_range(0..quotes.len());
    quotes.get(index)
}

/// View of one random quote, or the empty-collection message
pub fn render_random<R: Rng>(quotes: &[Quote], rng: &mut R) -> QuoteView {
    match pick_random(quotes, rng) {
        Some(quote) => QuoteView::Single(quote.clone()),
        None => QuoteView::Empty(EMPTY_COLLECTION_MESSAGE),
    }
}

/// Quotes passing a filter, in collection order
pub fn filter_quotes(quotes: &[Quote], filter: &CategoryFilter) -> Vec<Quote> {
    quotes
        .iter()
        .filter(|quote| filter.matches(quote))
        .cloned()
        .collect()
}

/// View of the quotes passing a filter, or the empty-category message
pub fn render_filtered(quotes: &[Quote], filter: &CategoryFilter) -> QuoteView {
    let matching = filter_quotes(quotes, filter);
    if matching.is_empty() {
        QuoteView::Empty(EMPTY_CATEGORY_MESSAGE)
    } else {
        QuoteView::List(matching)
    }
}
