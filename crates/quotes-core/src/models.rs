//! Data models for Quotes
//!
//! A quote is a piece of text with a free-form category label. There is no
//! identifier: two quotes are the same when both fields are equal, and the
//! collection may hold duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to every quote pulled from the remote source
pub const REMOTE_CATEGORY: &str = "General";

/// A single quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    #[serde(default)]
    pub text: String,
    /// Free-text category label used for filtering
    #[serde(default)]
    pub category: String,
}

impl Quote {
    /// Create a quote without validation
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Create a quote from user input
    ///
    /// Both fields are trimmed. Returns `None` if either is empty afterwards.
    pub fn from_input(text: &str, category: &str) -> Option<Self> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return None;
        }
        Some(Self::new(text, category))
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - ({})", self.text, self.category)
    }
}

/// The quotes a fresh store starts with
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Motivation",
        ),
        Quote::new(
            "In the middle of every difficulty lies opportunity.",
            "Inspiration",
        ),
        Quote::new(
            "Do what you can, with what you have, where you are.",
            "Wisdom",
        ),
    ]
}

/// The most recently displayed quote, kept for the current session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShownQuote {
    pub quote: Quote,
    pub shown_at: DateTime<Utc>,
}

impl ShownQuote {
    pub fn now(quote: Quote) -> Self {
        Self {
            quote,
            shown_at: Utc::now(),
        }
    }
}
