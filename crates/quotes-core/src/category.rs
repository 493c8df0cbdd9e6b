//! Category index
//!
//! Distinct categories of the collection in first-seen order, plus the
//! synthetic "all" entry used by filter controls.

use serde::{Deserialize, Serialize};

use crate::models::Quote;

/// Sentinel filter value selecting every category
pub const ALL_CATEGORIES: &str = "all";

/// A category filter selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Show every quote
    #[default]
    All,
    /// Show quotes whose category equals this value exactly
    Only(String),
}

impl CategoryFilter {
    /// Parse a stored or typed filter value
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    /// The value as shown in filter controls and persisted on disk
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    /// Whether a quote passes this filter (case-sensitive)
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => quote.category == *category,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// Distinct categories across a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<String>,
}

impl CategoryIndex {
    /// Build the index from a collection, keeping first-seen order
    pub fn build(quotes: &[Quote]) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for quote in quotes {
            if !categories.contains(&quote.category) {
                categories.push(quote.category.clone());
            }
        }
        Self { categories }
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Entries for a filter control: "all" first, then each category
    ///
    /// A category literally named "all" is covered by the leading entry.
    pub fn options(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(
                self.categories
                    .iter()
                    .filter(|c| c.as_str() != ALL_CATEGORIES)
                    .map(|c| CategoryFilter::Only(c.clone())),
            )
            .collect()
    }

    /// Pick the selection to show after the collection changed
    ///
    /// A previous category that still exists stays selected; anything else
    /// resets to "all".
    pub fn reselect(&self, previous: Option<&CategoryFilter>) -> CategoryFilter {
        match previous {
            Some(CategoryFilter::Only(category)) if self.contains(category) => {
                CategoryFilter::Only(category.clone())
            }
            _ => CategoryFilter::All,
        }
    }
}
