//! User-facing errors
//!
//! These are the errors a person can fix: empty form fields and import
//! files that are not a JSON array. Storage failures live in
//! [`crate::storage::StorageError`].

use thiserror::Error;

/// Errors reported back to the user without touching the collection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Text or category was empty after trimming
    #[error("Please enter both a quote and a category.")]
    MissingField,

    /// Import file is not valid JSON
    #[error("Invalid JSON file: {0}")]
    InvalidJson(String),

    /// Import file is JSON but not an array
    #[error("Invalid file format: expected a JSON array of quotes.")]
    NotAnArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            QuoteError::MissingField.to_string(),
            "Please enter both a quote and a category."
        );
        assert!(QuoteError::NotAnArray.to_string().contains("array"));
        assert!(QuoteError::InvalidJson("eof".into())
            .to_string()
            .contains("eof"));
    }
}
