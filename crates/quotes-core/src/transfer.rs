//! Import and export
//!
//! Export writes the whole collection as a pretty-printed JSON array named
//! `quotes.json`. Import reads such a file back; the store appends what it
//! reads rather than replacing the collection.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::QuoteError;
use crate::models::Quote;
use crate::storage::{atomic_write, StorageResult};

/// File name used for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize a collection for export
pub fn export_json(quotes: &[Quote]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(quotes)
}

/// Write an export file into `dir`, returning its path
pub fn write_export(dir: &Path, quotes: &[Quote]) -> StorageResult<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    let json = export_json(quotes)?;
    atomic_write(&path, json.as_bytes())?;
    Ok(path)
}

/// Parse the contents of an import file
///
/// The top level must be a JSON array. Elements are read leniently: missing
/// fields become empty strings and unknown fields are dropped. Nothing is
/// checked for emptiness.
pub fn parse_import(contents: &str) -> Result<Vec<Quote>, QuoteError> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| QuoteError::InvalidJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(QuoteError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| QuoteError::InvalidJson(format!("element {}: {}", i, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_is_pretty_array() {
        let json = export_json(&[Quote::new("a", "b")]).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains('\n'));
        assert!(json.contains("\"text\": \"a\""));
    }

    #[test]
    fn test_export_empty_collection() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_export_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let quotes = vec![Quote::new("a", "b")];

        let path = write_export(temp_dir.path(), &quotes).unwrap();

        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(parse_import(&written).unwrap(), quotes);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_import("[{").unwrap_err();
        assert!(matches!(err, QuoteError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert_eq!(
            parse_import(r#"{"text": "a", "category": "b"}"#),
            Err(QuoteError::NotAnArray)
        );
        assert_eq!(parse_import("42"), Err(QuoteError::NotAnArray));
    }

    #[test]
    fn test_parse_is_lenient_about_fields() {
        let quotes = parse_import(
            r#"[{"text": "a"}, {"category": "b", "author": "x"}, {"text": "", "category": ""}]"#,
        )
        .unwrap();
        assert_eq!(
            quotes,
            vec![Quote::new("a", ""), Quote::new("", "b"), Quote::new("", "")]
        );
    }

    #[test]
    fn test_parse_rejects_non_object_elements() {
        let err = parse_import(r#"[{"text": "a", "category": "b"}, "loose"]"#).unwrap_err();
        match err {
            QuoteError::InvalidJson(msg) => assert!(msg.contains("element 1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_import("[]").unwrap().is_empty());
    }
}
