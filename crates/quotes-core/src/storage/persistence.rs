//! File persistence
//!
//! Saves and loads the quote collection, the selected category filter and
//! the session's last displayed quote. Uses atomic writes (write to temp
//! file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/quotes/` (configurable via `Config`)
//!
//! Files:
//! - `quotes.json` - The quote collection as a JSON array
//! - `selected_category` - Last selected category filter (plain text)
//! - `session.json` - Last displayed quote, cleared between sessions

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::{Quote, ShownQuote};

/// Persistence layer for quote data
pub struct JsonPersistence {
    config: Config,
}

impl JsonPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the collection from disk
    ///
    /// Returns `None` if the file doesn't exist.
    /// Returns `InvalidFormat` if the file exists but isn't a JSON array of quotes.
    pub fn load_quotes(&self) -> StorageResult<Option<Vec<Quote>>> {
        let path = self.config.quotes_path();

        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| StorageError::from_read(e, path.clone()))?;

        let quotes: Vec<Quote> =
            serde_json::from_str(&content).map_err(|e| StorageError::InvalidFormat {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!("Loaded {} quotes from {:?}", quotes.len(), path);
        Ok(Some(quotes))
    }

    /// Save the collection to disk
    pub fn save_quotes(&self, quotes: &[Quote]) -> StorageResult<()> {
        let json = serde_json::to_string(quotes)?;
        atomic_write(&self.config.quotes_path(), json.as_bytes())
    }

    /// Load the selected category filter
    pub fn load_selected_category(&self) -> StorageResult<Option<String>> {
        let path = self.config.selected_category_path();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StorageError::from_read(e, path))?;
        let value = content.trim_end_matches(['\n', '\r']);
        Ok(if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        })
    }

    /// Save the selected category filter
    pub fn save_selected_category(&self, category: &str) -> StorageResult<()> {
        atomic_write(&self.config.selected_category_path(), category.as_bytes())
    }

    /// Load the last displayed quote of this session
    ///
    /// A damaged session file is treated as empty.
    pub fn load_session(&self) -> StorageResult<Option<ShownQuote>> {
        let path = self.config.session_path();

        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| StorageError::from_read(e, path.clone()))?;
        match serde_json::from_str(&content) {
            Ok(shown) => Ok(Some(shown)),
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    /// Save the last displayed quote of this session
    pub fn save_session(&self, shown: &ShownQuote) -> StorageResult<()> {
        let json = serde_json::to_string(shown)?;
        atomic_write(&self.config.session_path(), json.as_bytes())
    }

    /// Forget the session's last displayed quote
    pub fn clear_session(&self) -> StorageResult<()> {
        let path = self.config.session_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::from_io(e, path))?;
        }
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
