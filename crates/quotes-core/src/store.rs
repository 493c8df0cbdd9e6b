//! Unified storage interface
//!
//! The `Store` owns the quote collection and keeps everything derived from
//! it consistent:
//! - the durable `quotes.json` file, rewritten on every mutation
//! - the category index and the persisted category filter
//! - the session's last displayed quote
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads existing or seeds a new collection
//!
//! store.add("Stay hungry.", "Life")?;
//! let view = store.show_random()?;
//! ```
//!
//! Shared with the sync agent as `Arc<tokio::sync::Mutex<Store>>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, info};

use crate::category::{CategoryFilter, CategoryIndex};
use crate::config::Config;
use crate::error::QuoteError;
use crate::models::{seed_quotes, Quote, ShownQuote};
use crate::render::{self, QuoteView};
use crate::storage::JsonPersistence;
use crate::transfer;

/// Owner of the quote collection
pub struct Store {
    /// The collection, in insertion order
    quotes: Vec<Quote>,
    /// Distinct categories of `quotes`
    index: CategoryIndex,
    /// Current category filter, mirrored to disk
    selected: CategoryFilter,
    persistence: JsonPersistence,
    config: Config,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// On first run the collection is seeded with three quotes and saved.
    /// A persisted collection that cannot be parsed is an error; it is never
    /// replaced by the seed.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(config.clone());

        let quotes = match persistence
            .load_quotes()
            .context("Failed to load saved quotes")?
        {
            Some(quotes) => quotes,
            None => {
                info!("No saved quotes, starting from seed");
                let seed = seed_quotes();
                persistence
                    .save_quotes(&seed)
                    .context("Failed to save seed quotes")?;
                seed
            }
        };

        let selected = persistence
            .load_selected_category()
            .context("Failed to load selected category")?
            .map(|value| CategoryFilter::parse(&value))
            .unwrap_or_default();

        let mut store = Self {
            index: CategoryIndex::build(&quotes),
            quotes,
            selected,
            persistence,
            config,
        };
        store.refresh_categories()?;
        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Collection ====================

    /// The collection in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Add a quote from user input
    ///
    /// Both fields are trimmed; if either ends up empty nothing changes and
    /// `QuoteError::MissingField` is returned.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::from_input(text, category).ok_or(QuoteError::MissingField)?;
        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next).context("Failed to save new quote")?;
        Ok(quote)
    }

    /// Replace the whole collection, keeping the given order
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<()> {
        self.commit(quotes).context("Failed to save replaced quotes")
    }

    /// Append quotes to the end of the collection
    pub fn append_all(&mut self, quotes: Vec<Quote>) -> Result<usize> {
        let count = quotes.len();
        let mut next = self.quotes.clone();
        next.extend(quotes);
        self.commit(next).context("Failed to save appended quotes")?;
        Ok(count)
    }

    /// Write `next` to disk, then make it the collection
    ///
    /// If the write fails the in-memory collection and index are untouched.
    fn commit(&mut self, next: Vec<Quote>) -> Result<()> {
        self.persistence
            .save_quotes(&next)
            .context("Failed to write quotes")?;
        debug!("Persisted {} quotes", next.len());
        self.quotes = next;
        self.refresh_categories()
    }

    // ==================== Import / Export ====================

    /// The collection as pretty-printed JSON
    pub fn export_all(&self) -> Result<String> {
        transfer::export_json(&self.quotes).context("Failed to serialize quotes")
    }

    /// Write `quotes.json` into `dir`
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = transfer::write_export(dir, &self.quotes)
            .with_context(|| format!("Failed to export quotes to {:?}", dir))?;
        info!("Exported {} quotes to {:?}", self.quotes.len(), path);
        Ok(path)
    }

    /// Append the quotes from an import file's contents
    ///
    /// Fails with a `QuoteError` and leaves the collection unchanged if the
    /// contents are not a JSON array.
    pub fn import_all(&mut self, contents: &str) -> Result<usize> {
        let imported = transfer::parse_import(contents)?;
        let count = self.append_all(imported)?;
        info!("Imported {} quotes", count);
        Ok(count)
    }

    // ==================== Categories ====================

    /// Distinct categories of the collection
    pub fn category_index(&self) -> &CategoryIndex {
        &self.index
    }

    /// Currently selected category filter
    pub fn selected_category(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Select and persist a category filter
    pub fn select_category(&mut self, filter: CategoryFilter) -> Result<()> {
        self.persistence
            .save_selected_category(filter.as_str())
            .context("Failed to save selected category")?;
        self.selected = filter;
        Ok(())
    }

    /// Rebuild the index and reselect the persisted filter if it survived
    fn refresh_categories(&mut self) -> Result<()> {
        self.index = CategoryIndex::build(&self.quotes);
        let next = self.index.reselect(Some(&self.selected));
        if next != self.selected {
            debug!(
                "Category '{}' no longer exists, resetting filter to '{}'",
                self.selected, next
            );
            self.select_category(next)?;
        }
        Ok(())
    }

    // ==================== Views ====================

    /// Show a random quote and remember it for this session
    pub fn show_random(&mut self) -> Result<QuoteView> {
        self.show_random_with(&mut rand::rng())
    }

    /// Like `show_random`, with a caller-supplied RNG
    pub fn show_random_with<R: Rng>(&mut self, rng: &mut R) -> Result<QuoteView> {
        let view = render::render_random(&self.quotes, rng);
        if let QuoteView::Single(ref quote) = view {
            self.persistence
                .save_session(&ShownQuote::now(quote.clone()))
                .context("Failed to record shown quote")?;
        }
        Ok(view)
    }

    /// Quotes passing a filter, or the empty-category message
    pub fn render_filtered(&self, filter: &CategoryFilter) -> QuoteView {
        render::render_filtered(&self.quotes, filter)
    }

    /// Quotes passing the selected filter
    pub fn render_selected(&self) -> QuoteView {
        self.render_filtered(&self.selected)
    }

    // ==================== Session ====================

    /// The last quote shown in this session
    pub fn last_shown(&self) -> Result<Option<ShownQuote>> {
        self.persistence
            .load_session()
            .context("Failed to read session")
    }

    /// Forget the session's last shown quote
    pub fn clear_session(&self) -> Result<()> {
        self.persistence
            .clear_session()
            .context("Failed to clear session")
    }
}
