//! Quotes Core Library
//!
//! This crate provides the core functionality for Quotes:
//! - Data models (Quote, ShownQuote)
//! - JSON file persistence with atomic writes
//! - Category index and filtering
//! - Random and filtered rendering
//! - Import and export
//! - Background sync against a remote endpoint
//!
//! ## Architecture
//!
//! `quotes.json` in the data directory is the source of truth. Every
//! mutation goes through [`Store`], which rewrites the file and rebuilds the
//! category index before returning. The sync agent shares the store behind
//! an async mutex and replaces the collection when the remote differs.

pub mod category;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use category::{CategoryFilter, CategoryIndex, ALL_CATEGORIES};
pub use config::Config;
pub use error::QuoteError;
pub use models::{Quote, ShownQuote};
pub use render::QuoteView;
pub use storage::{StorageError, StorageResult};
pub use store::Store;
