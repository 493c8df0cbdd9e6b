//! Storage layer
//!
//! Handles persistence of the quote collection and its companion state.
//!
//! ## Layout
//!
//! - **quotes.json**: durable collection, rewritten on every mutation
//! - **selected_category**: durable category filter
//! - **session.json**: last displayed quote, scoped to one session

mod error;
mod persistence;

pub use error::{recovery_hint, StorageError, StorageResult};
pub use persistence::{atomic_write, JsonPersistence};
