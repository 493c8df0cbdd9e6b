//! Last-write-wins reconciliation
//!
//! The remote collection replaces the local one whenever their serialized
//! forms differ. A pure reordering counts as a difference.

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::source::{QuoteSource, RemoteRecord};
use crate::models::{Quote, REMOTE_CATEGORY};
use crate::store::Store;

/// Result of one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local and remote were identical
    Unchanged,
    /// Local collection was replaced by `count` remote quotes
    Replaced { count: usize },
}

/// Turn remote records into quotes in the fixed remote category
pub fn map_remote(records: Vec<RemoteRecord>) -> Vec<Quote> {
    records
        .into_iter()
        .map(|record| Quote::new(record.title, REMOTE_CATEGORY))
        .collect()
}

/// Whether two collections serialize differently
pub fn differs(local: &[Quote], remote: &[Quote]) -> Result<bool> {
    let local = serde_json::to_string(local).context("Failed to serialize local quotes")?;
    let remote = serde_json::to_string(remote).context("Failed to serialize remote quotes")?;
    Ok(local != remote)
}

/// Apply remote quotes to the store, remote winning on any difference
pub fn reconcile(store: &mut Store, remote: Vec<Quote>) -> Result<SyncOutcome> {
    if !differs(store.quotes(), &remote)? {
        debug!("Local quotes match remote");
        return Ok(SyncOutcome::Unchanged);
    }

    let count = remote.len();
    store.replace_all(remote)?;
    info!("Replaced local quotes with {} remote quotes", count);
    Ok(SyncOutcome::Replaced { count })
}

/// Fetch from `source` and reconcile into the shared store
///
/// The store lock is held only while reconciling, never across the fetch.
pub async fn sync_once(source: &dyn QuoteSource, store: &Mutex<Store>) -> Result<SyncOutcome> {
    let records = source.fetch().await?;
    let remote = map_remote(records);
    let mut store = store.lock().await;
    reconcile(&mut store, remote)
}
