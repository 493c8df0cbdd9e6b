//! Sync command handler

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use quotes_core::sync::{sync_once, HttpSource, SyncOutcome};
use quotes_core::Store;

use crate::output::Output;

/// Run one sync cycle against the configured server
pub async fn sync(store: Store, output: &Output) -> Result<()> {
    let config = store.config().clone();

    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotes config set sync_enabled true"
        );
    }

    let source = HttpSource::from_config(&config)?;
    output.message(&format!("Fetching quotes from {}...", source.url()));

    let store = Mutex::new(store);
    match sync_once(&source, &store).await {
        Ok(SyncOutcome::Replaced { count }) => {
            output.success("Quotes synced with server!");
            output.message(&format!("  Quotes: {}", count));
        }
        Ok(SyncOutcome::Unchanged) => {
            output.success("Sync complete - already up to date");
        }
        Err(e) => {
            output.message(&format!("Sync failed: {:#}", e));
            return Err(e);
        }
    }

    Ok(())
}
