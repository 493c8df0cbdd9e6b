//! Sync integration for TUI
//!
//! Starts the background sync agent when sync is enabled and gives the
//! event loop a way to wait on it.

use std::future::pending;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use quotes_core::sync::{spawn_sync_agent, HttpSource, SyncAgentConfig, SyncEvent, SyncHandle};
use quotes_core::{Config, Store};

/// Spawn the sync agent if sync is enabled
///
/// A source that cannot be built is logged and sync stays off for the run.
pub fn spawn_sync(config: &Config, store: Arc<Mutex<Store>>) -> Option<SyncHandle> {
    if !config.sync_enabled {
        return None;
    }

    let source = match HttpSource::from_config(config) {
        Ok(source) => source,
        Err(e) => {
            warn!("Sync disabled for this session: {:#}", e);
            return None;
        }
    };

    info!("Starting sync agent against {}", source.url());
    Some(spawn_sync_agent(
        SyncAgentConfig::from(config),
        Arc::new(source),
        store,
    ))
}

/// Wait for the next sync event
///
/// Never resolves without a running agent. Once the agent's channel closes
/// the handle is dropped so later calls stay pending.
pub async fn next_event(handle: &mut Option<SyncHandle>) -> Option<SyncEvent> {
    let Some(active) = handle.as_mut() else {
        return pending().await;
    };

    match active.event_rx.recv().await {
        Some(event) => Some(event),
        None => {
            *handle = None;
            None
        }
    }
}
