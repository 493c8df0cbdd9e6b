//! Remote sync
//!
//! Pulls quotes from a remote endpoint on a timer and reconciles them into
//! the local store. The remote always wins: whenever the serialized
//! collections differ the local collection is replaced wholesale and every
//! remote quote lands in the `General` category.
//!
//! ## Usage
//!
//! ```ignore
//! let source = Arc::new(HttpSource::from_config(&config)?);
//! let mut handle = spawn_sync_agent(SyncAgentConfig::from(&config), source, store);
//!
//! handle.command_tx.send(SyncCommand::SyncNow).await?;
//! while let Some(event) = handle.event_rx.recv().await {
//!     // react to SyncEvent::Updated, SyncEvent::Failed, ...
//! }
//! ```

mod agent;
mod reconcile;
mod source;

pub use agent::{
    spawn_sync_agent, SyncAgentConfig, SyncCommand, SyncEvent, SyncHandle, SyncPhase,
};
pub use reconcile::{differs, map_remote, reconcile, sync_once, SyncOutcome};
pub use source::{HttpSource, QuoteSource, RemoteRecord};
