//! Background sync agent
//!
//! Runs one sync cycle per timer tick for as long as its handle lives.
//! Each cycle walks `Idle → Fetching → (Reconciling | Failed) → Idle`.
//!
//! A cycle never overlaps another: ticks that come due while a fetch is in
//! flight are skipped, and the fetch itself is bounded by a timeout.
//! Failures are logged and reported as events; the next tick runs as usual.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::reconcile::{map_remote, reconcile, SyncOutcome};
use super::source::QuoteSource;
use crate::config::Config;
use crate::store::Store;

/// Commands sent to the sync agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Run a cycle now instead of waiting for the next tick
    SyncNow,
    /// Stop the agent
    Shutdown,
}

/// Where the agent is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Reconciling,
    Failed,
}

/// Events emitted by the sync agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Phase changed
    PhaseChanged(SyncPhase),
    /// Remote data replaced the local collection
    Updated { count: usize },
    /// Remote data matched the local collection
    Unchanged,
    /// The cycle failed; the message is for logs and status lines only
    Failed(String),
}

/// Handle to control the sync agent
pub struct SyncHandle {
    /// Send commands to the agent
    pub command_tx: mpsc::Sender<SyncCommand>,
    /// Receive events, phase changes included
    pub event_rx: mpsc::Receiver<SyncEvent>,
}

/// Timing for the sync agent
#[derive(Debug, Clone)]
pub struct SyncAgentConfig {
    /// Time between cycles
    pub interval: Duration,
    /// Time allowed for one fetch
    pub timeout: Duration,
}

impl Default for SyncAgentConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::config::DEFAULT_SYNC_INTERVAL_SECS),
            timeout: Duration::from_secs(crate::config::DEFAULT_SYNC_TIMEOUT_SECS),
        }
    }
}

impl From<&Config> for SyncAgentConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.sync_interval(),
            timeout: config.sync_timeout(),
        }
    }
}

/// Spawn the sync agent on the current tokio runtime
///
/// The first cycle runs one interval after spawning, or immediately on
/// `SyncCommand::SyncNow`.
pub fn spawn_sync_agent(
    config: SyncAgentConfig,
    source: Arc<dyn QuoteSource>,
    store: Arc<Mutex<Store>>,
) -> SyncHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    tokio::spawn(agent_loop(config, source, store, command_rx, event_tx));

    SyncHandle {
        command_tx,
        event_rx,
    }
}

/// Main agent loop: wait for a tick or command, then run a cycle
async fn agent_loop(
    config: SyncAgentConfig,
    source: Arc<dyn QuoteSource>,
    store: Arc<Mutex<Store>>,
    mut command_rx: mpsc::Receiver<SyncCommand>,
    event_tx: mpsc::Sender<SyncEvent>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Sync agent started (every {:?})", config.interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => ticker.reset(),
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }

        let cycle = run_cycle(&config, source.as_ref(), &store, &event_tx);
        tokio::pin!(cycle);

        // Keep listening while the cycle runs so shutdown is never delayed
        let shutdown = loop {
            tokio::select! {
                _ = &mut cycle => break false,
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(SyncCommand::SyncNow) => debug!("Sync already in flight, skipping"),
                        Some(SyncCommand::Shutdown) | None => break true,
                    }
                }
            }
        };

        if shutdown {
            break;
        }
    }

    info!("Sync agent stopped");
}

/// Run one fetch-and-reconcile cycle
async fn run_cycle(
    config: &SyncAgentConfig,
    source: &dyn QuoteSource,
    store: &Mutex<Store>,
    event_tx: &mpsc::Sender<SyncEvent>,
) {
    set_phase(SyncPhase::Fetching, event_tx).await;

    let records = match tokio::time::timeout(config.timeout, source.fetch()).await {
        Ok(Ok(records)) => records,
        Ok(Err(e)) => {
            fail(format!("{:#}", e), event_tx).await;
            return;
        }
        Err(_) => {
            fail(format!("Fetch timed out after {:?}", config.timeout), event_tx).await;
            return;
        }
    };

    set_phase(SyncPhase::Reconciling, event_tx).await;

    let outcome = {
        let mut store = store.lock().await;
        reconcile(&mut store, map_remote(records))
    };

    match outcome {
        Ok(SyncOutcome::Replaced { count }) => {
            let _ = event_tx.send(SyncEvent::Updated { count }).await;
        }
        Ok(SyncOutcome::Unchanged) => {
            let _ = event_tx.send(SyncEvent::Unchanged).await;
        }
        Err(e) => {
            fail(format!("{:#}", e), event_tx).await;
            return;
        }
    }

    set_phase(SyncPhase::Idle, event_tx).await;
}

async fn set_phase(phase: SyncPhase, event_tx: &mpsc::Sender<SyncEvent>) {
    let _ = event_tx.send(SyncEvent::PhaseChanged(phase)).await;
}

async fn fail(message: String, event_tx: &mpsc::Sender<SyncEvent>) {
    warn!("Sync failed: {}", message);
    set_phase(SyncPhase::Failed, event_tx).await;
    let _ = event_tx.send(SyncEvent::Failed(message)).await;
    set_phase(SyncPhase::Idle, event_tx).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crate::sync::RemoteRecord;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Source that replays scripted responses, then keeps returning the last one
    struct ScriptedSource {
        responses: std::sync::Mutex<VecDeque<Result<Vec<RemoteRecord>, String>>>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<RemoteRecord>, String>>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl QuoteSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<RemoteRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = {
                let mut responses = self.responses.lock().unwrap();
                if responses.len() > 1 {
                    responses.pop_front()
                } else {
                    responses.front().cloned()
                }
            };
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match next {
                Some(Ok(records)) => Ok(records),
                Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn open_store(temp_dir: &TempDir) -> Arc<Mutex<Store>> {
        let store = Store::open_with_config(Config::with_data_dir(temp_dir.path())).unwrap();
        Arc::new(Mutex::new(store))
    }

    fn agent_config() -> SyncAgentConfig {
        SyncAgentConfig {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(5),
        }
    }

    /// Wait for the next non-phase event
    async fn next_outcome(handle: &mut SyncHandle) -> SyncEvent {
        loop {
            match handle.event_rx.recv().await {
                Some(SyncEvent::PhaseChanged(_)) => continue,
                Some(event) => return event,
                None => panic!("sync agent stopped unexpectedly"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_now_replaces_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![
            RemoteRecord::new("one"),
            RemoteRecord::new("two"),
        ])]));

        let mut handle = spawn_sync_agent(agent_config(), source, store.clone());
        handle.command_tx.send(SyncCommand::SyncNow).await.unwrap();

        assert_eq!(next_outcome(&mut handle).await, SyncEvent::Updated { count: 2 });
        assert_eq!(
            store.lock().await.quotes(),
            &[Quote::new("one", "General"), Quote::new("two", "General")]
        );

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_drives_cycles() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![RemoteRecord::new("r")])]));

        let mut handle = spawn_sync_agent(agent_config(), source.clone(), store.clone());

        // First tick replaces, second finds nothing new
        assert_eq!(next_outcome(&mut handle).await, SyncEvent::Updated { count: 1 });
        assert_eq!(next_outcome(&mut handle).await, SyncEvent::Unchanged);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_reported_and_next_tick_recovers() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(ScriptedSource::new(vec![
            Err("connection refused".to_string()),
            Ok(vec![RemoteRecord::new("back")]),
        ]));

        let mut handle = spawn_sync_agent(agent_config(), source, store.clone());

        match next_outcome(&mut handle).await {
            SyncEvent::Failed(msg) => assert!(msg.contains("connection refused")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(store.lock().await.len(), 3);

        assert_eq!(next_outcome(&mut handle).await, SyncEvent::Updated { count: 1 });

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_keeps_local_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        std::fs::create_dir(temp_dir.path().join("quotes.json.tmp")).unwrap();
        let source = Arc::new(ScriptedSource::new(vec![Ok(vec![RemoteRecord::new("r")])]));

        let mut handle = spawn_sync_agent(agent_config(), source, store.clone());
        handle.command_tx.send(SyncCommand::SyncNow).await.unwrap();

        match next_outcome(&mut handle).await {
            SyncEvent::Failed(msg) => assert!(msg.contains("Failed to save replaced quotes")),
            other => panic!("expected failure, got {:?}", other),
        }
        {
            let store = store.lock().await;
            assert_eq!(store.quotes(), crate::models::seed_quotes().as_slice());
            assert!(!store.category_index().contains("General"));
        }

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(vec![RemoteRecord::new("late")])])
                .with_delay(Duration::from_secs(60)),
        );

        let mut handle = spawn_sync_agent(agent_config(), source, store.clone());
        handle.command_tx.send(SyncCommand::SyncNow).await.unwrap();

        match next_outcome(&mut handle).await {
            SyncEvent::Failed(msg) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(store.lock().await.len(), 3);

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_now_during_cycle_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(vec![RemoteRecord::new("r")])])
                .with_delay(Duration::from_secs(2)),
        );

        let mut handle = spawn_sync_agent(agent_config(), source.clone(), store);
        handle.command_tx.send(SyncCommand::SyncNow).await.unwrap();

        // Wait until the fetch is in flight, then ask again
        loop {
            if handle.event_rx.recv().await == Some(SyncEvent::PhaseChanged(SyncPhase::Fetching)) {
                break;
            }
        }
        handle.command_tx.send(SyncCommand::SyncNow).await.unwrap();

        assert_eq!(next_outcome(&mut handle).await, SyncEvent::Updated { count: 1 });
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_agent() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(&temp_dir);
        let source = Arc::new(ScriptedSource::new(vec![Ok(Vec::new())]));

        let mut handle = spawn_sync_agent(agent_config(), source.clone(), store);
        handle.command_tx.send(SyncCommand::Shutdown).await.unwrap();

        // Event channel closes once the agent task has finished
        while handle.event_rx.recv().await.is_some() {}
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_agent_config_from_config() {
        let mut config = Config::default();
        config.sync_interval_secs = 7;
        config.sync_timeout_secs = 3;

        let agent = SyncAgentConfig::from(&config);
        assert_eq!(agent.interval, Duration::from_secs(7));
        assert_eq!(agent.timeout, Duration::from_secs(3));
    }
}
