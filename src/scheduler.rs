//! # scheduler
//!
//! Periodic background refresh of the [`SyncedStateCache`].
//!
//! ## Flow
//! ```text
//! start():
//!   tick 0 (immediate) → refresh portfolio + market + trades
//!   tick every 30 s    → refresh again
//! stop():
//!   cancel the ticker — future ticks suppressed, in-flight refreshes
//!   (spawned detached) run to completion
//! ```
//!
//! The scheduler never touches the per-operation busy flags: the reads are
//! side-effect-free and idempotent, so a refresh may run concurrently with a
//! chat turn or trade execution.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::SyncedStateCache;

/// Refresh cadence matching the dashboard's 30-second poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

pub struct PollingScheduler {
    cache:    Arc<SyncedStateCache>,
    interval: Duration,
    handle:   Mutex<Option<JoinHandle<()>>>,
}

impl PollingScheduler {
    pub fn new(cache: Arc<SyncedStateCache>, interval: Duration) -> Self {
        Self { cache, interval, handle: Mutex::new(None) }
    }

    /// Stopped → Running. The first tick fires immediately (initial full
    /// refresh). No-op while already running.
    pub async fn start(&self) {
        let mut guard = self.handle.lock().await;
        if guard.is_some() {
            return;
        }

        let cache = Arc::clone(&self.cache);
        let interval = self.interval;
        *guard = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                debug!("poll tick, refreshing snapshots");
                // Detached so that stop() only suppresses future ticks and
                // never cancels a refresh already dispatched.
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.refresh_all().await });
            }
        }));

        info!(interval = ?self.interval, "polling scheduler started");
    }

    /// Running → Stopped. Guarantees no further refresh is scheduled.
    pub async fn stop(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
            info!("polling scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}
