//! # session
//!
//! The session object — conversation, snapshot cache and polling lifecycle
//! under one owner — plus the single-flight rules for user-initiated
//! operations.
//!
//! ```text
//!  submit_chat_turn ──┐                       ┌─▶ ConversationStore
//!  submit_*_trade  ───┤  per-class busy flag  ├─▶ SyncedStateCache
//!                     └──▶ TradingGateway ────┘
//!  PollingScheduler ─────▶ SyncedStateCache      (bypasses the flags)
//! ```
//!
//! Each operation class has its own lock: a chat turn never masks trade
//! availability and vice versa. A flag is set immediately before dispatch
//! and reset on every exit path by an RAII guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::cache::SyncedStateCache;
use crate::conversation::ConversationStore;
use crate::error::SessionError;
use crate::format::format_usd;
use crate::gateway::TradingGateway;
use crate::models::{Asset, Direction, TradeRecord};
use crate::scheduler::{PollingScheduler, DEFAULT_POLL_INTERVAL};

// ─── Operation locks ──────────────────────────────────────────────────────────

/// Operation classes guarded by single-flight busy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    ChatTurn,
    TradeExecution,
}

struct OperationLock {
    busy: AtomicBool,
}

impl OperationLock {
    fn new() -> Self {
        Self { busy: AtomicBool::new(false) }
    }

    /// Idle → Busy, or `None` if a call of this class is already outstanding.
    fn try_acquire(&self) -> Option<OpGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(OpGuard { lock: self })
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Resets the flag on drop — success, failure and cancellation all release.
struct OpGuard<'a> {
    lock: &'a OperationLock,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// One dashboard session. Created at session start, torn down with
/// [`Session::stop`]; all state is in-memory for the session's lifetime.
pub struct Session {
    gateway:      Arc<dyn TradingGateway>,
    conversation: ConversationStore,
    cache:        Arc<SyncedStateCache>,
    scheduler:    PollingScheduler,
    chat_lock:    OperationLock,
    trade_lock:   OperationLock,
}

impl Session {
    pub fn new(gateway: Arc<dyn TradingGateway>) -> Self {
        Self::with_poll_interval(gateway, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(gateway: Arc<dyn TradingGateway>, interval: Duration) -> Self {
        let cache = Arc::new(SyncedStateCache::new(Arc::clone(&gateway)));
        let scheduler = PollingScheduler::new(Arc::clone(&cache), interval);
        Self {
            gateway,
            conversation: ConversationStore::new(),
            cache,
            scheduler,
            chat_lock: OperationLock::new(),
            trade_lock: OperationLock::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Wire the polling scheduler; its immediate first tick performs the
    /// initial full refresh.
    pub async fn start(&self) {
        self.scheduler.start().await;
        info!("session started");
    }

    /// Tear down the poll timer and stop accepting refresh results. In-flight
    /// remote calls are not cancellable; their eventual results are
    /// discarded.
    pub async fn stop(&self) {
        self.scheduler.stop().await;
        self.cache.close();
        info!("session stopped");
    }

    // ── Read-only surface for the presentation layer ──────────────────────────

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn cache(&self) -> &SyncedStateCache {
        &self.cache
    }

    pub fn is_busy(&self, kind: OpKind) -> bool {
        match kind {
            OpKind::ChatTurn => self.chat_lock.is_busy(),
            OpKind::TradeExecution => self.trade_lock.is_busy(),
        }
    }

    // ── Chat ──────────────────────────────────────────────────────────────────

    /// Submit one chat turn. Returns `true` if the turn was dispatched;
    /// empty input and submissions while a turn is in flight are dropped at
    /// the boundary. Remote failures never escape: the placeholder is always
    /// resolved, with the reply or with error text.
    pub async fn submit_chat_turn(&self, text: &str) -> bool {
        let Some(_guard) = self.chat_lock.try_acquire() else {
            warn!("chat turn dropped, previous turn still in flight");
            return false;
        };

        if !self.conversation.append_user_turn(text).await {
            return false;
        }

        let history = self.conversation.outbound_history().await;
        let resolution = match self.gateway.chat(&history).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat turn failed");
                e.chat_notice()
            }
        };

        if let Err(e) = self.conversation.resolve_pending_turn(resolution).await {
            // Unreachable while the busy flag is held.
            error!(error = %e, "pending turn vanished while chat was in flight");
        }
        true
    }

    // ── Trades ────────────────────────────────────────────────────────────────

    /// Manually execute a trade against the ledger.
    pub async fn submit_manual_trade(
        &self,
        asset: Asset,
        direction: Direction,
        amount: f64,
    ) -> Result<TradeRecord, SessionError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SessionError::InvalidInput(
                "trade amount must be a positive number".to_string(),
            ));
        }
        let Some(_guard) = self.trade_lock.try_acquire() else {
            return Err(SessionError::InvalidInput(
                "a trade is already in flight".to_string(),
            ));
        };

        info!(asset = asset.symbol(), direction = %direction, amount = amount, "🚀 submitting trade");
        let outcome = self.gateway.execute_trade(asset, direction, amount).await;
        self.finish_trade(outcome, "Trade").await
    }

    /// Let the remote agent pick and execute a trade.
    pub async fn submit_auto_trade(&self) -> Result<TradeRecord, SessionError> {
        let Some(_guard) = self.trade_lock.try_acquire() else {
            return Err(SessionError::InvalidInput(
                "a trade is already in flight".to_string(),
            ));
        };

        info!("🤖 requesting auto trade");
        let outcome = self.gateway.auto_trade().await;
        self.finish_trade(outcome, "Auto trade").await
    }

    /// Shared tail of both trade paths: on success refresh the two affected
    /// slots concurrently and append the summary notice; on failure append a
    /// failure notice and re-surface the error to the caller.
    async fn finish_trade(
        &self,
        outcome: Result<TradeRecord, SessionError>,
        label: &str,
    ) -> Result<TradeRecord, SessionError> {
        match outcome {
            Ok(trade) => {
                tokio::join!(
                    self.cache.refresh_portfolio(),
                    self.cache.refresh_trade_history(),
                );
                info!(
                    direction = %trade.direction,
                    asset     = %trade.asset,
                    amount    = trade.amount,
                    price     = trade.price,
                    "✅ trade executed"
                );
                self.conversation
                    .append_system_notice(format!(
                        "Executed {}: {} {} {} at {}. Reason: {}",
                        label.to_lowercase(),
                        trade.direction,
                        trade.amount,
                        trade.asset,
                        format_usd(trade.price),
                        trade.reason,
                    ))
                    .await;
                Ok(trade)
            }
            Err(e) => {
                warn!(error = %e, "❌ {label} failed");
                let notice = match &e {
                    SessionError::RemoteRejected(reason)
                    | SessionError::RemoteTransient(reason) => {
                        format!("{label} failed: {reason}")
                    }
                    _ => format!("{label} failed. Please try again."),
                };
                self.conversation.append_system_notice(notice).await;
                Err(e)
            }
        }
    }
}
