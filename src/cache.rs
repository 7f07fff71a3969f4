//! # cache
//!
//! Last-successful-fetch snapshots of the three remote read views.
//!
//! Each slot is independently nullable until its first successful fetch. A
//! failed refresh leaves the previous value untouched (stale-but-present
//! over empty). Refreshes hold no lock while the fetch is in flight, so
//! overlapping refreshes of the same slot are possible and the last response
//! to complete wins — the dashboard accepts that ordering hazard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::gateway::TradingGateway;
use crate::models::{MarketDataSnapshot, PortfolioSnapshot, TradeRecord};

pub struct SyncedStateCache {
    gateway:       Arc<dyn TradingGateway>,
    portfolio:     RwLock<Option<PortfolioSnapshot>>,
    market_data:   RwLock<Option<MarketDataSnapshot>>,
    trade_history: RwLock<Option<Vec<TradeRecord>>>,
    /// Set at session teardown. Refreshes that resolve afterwards discard
    /// their result instead of writing to a dead session's state.
    closed:        AtomicBool,
}

impl SyncedStateCache {
    pub fn new(gateway: Arc<dyn TradingGateway>) -> Self {
        Self {
            gateway,
            portfolio:     RwLock::new(None),
            market_data:   RwLock::new(None),
            trade_history: RwLock::new(None),
            closed:        AtomicBool::new(false),
        }
    }

    // ── Refresh ───────────────────────────────────────────────────────────────

    pub async fn refresh_portfolio(&self) {
        match self.gateway.get_portfolio().await {
            Ok(snapshot) => self.store(&self.portfolio, snapshot, "portfolio").await,
            Err(e) => warn!(error = %e, "portfolio refresh failed, keeping previous snapshot"),
        }
    }

    pub async fn refresh_market_data(&self) {
        match self.gateway.get_market_data().await {
            Ok(snapshot) => self.store(&self.market_data, snapshot, "market_data").await,
            Err(e) => warn!(error = %e, "market data refresh failed, keeping previous snapshot"),
        }
    }

    pub async fn refresh_trade_history(&self) {
        match self.gateway.get_trade_history().await {
            Ok(trades) => self.store(&self.trade_history, trades, "trade_history").await,
            Err(e) => warn!(error = %e, "trade history refresh failed, keeping previous snapshot"),
        }
    }

    /// Refresh all three slots. The slots are independent; one failing never
    /// blocks or taints another.
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.refresh_portfolio(),
            self.refresh_market_data(),
            self.refresh_trade_history(),
        );
    }

    async fn store<T>(&self, slot: &RwLock<Option<T>>, value: T, what: &'static str) {
        if self.closed.load(Ordering::Acquire) {
            debug!(slot = what, "session closed, dropping refresh result");
            return;
        }
        *slot.write().await = Some(value);
        debug!(slot = what, "snapshot replaced");
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    pub async fn portfolio(&self) -> Option<PortfolioSnapshot> {
        self.portfolio.read().await.clone()
    }

    pub async fn market_data(&self) -> Option<MarketDataSnapshot> {
        self.market_data.read().await.clone()
    }

    pub async fn trade_history(&self) -> Option<Vec<TradeRecord>> {
        self.trade_history.read().await.clone()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Stop accepting refresh results. Called once at session teardown.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
