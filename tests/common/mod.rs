//! Scripted [`TradingGateway`] used by the integration tests.
//!
//! Every operation counts its calls, can be gated on a [`Notify`] to model
//! slow responses, and returns a scripted result (with sane defaults so
//! tests only script what they assert on).

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use quantumic::{
    Asset, Direction, MarketDataSnapshot, MarketDatum, Message, PortfolioSnapshot, SessionError,
    TradeRecord, TradingGateway,
};

// ─── Sample data ──────────────────────────────────────────────────────────────

pub fn sample_portfolio() -> PortfolioSnapshot {
    PortfolioSnapshot {
        balances:        vec![("BTC".to_string(), 0.5), ("ICP".to_string(), 100.0)],
        total_value:     34_500.0,
        performance_24h: 2.4,
    }
}

pub fn sample_market() -> MarketDataSnapshot {
    vec![MarketDatum {
        asset:      "BTC".to_string(),
        price:      67_000.0,
        change_24h: 3.1,
        volume:     1.0e9,
        market_cap: 1.3e12,
    }]
}

pub fn sample_trade() -> TradeRecord {
    TradeRecord {
        timestamp: 1_700_000_000_000_000_000,
        direction: Direction::Buy,
        asset:     "BTC".to_string(),
        amount:    0.5,
        price:     67_000.0,
        reason:    "momentum breakout".to_string(),
    }
}

// ─── Mock gateway ─────────────────────────────────────────────────────────────

type Gate = Option<Arc<Notify>>;

pub struct MockGateway {
    // chat
    chat_replies:           Mutex<VecDeque<Result<String, SessionError>>>,
    chat_gate:              Mutex<Gate>,
    pub chat_calls:         AtomicUsize,
    pub chat_histories:     Mutex<Vec<Vec<Message>>>,

    // reads
    portfolio:              Mutex<Result<PortfolioSnapshot, SessionError>>,
    pub portfolio_calls:    AtomicUsize,
    portfolio_gate:         Mutex<Gate>,
    market:                 Mutex<Result<MarketDataSnapshot, SessionError>>,
    market_scripts:         Mutex<VecDeque<(Gate, Result<MarketDataSnapshot, SessionError>)>>,
    pub market_calls:       AtomicUsize,
    trade_history:          Mutex<Result<Vec<TradeRecord>, SessionError>>,
    pub trade_history_calls: AtomicUsize,

    // trades
    trade_result:           Mutex<Result<TradeRecord, SessionError>>,
    trade_gate:             Mutex<Gate>,
    pub execute_calls:      AtomicUsize,
    pub auto_calls:         AtomicUsize,
    pub trade_requests:     Mutex<Vec<(Asset, Direction, f64)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            chat_replies:        Mutex::new(VecDeque::new()),
            chat_gate:           Mutex::new(None),
            chat_calls:          AtomicUsize::new(0),
            chat_histories:      Mutex::new(Vec::new()),

            portfolio:           Mutex::new(Ok(sample_portfolio())),
            portfolio_calls:     AtomicUsize::new(0),
            portfolio_gate:      Mutex::new(None),
            market:              Mutex::new(Ok(sample_market())),
            market_scripts:      Mutex::new(VecDeque::new()),
            market_calls:        AtomicUsize::new(0),
            trade_history:       Mutex::new(Ok(vec![sample_trade()])),
            trade_history_calls: AtomicUsize::new(0),

            trade_result:        Mutex::new(Ok(sample_trade())),
            trade_gate:          Mutex::new(None),
            execute_calls:       AtomicUsize::new(0),
            auto_calls:          AtomicUsize::new(0),
            trade_requests:      Mutex::new(Vec::new()),
        }
    }

    // ── Scripting ─────────────────────────────────────────────────────────────

    pub fn push_chat_reply(&self, reply: Result<String, SessionError>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    /// Make every chat call block until the returned handle is notified.
    pub fn gate_chat(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn set_portfolio(&self, result: Result<PortfolioSnapshot, SessionError>) {
        *self.portfolio.lock().unwrap() = result;
    }

    pub fn gate_portfolio(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.portfolio_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn set_market(&self, result: Result<MarketDataSnapshot, SessionError>) {
        *self.market.lock().unwrap() = result;
    }

    /// Queue a one-shot market response, optionally gated. Scripts are
    /// consumed in dispatch order before the default `set_market` result.
    pub fn push_market_script(
        &self,
        gate: Gate,
        result: Result<MarketDataSnapshot, SessionError>,
    ) {
        self.market_scripts.lock().unwrap().push_back((gate, result));
    }

    pub fn set_trade_history(&self, result: Result<Vec<TradeRecord>, SessionError>) {
        *self.trade_history.lock().unwrap() = result;
    }

    pub fn set_trade_result(&self, result: Result<TradeRecord, SessionError>) {
        *self.trade_result.lock().unwrap() = result;
    }

    /// Make every trade call block until the returned handle is notified.
    pub fn gate_trades(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.trade_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Spin-yield until `cond` holds. Panics if it never does (deadlocked test).
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

async fn wait(gate: Gate) {
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[async_trait]
impl TradingGateway for MockGateway {
    async fn chat(&self, history: &[Message]) -> Result<String, SessionError> {
        self.chat_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.chat_histories.lock().unwrap().push(history.to_vec());
        let gate = self.chat_gate.lock().unwrap().clone();
        wait(gate).await;
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }

    async fn get_portfolio(&self) -> Result<PortfolioSnapshot, SessionError> {
        self.portfolio_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let gate = self.portfolio_gate.lock().unwrap().clone();
        wait(gate).await;
        self.portfolio.lock().unwrap().clone()
    }

    async fn get_market_data(&self) -> Result<MarketDataSnapshot, SessionError> {
        self.market_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let script = self.market_scripts.lock().unwrap().pop_front();
        match script {
            Some((gate, result)) => {
                wait(gate).await;
                result
            }
            None => self.market.lock().unwrap().clone(),
        }
    }

    async fn get_trade_history(&self) -> Result<Vec<TradeRecord>, SessionError> {
        self.trade_history_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.trade_history.lock().unwrap().clone()
    }

    async fn execute_trade(
        &self,
        asset: Asset,
        direction: Direction,
        amount: f64,
    ) -> Result<TradeRecord, SessionError> {
        self.execute_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.trade_requests.lock().unwrap().push((asset, direction, amount));
        let gate = self.trade_gate.lock().unwrap().clone();
        wait(gate).await;
        self.trade_result.lock().unwrap().clone()
    }

    async fn auto_trade(&self) -> Result<TradeRecord, SessionError> {
        self.auto_calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let gate = self.trade_gate.lock().unwrap().clone();
        wait(gate).await;
        self.trade_result.lock().unwrap().clone()
    }
}
