//! # gateway
//!
//! Typed request/response boundary to the remote agent + ledger service.
//!
//! Six operations, each a single round trip — no client-side retry and no
//! client-side timeout (failure is whatever the transport reports; the
//! reads are idempotent, the trade calls are **not** and must never be
//! retried blindly).
//!
//! ## HTTP contract
//! ```text
//! POST /api/chat         {"messages": [...]}            → {"reply": "..."}
//! GET  /api/portfolio                                   → PortfolioSnapshot
//! GET  /api/market                                      → [MarketDatum]
//! GET  /api/trades                                      → [TradeRecord]
//! POST /api/trades       {"asset":"#BTC","direction":"BUY","amount":0.5}
//!                                                       → TradeRecord
//! POST /api/trades/auto                                 → TradeRecord
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::SessionError;
use crate::models::{
    Asset, Direction, MarketDataSnapshot, Message, PortfolioSnapshot, TradeRecord,
};

// ─── Trait ────────────────────────────────────────────────────────────────────

/// The remote agent + ledger, as the session controller sees it.
#[async_trait]
pub trait TradingGateway: Send + Sync {
    /// One conversational turn. `history` is prior resolved turns plus the
    /// new user turn — no welcome banner, no placeholder.
    async fn chat(&self, history: &[Message]) -> Result<String, SessionError>;

    async fn get_portfolio(&self) -> Result<PortfolioSnapshot, SessionError>;

    async fn get_market_data(&self) -> Result<MarketDataSnapshot, SessionError>;

    async fn get_trade_history(&self) -> Result<Vec<TradeRecord>, SessionError>;

    /// Mutates remote ledger state; not idempotent.
    async fn execute_trade(
        &self,
        asset: Asset,
        direction: Direction,
        amount: f64,
    ) -> Result<TradeRecord, SessionError>;

    /// Remote-decided trade; same non-idempotence contract as
    /// [`TradingGateway::execute_trade`].
    async fn auto_trade(&self) -> Result<TradeRecord, SessionError>;
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Serialize)]
struct TradeRequest {
    asset:     &'static str,
    direction: Direction,
    amount:    f64,
}

// ─── HTTP implementation ──────────────────────────────────────────────────────

/// reqwest-backed gateway. The `Client` is shared and pools connections.
pub struct HttpGateway {
    client:   reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SessionError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!(error = %e, url = %url, "request failed");
            SessionError::RemoteTransient(e.to_string())
        })?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SessionError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST");

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(error = %e, url = %url, "request failed");
            SessionError::RemoteTransient(e.to_string())
        })?;
        decode(response).await
    }
}

/// Map a response to the stable error vocabulary: 4xx → `RemoteRejected`
/// with the body as reason, anything else non-success or unparseable →
/// `RemoteTransient`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SessionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let reason = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body.trim().to_string()
        };
        return Err(if status.is_client_error() {
            SessionError::RemoteRejected(reason)
        } else {
            SessionError::RemoteTransient(reason)
        });
    }

    response
        .json()
        .await
        .map_err(|e| SessionError::RemoteTransient(format!("response parse error: {e}")))
}

#[async_trait]
impl TradingGateway for HttpGateway {
    async fn chat(&self, history: &[Message]) -> Result<String, SessionError> {
        let response: ChatResponse =
            self.post_json("/api/chat", &ChatRequest { messages: history }).await?;
        Ok(response.reply)
    }

    async fn get_portfolio(&self) -> Result<PortfolioSnapshot, SessionError> {
        self.get_json("/api/portfolio").await
    }

    async fn get_market_data(&self) -> Result<MarketDataSnapshot, SessionError> {
        self.get_json("/api/market").await
    }

    async fn get_trade_history(&self) -> Result<Vec<TradeRecord>, SessionError> {
        self.get_json("/api/trades").await
    }

    async fn execute_trade(
        &self,
        asset: Asset,
        direction: Direction,
        amount: f64,
    ) -> Result<TradeRecord, SessionError> {
        let body = TradeRequest { asset: asset.tag(), direction, amount };
        self.post_json("/api/trades", &body).await
    }

    async fn auto_trade(&self) -> Result<TradeRecord, SessionError> {
        self.post_json("/api/trades/auto", &serde_json::json!({})).await
    }
}
