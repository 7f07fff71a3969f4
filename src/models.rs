//! # models
//!
//! Data shared between the session controller and the remote agent / ledger
//! service. Wire field names are camelCase (`totalValue`, `change24h`, …) to
//! match what the service emits.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ─── Chat ─────────────────────────────────────────────────────────────────────

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
    /// Non-conversational notices: the welcome banner, trade confirmations,
    /// error surfacing.
    System,
}

/// One transcript entry. The transcript is strictly chronological and never
/// reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role:    Sender,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Sender::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Sender::Assistant, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Sender::System, content: content.into() }
    }
}

// ─── Assets ───────────────────────────────────────────────────────────────────

/// Tradeable assets the dashboard knows about. The ledger identifies them by
/// `#`-prefixed tag; the UI by plain symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Icp,
    Sol,
    Usdt,
}

impl Asset {
    /// Ledger-side tag, e.g. `"#BTC"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Asset::Btc  => "#BTC",
            Asset::Eth  => "#ETH",
            Asset::Icp  => "#ICP",
            Asset::Sol  => "#SOL",
            Asset::Usdt => "#USDT",
        }
    }

    /// Display symbol, e.g. `"BTC"`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc  => "BTC",
            Asset::Eth  => "ETH",
            Asset::Icp  => "ICP",
            Asset::Sol  => "SOL",
            Asset::Usdt => "USDT",
        }
    }

    /// Parse a user-facing symbol (case-insensitive).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_uppercase().as_str() {
            "BTC"  => Some(Asset::Btc),
            "ETH"  => Some(Asset::Eth),
            "ICP"  => Some(Asset::Icp),
            "SOL"  => Some(Asset::Sol),
            "USDT" => Some(Asset::Usdt),
            _ => None,
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy  => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

// ─── Snapshots ────────────────────────────────────────────────────────────────

/// Portfolio as read from the ledger. Produced wholesale by a single remote
/// read; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    /// `(asset, amount)` pairs in ledger order.
    pub balances:        Vec<(String, f64)>,
    pub total_value:     f64,
    pub performance_24h: f64,
}

/// Per-asset market quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDatum {
    pub asset:      String,
    pub price:      f64,
    pub change_24h: f64,
    pub volume:     f64,
    pub market_cap: f64,
}

/// One entry per tracked asset, replaced wholesale on each successful fetch.
pub type MarketDataSnapshot = Vec<MarketDatum>;

// ─── Trades ───────────────────────────────────────────────────────────────────

/// A trade as recorded by the remote ledger. The ledger is the source of
/// truth for order and content; the client never appends locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Nanoseconds since the Unix epoch, as reported by the ledger.
    pub timestamp: u64,
    pub direction: Direction,
    pub asset:     String,
    pub amount:    f64,
    pub price:     f64,
    pub reason:    String,
}

impl TradeRecord {
    /// Wall-clock instant of execution.
    pub fn executed_at(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.timestamp as i64)
    }
}
