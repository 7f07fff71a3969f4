//! # Quantumic — session controller for the AI trading dashboard
//!
//! ```text
//!  ┌──────────────┐ submit_chat_turn / submit_*_trade ┌──────────────────────┐
//!  │ Presentation │ ─────────────────────────────────▶ │ Session              │
//!  │ (UI layer)   │ ◀───────── snapshots ───────────── │ ├─ ConversationStore │
//!  └──────────────┘                                    │ ├─ SyncedStateCache  │
//!                                                      │ ├─ PollingScheduler  │
//!  ┌──────────────┐  chat / reads / trades             │ └─ busy flags        │
//!  │ Remote agent │ ◀───────────────────────────────── │   TradingGateway     │
//!  │ + ledger     │                                    └──────────────────────┘
//!  └──────────────┘
//! ```
//!
//! The crate owns the orchestration rules: how conversational state,
//! in-flight request state and polled remote state interact, stay consistent
//! and recover from failure. Rendering belongs to the presentation layer,
//! which only consumes the read-only snapshots and the pure helpers in
//! [`format`].

pub mod cache;
pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod gateway;
pub mod models;
pub mod scheduler;
pub mod session;

pub use cache::SyncedStateCache;
pub use config::Config;
pub use conversation::ConversationStore;
pub use error::SessionError;
pub use gateway::{HttpGateway, TradingGateway};
pub use models::{
    Asset, Direction, MarketDataSnapshot, MarketDatum, Message, PortfolioSnapshot, Sender,
    TradeRecord,
};
pub use scheduler::{PollingScheduler, DEFAULT_POLL_INTERVAL};
pub use session::{OpKind, Session};
