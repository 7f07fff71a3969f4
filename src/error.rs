//! # error
//!
//! Centralised session error type.
//!
//! Remote failures (`RemoteTransient` / `RemoteRejected`) never escape the
//! `Session` boundary for chat turns — they are converted into transcript
//! text so the session stays usable after any failure. Trade failures are
//! additionally re-surfaced to the caller so a form can react inline.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Transport-level failure talking to the remote service. Retryable in
    /// principle; the controller never retries on its own.
    #[error("Remote call failed: {0}")]
    RemoteTransient(String),

    /// The remote service refused the request and gave a reason.
    #[error("Remote rejected request: {0}")]
    RemoteRejected(String),

    /// Client-side input rejected before any remote call was dispatched
    /// (non-positive trade amount, operation class already busy, …).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `resolve_pending_turn` was called with no placeholder outstanding.
    /// Internal invariant violation; should not occur through `Session`.
    #[error("No pending assistant turn to resolve")]
    NoPendingTurn,
}

impl SessionError {
    /// Text that replaces the `"Thinking ..."` placeholder when a chat turn
    /// fails. Names the remote reason when one was extractable.
    pub fn chat_notice(&self) -> String {
        match self {
            SessionError::RemoteTransient(reason) | SessionError::RemoteRejected(reason) => {
                format!("Error: {reason}")
            }
            _ => "An error occurred. Please try again.".to_string(),
        }
    }
}
