//! # conversation
//!
//! Ordered transcript with two-phase pending-turn semantics.
//!
//! A user submission appends the User message *and* a trailing
//! `"Thinking ..."` Assistant placeholder in one step; the placeholder is
//! later replaced in place by [`ConversationStore::resolve_pending_turn`].
//! The store owns the sequence — callers never splice it — so the invariant
//! "at most one pending placeholder, always directly after the User message
//! that triggered it" is enforced in exactly one place.

use tokio::sync::RwLock;
use tracing::warn;

use crate::error::SessionError;
use crate::models::Message;

/// Placeholder shown while the agent is computing a reply.
pub const THINKING: &str = "Thinking ...";

/// Welcome banner seeded as the first transcript entry. Never sent to the
/// agent.
pub const WELCOME: &str = "I'm Quantumic, an AI-powered trading assistant. \
I can analyze markets, execute trades, and answer questions.\n\n\
Here's what I can help with:\n\
- Portfolio analysis\n\
- Market trends\n\
- Trade execution\n\
- Risk assessment\n\n\
Try asking:\n\
1. What's my portfolio performance?\n\
2. Show me market trends for BTC\n\
3. Execute a trade for 0.5 ETH";

struct Transcript {
    messages: Vec<Message>,
    /// Index of the unresolved Assistant placeholder, if any.
    pending:  Option<usize>,
}

/// Session-scoped transcript. All mutation goes through the methods below.
pub struct ConversationStore {
    inner: RwLock<Transcript>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Transcript {
                messages: vec![Message::system(WELCOME)],
                pending:  None,
            }),
        }
    }

    /// Append a User message plus a trailing pending Assistant placeholder.
    ///
    /// Returns `false` without touching the transcript when `content` trims
    /// to empty (empty prompts are silently ignored, not an error) or when a
    /// placeholder is already outstanding.
    pub async fn append_user_turn(&self, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return false;
        }

        let mut transcript = self.inner.write().await;
        if transcript.pending.is_some() {
            // Session's busy flag should make this unreachable.
            warn!("user turn dropped, a pending assistant turn is already outstanding");
            return false;
        }

        transcript.messages.push(Message::user(content));
        transcript.messages.push(Message::assistant(THINKING));
        transcript.pending = Some(transcript.messages.len() - 1);
        true
    }

    /// Replace the pending placeholder with the finalized Assistant reply.
    pub async fn resolve_pending_turn(
        &self,
        content: impl Into<String>,
    ) -> Result<(), SessionError> {
        let mut transcript = self.inner.write().await;
        let index = transcript.pending.take().ok_or(SessionError::NoPendingTurn)?;
        transcript.messages[index].content = content.into();
        Ok(())
    }

    /// Append an informational/error System notice. Does not interact with
    /// the pending placeholder.
    pub async fn append_system_notice(&self, content: impl Into<String>) {
        let mut transcript = self.inner.write().await;
        transcript.messages.push(Message::system(content));
    }

    /// Full transcript for rendering.
    pub async fn snapshot(&self) -> Vec<Message> {
        self.inner.read().await.messages.clone()
    }

    /// History to send to the agent: everything except the seeded welcome
    /// banner and the as-yet-unresolved placeholder.
    pub async fn outbound_history(&self) -> Vec<Message> {
        let transcript = self.inner.read().await;
        transcript
            .messages
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(i, _)| Some(*i) != transcript.pending)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub async fn has_pending_turn(&self) -> bool {
        self.inner.read().await.pending.is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        // The welcome banner means a fresh transcript is never empty.
        self.len().await == 0
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
