//! Session checkpoints and the persistence seam behind them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::ConversationState;

/// Latest stored snapshot of a session.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Identifier of this snapshot; a new one is issued on every write.
    pub id: Uuid,
    pub session_id: String,
    pub state: ConversationState,
    /// Number of writes this session has seen.
    pub step: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    #[must_use]
    pub fn first(session_id: &str, state: ConversationState) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.to_string(),
            state,
            step: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the snapshot, keeping session identity and creation time.
    #[must_use]
    pub fn advance(self, state: ConversationState) -> Self {
        Self {
            id: Uuid::now_v7(),
            state,
            step: self.step + 1,
            updated_at: Utc::now(),
            ..self
        }
    }
}

/// Keyed storage of conversation state.
///
/// `put` is a full overwrite; there is no merge policy at this layer.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Stored state for `session_id`, or an empty state if it was never written.
    async fn get(&self, session_id: &str) -> anyhow::Result<ConversationState>;

    async fn put(&self, session_id: &str, state: ConversationState) -> anyhow::Result<()>;

    async fn checkpoint(&self, session_id: &str) -> anyhow::Result<Option<Checkpoint>>;

    async fn list_sessions(&self) -> anyhow::Result<Vec<String>>;

    /// Forget a session. Returns whether anything was stored.
    async fn delete(&self, session_id: &str) -> anyhow::Result<bool>;
}

#[async_trait]
impl<T: CheckpointStore + ?Sized> CheckpointStore for Arc<T> {
    async fn get(&self, session_id: &str) -> anyhow::Result<ConversationState> {
        (**self).get(session_id).await
    }

    async fn put(&self, session_id: &str, state: ConversationState) -> anyhow::Result<()> {
        (**self).put(session_id, state).await
    }

    async fn checkpoint(&self, session_id: &str) -> anyhow::Result<Option<Checkpoint>> {
        (**self).checkpoint(session_id).await
    }

    async fn list_sessions(&self) -> anyhow::Result<Vec<String>> {
        (**self).list_sessions().await
    }

    async fn delete(&self, session_id: &str) -> anyhow::Result<bool> {
        (**self).delete(session_id).await
    }
}
