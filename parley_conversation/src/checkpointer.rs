//! Process-local checkpoint storage.
//!
//! Nothing here survives a restart; swap in another `CheckpointStore` when
//! durability matters.

use async_trait::async_trait;
use parley_core::{Checkpoint, CheckpointStore, ConversationState};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryCheckpointer {
    checkpoints: RwLock<HashMap<String, Checkpoint>>,
}

impl InMemoryCheckpointer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointer {
    async fn get(&self, session_id: &str) -> anyhow::Result<ConversationState> {
        let checkpoints = self.checkpoints.read().await;
        Ok(checkpoints
            .get(session_id)
            .map(|cp| cp.state.clone())
            .unwrap_or_default())
    }

    async fn put(&self, session_id: &str, state: ConversationState) -> anyhow::Result<()> {
        let mut checkpoints = self.checkpoints.write().await;
        let checkpoint = match checkpoints.remove(session_id) {
            Some(previous) => previous.advance(state),
            None => Checkpoint::first(session_id, state),
        };
        debug!(
            "Checkpoint {} for session {session_id}: step {}, {} messages",
            checkpoint.id,
            checkpoint.step,
            checkpoint.state.len()
        );
        checkpoints.insert(session_id.to_string(), checkpoint);
        Ok(())
    }

    async fn checkpoint(&self, session_id: &str) -> anyhow::Result<Option<Checkpoint>> {
        Ok(self.checkpoints.read().await.get(session_id).cloned())
    }

    async fn list_sessions(&self) -> anyhow::Result<Vec<String>> {
        let mut sessions: Vec<String> = self.checkpoints.read().await.keys().cloned().collect();
        sessions.sort();
        Ok(sessions)
    }

    async fn delete(&self, session_id: &str) -> anyhow::Result<bool> {
        Ok(self.checkpoints.write().await.remove(session_id).is_some())
    }
}
