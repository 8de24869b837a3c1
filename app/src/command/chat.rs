//! Multi-turn conversation on one session.
//!
//! History lives in memory for the lifetime of the process, so a session only
//! accumulates across turns within a single interactive run.

use parley_core::CheckpointStore;
use tracing::info;

use super::build_graph;

pub const DEFAULT_SESSION: &str = "cli:default";

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Session key (defaults to `cli:default`)
    pub session_id: Option<String>,
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let graph = build_graph(input.model)?;
        let session_id = input
            .session_id
            .unwrap_or_else(|| DEFAULT_SESSION.to_string());

        info!("Starting conversation session: {session_id}");

        if let Some(msg) = input.message {
            let state = graph.invoke(&session_id, msg).await?;
            if let Some(reply) = state.last() {
                println!("{}", reply.content());
            }
        } else {
            graph.run_interactive(&session_id).await?;
        }

        if let Some(checkpoint) = graph.store().checkpoint(&session_id).await? {
            info!(
                "Session {} ended at step {} with {} messages",
                checkpoint.session_id,
                checkpoint.step,
                checkpoint.state.len()
            );
        }

        Ok(())
    }
}
