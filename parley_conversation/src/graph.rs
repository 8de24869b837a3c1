//! Single-step execution: load, append the user message, call the model,
//! append its reply, store.
//!
//! The topology is START -> chat step -> END, so it is expressed as a plain
//! method rather than a general graph engine.

use parley_core::{
    ChatMessage, CheckpointStore, ConversationState, LLMProvider, Role, StateDelta,
};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ConversationError;
use crate::node::chat_step;

#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Model name passed to the provider on every turn
    pub model: String,
    /// Seeded as the first message of a new session
    pub system_prompt: Option<String>,
}

impl GraphConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
        }
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }
}

pub struct ChatGraph<P = Arc<dyn LLMProvider>, S = Arc<dyn CheckpointStore>>
where
    P: Send + Sync,
    S: Send + Sync,
{
    provider: P,
    store: S,
    config: GraphConfig,
}

impl<P, S> ChatGraph<P, S>
where
    P: LLMProvider + Send + Sync,
    S: CheckpointStore + Send + Sync,
{
    pub const fn new(provider: P, store: S, config: GraphConfig) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run one turn for `session_id` and return the accumulated history.
    ///
    /// The store is written only after the model replied, so a failed turn
    /// leaves the previous snapshot untouched.
    pub async fn invoke(
        &self,
        session_id: &str,
        user_message: impl Into<String>,
    ) -> Result<ConversationState, ConversationError> {
        let mut state = self
            .store
            .get(session_id)
            .await
            .map_err(ConversationError::Storage)?;

        info!(
            "Processing turn {} for session: {session_id}",
            state.turn_count() + 1
        );

        if state.is_empty() {
            if let Some(prompt) = &self.config.system_prompt {
                state.push(ChatMessage::system(prompt.clone()));
            }
        }
        state.merge(StateDelta::single(ChatMessage::user(user_message)));

        let delta = chat_step(&self.provider, &self.config.model, &state).await?;
        state.merge(delta);

        self.store
            .put(session_id, state.clone())
            .await
            .map_err(ConversationError::Storage)?;

        debug!("Session {session_id} now holds {} messages", state.len());
        Ok(state)
    }

    pub async fn history(&self, session_id: &str) -> Result<ConversationState, ConversationError> {
        self.store
            .get(session_id)
            .await
            .map_err(ConversationError::Storage)
    }

    pub async fn clear(&self, session_id: &str) -> Result<bool, ConversationError> {
        let removed = self
            .store
            .delete(session_id)
            .await
            .map_err(ConversationError::Storage)?;
        info!("Cleared session: {session_id}");
        Ok(removed)
    }

    /// Read lines from stdin and run each as a turn on `session_id`.
    pub async fn run_interactive(&self, session_id: &str) -> Result<(), ConversationError> {
        println!("=== Conversation Session: {session_id} ===");
        println!("Type 'exit' or 'quit' to end, '/history' to show, '/clear' to reset.\n");

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            if std::io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            match input {
                "" => continue,
                "exit" | "quit" | "q" => break,
                "/history" => {
                    let state = self.history(session_id).await?;
                    print_history(&state);
                    continue;
                }
                "/clear" => {
                    self.clear(session_id).await?;
                    println!("Session cleared.\n");
                    continue;
                }
                _ => {}
            }

            match self.invoke(session_id, input).await {
                Ok(state) => {
                    if let Some(reply) = state.last() {
                        println!("\n{}\n", reply.content());
                    }
                }
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        let state = self.history(session_id).await?;
        println!("\nSession ended. Total turns: {}", state.turn_count());
        Ok(())
    }
}

fn print_history(state: &ConversationState) {
    if state.is_empty() {
        println!("(empty)\n");
        return;
    }
    for msg in state.messages() {
        let label = match msg.role() {
            Role::System => "system",
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("[{label}] {}", msg.content());
    }
    println!();
}
