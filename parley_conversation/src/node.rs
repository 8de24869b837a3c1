use parley_core::{ConversationState, LLMProvider, StateDelta};
use tracing::debug;

use crate::error::ConversationError;

/// Run the model once over the full history and return its reply as a delta.
///
/// The state is only read; merging the delta is the caller's job.
pub async fn chat_step<P>(
    provider: &P,
    model: &str,
    state: &ConversationState,
) -> Result<StateDelta, ConversationError>
where
    P: LLMProvider + ?Sized,
{
    debug!("Invoking model {model} with {} messages", state.len());

    let response = provider.chat(state.messages(), model).await?;

    if let Some(usage) = response.usage {
        debug!(
            "Tokens: {} prompt + {} completion = {} total",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(StateDelta::single(response.into_message()))
}
