//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use parley_config::{Config, CredentialResolver, load_dotenv};
use parley_conversation::{ChatGraph, GraphConfig, InMemoryCheckpointer};
use parley_providers::GeminiProvider;
use std::sync::Arc;
use tracing::info;

mod chat;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

pub type CliGraph = ChatGraph<GeminiProvider, Arc<InMemoryCheckpointer>>;

/// Load configuration, resolve the API key and wire the chat graph.
///
/// Credentials are resolved before the provider exists, so a missing key
/// stops the process before any model call.
pub fn build_graph(model_override: Option<String>) -> anyhow::Result<CliGraph> {
    load_dotenv();
    let config = Config::load()?;
    let resolver = CredentialResolver::from_config(&config.credentials);
    wire_graph(config, &resolver, model_override)
}

fn wire_graph(
    config: Config,
    resolver: &CredentialResolver,
    model_override: Option<String>,
) -> anyhow::Result<CliGraph> {
    let credential = resolver.resolve()?;

    let model = model_override.unwrap_or_else(|| config.model.name.clone());
    let mut provider = GeminiProvider::new(credential)
        .with_default_model(model.clone())
        .with_temperature(config.model.temperature)
        .with_max_output_tokens(config.model.max_output_tokens);
    if let Some(base_url) = config.model.base_url.clone() {
        provider = provider.with_base_url(base_url);
    }

    info!("Using model: {model}");

    let graph_config = GraphConfig::new(model).with_system_prompt(config.model.system_prompt);
    Ok(ChatGraph::new(
        provider,
        Arc::new(InMemoryCheckpointer::new()),
        graph_config,
    ))
}
