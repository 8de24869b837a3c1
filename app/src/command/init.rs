use parley_config::Config;

/// Strategy for initializing the configuration.
///
/// This strategy creates the default configuration file at `~/parley/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::create_config()?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Put GEMINI_API_KEY in a .env file for local development,");
        println!("      or in .parley/secrets.toml for deployment");
        println!("   2. Run 'parley chat' to start a conversation");
        println!();
        Ok(())
    }
}
