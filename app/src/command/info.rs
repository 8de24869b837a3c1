use parley_config::{Config, CredentialResolver, load_dotenv};
use parley_providers::gemini::DEFAULT_BASE_URL;

/// Strategy for displaying the effective configuration.
///
/// The API key is shown masked, together with the source it resolved from.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        load_dotenv();
        let config = Config::load()?;

        println!("=== parley Configuration ===\n");

        match Config::config_path() {
            Ok(path) => println!("Config file: {}", path.display()),
            Err(e) => println!("Config file: (defaults, {e})"),
        }
        println!();

        println!("Credentials:");
        println!("  Key: {}", config.credentials.key_name);
        println!(
            "  Secrets file: {}",
            config.credentials.secrets_file.display()
        );
        match CredentialResolver::from_config(&config.credentials).resolve() {
            Ok(credential) => {
                println!("  Value: {credential} (from {})", credential.source());
            }
            Err(e) => {
                println!("  Value: (not set)");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Model:");
        println!("  Name: {}", config.model.name);
        println!(
            "  Endpoint: {}",
            config.model.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
        );
        if let Some(temperature) = config.model.temperature {
            println!("  Temperature: {temperature}");
        }
        if let Some(max) = config.model.max_output_tokens {
            println!("  Max Output Tokens: {max}");
        }
        if let Some(ref prompt) = config.model.system_prompt {
            println!("  System Prompt: {}", truncate(prompt, 60));
        }
        println!();

        println!("Checkpoints: in-memory (not kept across restarts)");

        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 60), "short");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }
}
