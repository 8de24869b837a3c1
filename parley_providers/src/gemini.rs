use async_trait::async_trait;
use parley_config::Credential;
use parley_core::{ChatMessage, LLMProvider, LLMResponse, Role, Usage};
use reqwest::Client;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub struct GeminiProvider {
    client: Client,
    credential: Credential,
    base_url: String,
    default_model: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
    pub fn new(credential: Credential) -> Self {
        info!("Creating GeminiProvider (key from {})", credential.source());
        Self {
            client: Client::new(),
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub const fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    fn build_request(&self, messages: &[ChatMessage]) -> Value {
        let mut request = Map::new();

        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role() == Role::System)
            .map(ChatMessage::content)
            .collect();
        if !system.is_empty() {
            request.insert(
                "systemInstruction".to_string(),
                json!({ "parts": [{ "text": system.join("\n\n") }] }),
            );
        }

        let contents: Vec<Value> = messages
            .iter()
            .filter_map(|m| {
                let role = match m.role() {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(json!({ "role": role, "parts": [{ "text": m.content() }] }))
            })
            .collect();
        request.insert("contents".to_string(), Value::Array(contents));

        let mut generation = Map::new();
        if let Some(temperature) = self.temperature {
            generation.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max) = self.max_output_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(max));
        }
        if !generation.is_empty() {
            request.insert("generationConfig".to_string(), Value::Object(generation));
        }

        Value::Object(request)
    }
}

fn token_count(usage: &Value, field: &str) -> u32 {
    u32::try_from(usage[field].as_u64().unwrap_or(0)).unwrap_or(0)
}

fn parse_response(response: &Value) -> anyhow::Result<LLMResponse> {
    let parts = response["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content parts"))?;

    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        anyhow::bail!("Invalid response format: missing text");
    }
    let content = texts.concat();

    let usage = response
        .get("usageMetadata")
        .filter(|u| u.is_object())
        .map(|u| Usage {
            prompt_tokens: token_count(u, "promptTokenCount"),
            completion_tokens: token_count(u, "candidatesTokenCount"),
            total_tokens: token_count(u, "totalTokenCount"),
        });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = self.build_request(messages);

        info!(
            "Sending request to Gemini API: model={model}, messages={}",
            messages.len()
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.credential.expose())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let parsed = parse_response(&response)?;
        debug!("Gemini usage: {:?}", parsed.usage);
        info!("Received response from Gemini API");
        Ok(parsed)
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}
