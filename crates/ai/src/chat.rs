//! Crypto assistant chat service.
//!
//! Wraps an OpenAI-compatible completion model behind the
//! [`CryptoAssistant`] trait. The assistant never surfaces provider
//! failures to callers: a missing key or a failed completion yields a
//! friendly canned reply instead.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client as HttpClient;
use rig::{client::CompletionClient, completion::Prompt, providers::openai};

use crate::error::AiError;

/// System prompt that scopes the assistant to crypto topics.
pub const CRYPTO_ASSISTANT_PROMPT: &str = include_str!("system_prompt.txt");

/// Reply used when no API key is configured.
pub const FALLBACK_NO_KEY: &str = "I'm sorry, but the OpenAI API key is not configured. \
Please add your API key to the .env file to enable AI-powered responses.";

/// Reply used when the completion call fails.
pub const FALLBACK_ERROR: &str = "I'm sorry, I'm having trouble generating a response \
right now. Please try again in a moment.";

const PROVIDER_ID: &str = "openai";

/// Completion settings for the assistant.
pub struct ChatConfig {
    pub model: String,
    pub max_tokens: u64,
    pub temperature: f64,
    /// Per-call bound on the completion round trip. A hung upstream
    /// resolves to the error reply instead of stalling the request.
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Trait for answering user chat messages.
///
/// Implementations must be infallible: degrade to a canned reply
/// rather than returning an error.
#[async_trait]
pub trait CryptoAssistant: Send + Sync {
    async fn answer(&self, message: &str) -> String;
}

/// Assistant backed by an OpenAI-compatible completion API.
pub struct ChatService {
    api_key: Option<String>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(api_key: Option<String>, config: ChatConfig) -> Self {
        // Treat a blank key the same as an absent one.
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { api_key, config }
    }

    async fn generate(&self, message: &str) -> Result<String, AiError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::MissingApiKey(PROVIDER_ID.to_string()))?;

        debug!(
            "Generating chat completion with model {} ({} chars in)",
            self.config.model,
            message.len()
        );

        let client: openai::Client<HttpClient> =
            openai::Client::new(key).map_err(|e| AiError::Provider(e.to_string()))?;

        let agent = client
            .agent(&self.config.model)
            .preamble(CRYPTO_ASSISTANT_PROMPT.trim())
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        tokio::time::timeout(self.config.timeout, agent.prompt(message))
            .await
            .map_err(|_| AiError::Timeout)?
            .map_err(|e| AiError::Provider(e.to_string()))
    }
}

/// The canned reply substituted for one failure class.
fn fallback_reply(error: &AiError) -> &'static str {
    match error {
        AiError::MissingApiKey(_) => FALLBACK_NO_KEY,
        AiError::Provider(_) | AiError::Timeout => FALLBACK_ERROR,
    }
}

#[async_trait]
impl CryptoAssistant for ChatService {
    async fn answer(&self, message: &str) -> String {
        match self.generate(message.trim()).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Chat completion failed: {}", e);
                fallback_reply(&e).to_string()
            }
        }
    }
}

/// Assistant returning a fixed reply, for tests.
pub struct FakeAssistant {
    pub reply: String,
}

impl FakeAssistant {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl CryptoAssistant for FakeAssistant {
    async fn answer(&self, _message: &str) -> String {
        self.reply.clone()
    }
}
