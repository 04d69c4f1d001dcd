//! Async LLM client for the fallback classifier
//!
//! A model-agnostic HTTP client for chat-completion APIs. Supports Anthropic
//! and OpenAI-compatible endpoints (Ollama, DeepSeek, OpenAI). The model only
//! ever rewrites an utterance into a command line; it never performs actions.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::config::FallbackConfig;
use crate::core::error::{InterpreterError, Result};

/// Short answers only: one command line
const MAX_TOKENS: u32 = 256;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Async LLM client for making API calls
#[derive(Debug)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    api_format: ApiFormat,
    timeout: Duration,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: Option<String>, api_url: String, model: String, timeout: Duration) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
            timeout,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            // Ollama, DeepSeek, OpenAI and friends speak the OpenAI format
            ApiFormat::OpenAI
        }
    }

    /// Create a client from configuration, honoring environment overrides
    ///
    /// `LLM_API_URL` and `LLM_MODEL` replace the configured endpoint and model.
    /// The key is read from the variable named by `api_key_env` and may be
    /// absent for local endpoints. Anthropic endpoints require it.
    pub fn from_config(config: &FallbackConfig) -> Result<Self> {
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| config.api_url.clone());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| config.model.clone());
        let api_key = std::env::var(&config.api_key_env).ok();

        if Self::detect_api_format(&api_url) == ApiFormat::Anthropic && api_key.is_none() {
            return Err(InterpreterError::Llm(format!(
                "{} not set",
                config.api_key_env
            )));
        }

        Ok(Self::new(
            api_key,
            api_url,
            model,
            Duration::from_secs(config.timeout_secs),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a completion request to the LLM
    ///
    /// # Arguments
    /// * `system` - System prompt with the command vocabulary
    /// * `user` - The raw utterance
    ///
    /// # Returns
    /// The model's text response
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let mut builder = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| InterpreterError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InterpreterError::Llm(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::Llm(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| InterpreterError::Llm("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let mut builder = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("content-type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| InterpreterError::Llm(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InterpreterError::Llm(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::Llm(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| InterpreterError::Llm("Empty response".into()))
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format (Ollama, DeepSeek, OpenAI, etc.)
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
