//! Chat-completion providers.
//!
//! Defines the [`ChatProvider`] trait — the single "prompt in, text out"
//! capability every reasoning stage is built on — and two implementations:
//!
//! - **[`DisabledProvider`]** — returns errors; used when no model is
//!   configured, so store-only commands still work.
//! - **[`OpenAiChatProvider`]** — calls any OpenAI-compatible
//!   `/chat/completions` endpoint (OpenAI, DeepSeek, local gateways) with
//!   retry and exponential backoff.
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::ModelConfig;

/// A blocking, single-attempt (from the caller's view) text completion
/// capability. Retry/backoff against the transport happens inside the
/// provider; the pipeline itself never retries a stage.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Model identifier (e.g. `"deepseek-chat"`).
    fn model_name(&self) -> &str;

    /// Send one prompt, return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Instantiate the provider named in the configuration.
pub fn create_provider(config: &ModelConfig) -> Result<Arc<dyn ChatProvider>> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiChatProvider::new(config)?)),
        "disabled" => Ok(Arc::new(DisabledProvider)),
        other => bail!("Unknown model provider: {}", other),
    }
}

/// A no-op provider that always returns errors.
pub struct DisabledProvider;

#[async_trait]
impl ChatProvider for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        bail!("Model provider is disabled; set [model] provider in config")
    }
}

/// Chat provider for OpenAI-compatible APIs.
pub struct OpenAiChatProvider {
    model: String,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
    max_retries: u32,
}

impl OpenAiChatProvider {
    /// Create a provider from configuration.
    ///
    /// Fails when `model.model` is unset or the API key environment
    /// variable named by `model.api_key_env` is missing.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("model.model required for the openai provider"))?;

        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", config.api_key_env))?;

        Ok(Self {
            model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        let url = format!("{}/chat/completions", self.base_url);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_chat_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("Chat API error {}: {}", status, body_text));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Chat API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Chat completion failed after retries")))
    }
}

/// Extract `choices[0].message.content` from a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid chat response: missing choices[0].message.content"))
}
