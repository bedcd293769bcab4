//! OpenAI API Provider
//!
//! Chat Completions with `response_format = json_object`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming, TokenUsage};
use crate::config::LlmConfig;
use crate::types::{DrillError, LlmError, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// Missing key is reported per call, not at construction
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DrillError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone().map(SecretString::from),
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn api_key(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| {
            DrillError::Config(
                "OpenAI API key not configured. Set OPENAI_API_KEY or llm.api_key".to_string(),
            )
        })
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmResponse> {
        let api_key = self.api_key()?;

        info!(
            "Generating with OpenAI (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system_prompt, user_prompt);
        let url = format!("{}/chat/completions", self.api_base);

        debug!(
            system_chars = system_prompt.len(),
            user_chars = user_prompt.len(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| DrillError::LlmApi(format!("OpenAI request failed: {}", e)))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_http_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, body),
                "openai",
            )
            .into());
        }

        let response_body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DrillError::LlmApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let text = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DrillError::LlmApi("No content in OpenAI response".to_string()))?;

        Ok(LlmResponse::with_metrics(
            text,
            usage,
            ResponseTiming::from_duration(elapsed),
            ResponseMetadata {
                model: self.model.clone(),
                provider: "openai".to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let api_key = self.api_key()?;
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", api_key.expose_secret()),
            )
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("OpenAI API is available");
                Ok(true)
            }
            Ok(resp) => {
                warn!("OpenAI API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("OpenAI API check failed: {}", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}
