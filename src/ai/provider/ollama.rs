//! Ollama Local LLM Provider
//!
//! Uses the `/api/chat` endpoint with `format = "json"` so the system and
//! user prompts stay separate messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming, TokenUsage};
use crate::config::LlmConfig;
use crate::types::{DrillError, LlmError, Result};

const DEFAULT_API_BASE: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3:latest";

/// Ollama Local LLM Provider
#[derive(Debug)]
pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_base = Self::validate_endpoint(&api_base)?;

        let model = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DrillError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model,
            temperature: config.temperature,
            client,
        })
    }

    /// Only http/https endpoints; warns for non-local hosts.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            DrillError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DrillError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> OllamaChatRequest {
        OllamaChatRequest {
            model: self.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            stream: false,
            options: Some(OllamaOptions {
                temperature: self.temperature,
            }),
            format: Some("json".to_string()),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmResponse> {
        info!(
            "Generating with Ollama (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system_prompt, user_prompt);
        let url = format!("{}/api/chat", self.api_base);

        debug!("Sending request to Ollama API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    DrillError::LlmApi(format!(
                        "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                        self.api_base
                    ))
                } else {
                    DrillError::LlmApi(format!("Ollama request failed: {}", e))
                }
            })?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_http_status(
                status.as_u16(),
                &format!("Ollama API error ({}): {}", status, body),
                "ollama",
            )
            .into());
        }

        let response_body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| DrillError::LlmApi(format!("Failed to parse Ollama response: {}", e)))?;

        let usage = TokenUsage::new(
            response_body.prompt_eval_count.unwrap_or(0),
            response_body.eval_count.unwrap_or(0),
        );

        Ok(LlmResponse::with_metrics(
            response_body.message.content,
            usage,
            ResponseTiming::from_duration(elapsed),
            ResponseMetadata {
                model: self.model.clone(),
                provider: "ollama".to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.api_base);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                if let Ok(tags) = resp.json::<OllamaTagsResponse>().await {
                    let model_available = tags.models.iter().any(|m| {
                        m.name == self.model
                            || m.name.starts_with(&self.model.replace(":latest", ""))
                    });

                    if model_available {
                        info!("Ollama is available with model: {}", self.model);
                        Ok(true)
                    } else {
                        warn!(
                            "Ollama is running but model '{}' not found. Pull with: ollama pull {}",
                            self.model, self.model
                        );
                        Ok(false)
                    }
                } else {
                    info!("Ollama is available");
                    Ok(true)
                }
            }
            Ok(resp) => {
                warn!("Ollama API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama not available: {}. Start with: ollama serve", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}
