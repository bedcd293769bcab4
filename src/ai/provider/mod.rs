//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait: the opaque generative client that turns a
//! (system prompt, user prompt) pair into raw model text. Parsing and schema
//! validation happen upstream of the provider, never inside it.

mod ollama;
mod openai;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::{DrillError, Result};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Raw model output plus usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, unparsed
    pub text: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    pub fn with_metrics(
        text: String,
        usage: TokenUsage,
        timing: ResponseTiming,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            text,
            usage,
            timing,
            metadata,
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    /// Fold another call's usage into this one
    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }

    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    pub model: String,
    pub provider: String,
}

/// Shared provider handle, cloned into request state.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Generative text client
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a system and user prompt, returning the model's raw text.
    ///
    /// Providers ask for JSON output but do not parse it.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config)?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config)?)),
        other => Err(DrillError::Config(format!(
            "Unknown provider: {}. Supported: openai, ollama",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_known() {
        let config = LlmConfig::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");

        let ollama = LlmConfig {
            provider: "ollama".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(create_provider(&ollama).unwrap().name(), "ollama");
    }

    #[test]
    fn test_create_provider_unknown() {
        let config = LlmConfig {
            provider: "carrier-pigeon".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(DrillError::Config(_))
        ));
    }

    #[test]
    fn test_token_usage_total() {
        assert_eq!(TokenUsage::new(100, 50).total(), 150);
    }

    #[test]
    fn test_token_usage_saturates() {
        assert_eq!(TokenUsage::new(u32::MAX, 10).total(), u32::MAX);

        let mut usage = TokenUsage::new(u32::MAX - 1, 3);
        usage.accumulate(&TokenUsage::new(5, 7));
        assert_eq!(usage.input_tokens, u32::MAX);
        assert_eq!(usage.output_tokens, 10);
    }
}
