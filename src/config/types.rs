//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{network, storage};
use crate::types::{DrillError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// HTTP listener settings
    pub server: ServerConfig,

    /// Generative model settings
    pub llm: LlmConfig,

    /// Bearer token verification settings
    pub auth: AuthConfig,

    /// Drill persistence settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// Missing secrets are not checked here; they surface per request.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DrillError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DrillError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(DrillError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(DrillError::Config(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS allowed origin; `*` allows any
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: network::DEFAULT_PORT,
            allowed_origin: "*".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "openai" or "ollama"
    pub provider: String,

    /// Model name (provider default when unset)
    pub model: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// API key; never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature. Drills favour some variety.
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: None,
            api_base: None,
            api_key: None,
            timeout_secs: network::DEFAULT_LLM_TIMEOUT_SECS,
            temperature: 0.8,
            max_tokens: 2048,
        }
    }
}

// =============================================================================
// Auth Configuration
// =============================================================================

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the auth service (falls back to SUPABASE_URL)
    pub url: Option<String>,

    /// Public API key sent alongside the bearer token (falls back to SUPABASE_ANON_KEY)
    #[serde(skip_serializing)]
    pub anon_key: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file; ":memory:" for an ephemeral store
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: storage::DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(DrillError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secrets_redacted_and_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        config.auth.anon_key = Some("anon-secret".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("anon-secret"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(!json.contains("anon-secret"));
    }

    #[test]
    fn test_server_address() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            allowed_origin: "*".to_string(),
        };
        assert_eq!(server.address(), "127.0.0.1:9000");
    }
}
