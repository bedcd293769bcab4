//! Unified Error Type System
//!
//! Centralized error types for the drill service.
//!
//! ## Error Kinds
//!
//! - **Auth**: missing/invalid/expired bearer credential (401, never retried)
//! - **Input**: malformed caller input such as a bad handicap (400)
//! - **Config**: server-side configuration missing (500, operator-actionable)
//! - **UpstreamParse**: model output is not parseable at all (500, no retry)
//! - **SchemaValidation**: parseable but non-conformant output after the retry (500)
//! - **Persistence**: storage failed; surfaced as `saved: false`, never fatal
//!
//! Only a schema validation failure is retried, and only once. Everything
//! else is surfaced immediately.

use std::time::Duration;
use thiserror::Error;

/// Characters of raw model output kept on a parse failure
const PREVIEW_CHARS: usize = 200;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse classification of provider failures, used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the provider
    RateLimit,
    /// Provider rejected our credentials
    Auth,
    /// Network/connectivity issues
    Network,
    /// Provider unavailable or model not found
    Unavailable,
    /// Provider rejected the request shape
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Provider error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Classify a provider HTTP status code
    pub fn from_http_status(status: u16, message: &str, provider: &str) -> Self {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        Self::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DrillError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Boundary Errors
    // -------------------------------------------------------------------------
    #[error("Unauthorized: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Server misconfigured: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Generation Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Model output could not be parsed as JSON at all
    #[error("Malformed model response: {message}")]
    UpstreamParse { message: String, preview: String },

    /// Model output parsed but did not match any drill shape
    #[error("Schema validation failed after {attempts} attempts: {}", .errors.join("; "))]
    SchemaValidation { attempts: u8, errors: Vec<String> },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<LlmError> for DrillError {
    fn from(err: LlmError) -> Self {
        DrillError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, DrillError>;

impl DrillError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn upstream_parse(message: impl Into<String>, raw: &str) -> Self {
        Self::UpstreamParse {
            message: message.into(),
            preview: raw.chars().take(PREVIEW_CHARS).collect(),
        }
    }

    /// HTTP status code for this error at the request boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Auth(_) => 401,
            Self::Input(_) => 400,
            Self::MethodNotAllowed => 405,
            _ => 500,
        }
    }

    /// Whether this error is the only kind the generator retries
    pub fn is_schema_failure(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }
}

/// Context extension trait for mapping foreign errors into storage failures
pub trait ResultExt<T> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DrillError::Persistence(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::Transient.to_string(), "TRANSIENT");
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = LlmError::from_http_status(429, "Rate limited", "test");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = LlmError::from_http_status(401, "Unauthorized", "test");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = LlmError::from_http_status(503, "Server error", "test");
        assert_eq!(server_error.category, ErrorCategory::Transient);

        let odd = LlmError::from_http_status(418, "teapot", "test");
        assert_eq!(odd.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(DrillError::Auth("expired".into()).status_code(), 401);
        assert_eq!(DrillError::Input("bad hcp".into()).status_code(), 400);
        assert_eq!(DrillError::MethodNotAllowed.status_code(), 405);
        assert_eq!(DrillError::Config("no key".into()).status_code(), 500);
        assert_eq!(DrillError::upstream_parse("nope", "xyz").status_code(), 500);
        assert_eq!(
            DrillError::SchemaValidation {
                attempts: 2,
                errors: vec!["prompt: missing".into()]
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_schema_validation_display_joins_errors() {
        let err = DrillError::SchemaValidation {
            attempts: 2,
            errors: vec!["a: missing".into(), "b: too short".into()],
        };
        assert_eq!(
            err.to_string(),
            "Schema validation failed after 2 attempts: a: missing; b: too short"
        );
        assert!(err.is_schema_failure());
    }

    #[test]
    fn test_upstream_parse_preview_is_bounded() {
        let raw = "x".repeat(1000);
        match DrillError::upstream_parse("bad", &raw) {
            DrillError::UpstreamParse { preview, .. } => assert_eq!(preview.len(), 200),
            other => panic!("unexpected: {other}"),
        }
    }
}
