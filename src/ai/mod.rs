//! AI Integration Layer
//!
//! Generative client abstraction, prompt assembly and model-output extraction.

pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{
    LlmProvider, LlmResponse, OllamaProvider, OpenAiProvider, ResponseMetadata, ResponseTiming,
    SharedProvider, TokenUsage, create_provider,
};
pub use timeout::with_timeout;
pub use validation::{JsonExtractor, extract_json_from_response};
