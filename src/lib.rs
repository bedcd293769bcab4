//! Drillsmith - Structured Golf Drill Generation
//!
//! Turns a coach's request (goal, handicap, time, practice environment) into
//! a schema-valid practice drill using a generative model, retrying once with
//! a targeted hint when the model's output does not fit the schema.
//!
//! ## Quick Start
//!
//! ```ignore
//! use drillsmith::{ConfigLoader, DrillRequest, ValidatingGenerator, DrillPromptBuilder};
//! use drillsmith::ai::create_provider;
//!
//! let config = ConfigLoader::load()?;
//! let generator = ValidatingGenerator::new(
//!     create_provider(&config.llm)?,
//!     DrillPromptBuilder::default(),
//!     std::time::Duration::from_secs(config.llm.timeout_secs),
//! );
//! let request = DrillRequest::from_json(&serde_json::json!({
//!     "goal": "putting confidence",
//!     "hcpInput": "18",
//! }))?;
//! let generation = generator.generate(&request).await?;
//! ```
//!
//! ## Modules
//!
//! - [`drill`]: handicap parsing, drill schema, prompts, retry hints, generator
//! - [`ai`]: generative model providers, prompt sections, output extraction
//! - [`server`]: HTTP boundary with bearer auth and CORS
//! - [`storage`]: SQLite persistence with connection pooling
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod drill;
pub mod server;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{DrillError, ErrorCategory, LlmError, Result, ResultExt};

pub use storage::{Database, DrillStore, SharedDatabase, SqliteDrillStore};

// =============================================================================
// Drill Re-exports
// =============================================================================

pub use drill::{
    Drill, DrillPromptBuilder, DrillRequest, DrillType, Generation, HandicapBand,
    ParsedHandicap, RetryHintBuilder, ValidatingGenerator, parse_handicap, validate_corpus,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmProvider, LlmResponse, SharedProvider, create_provider, with_timeout};
