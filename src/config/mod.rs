//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/drillsmith/config.toml)
//! 3. Project config (./drillsmith.toml)
//! 4. Environment variables (DRILLSMITH_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
