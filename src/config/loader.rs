//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/drillsmith/config.toml)
//! 3. Project config (./drillsmith.toml)
//! 4. Environment variables (DRILLSMITH_* prefix, `__` separates sections)
//!
//! Well-known provider variables (`OPENAI_API_KEY`, `SUPABASE_URL`,
//! `SUPABASE_ANON_KEY`) fill secrets the sources above left empty.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{DrillError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars → well-known fallbacks
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DRILLSMITH_LLM__MODEL -> llm.model
        figment = figment.merge(Env::prefixed("DRILLSMITH_").split("__").lowercase(true));

        let mut config: Config = figment
            .extract()
            .map_err(|e| DrillError::Config(format!("Configuration error: {}", e)))?;

        Self::apply_fallbacks(&mut config, |key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DrillError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Fill unset secrets from well-known environment variables
    pub fn apply_fallbacks<F>(config: &mut Config, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if config.llm.api_key.is_none() && config.llm.provider == "openai" {
            config.llm.api_key = lookup("OPENAI_API_KEY");
        }
        if config.auth.url.is_none() {
            config.auth.url = lookup("SUPABASE_URL");
        }
        if config.auth.anon_key.is_none() {
            config.auth.anon_key = lookup("SUPABASE_ANON_KEY");
        }
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/drillsmith/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("drillsmith"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from("drillsmith.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration (secrets are never serialized)
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| DrillError::Config(e.to_string()))?
            );
        }

        Ok(())
    }
}
