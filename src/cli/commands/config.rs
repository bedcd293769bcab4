//! Config Command
//!
//! Usage:
//!   drillsmith config show [-f json]
//!   drillsmith config path

use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration (secrets omitted)
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}
