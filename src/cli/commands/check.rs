//! Check Command
//!
//! Asks the configured model provider whether it is reachable before a
//! deployment starts serving.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::ai::{LlmProvider, create_provider, with_timeout};
use crate::config::ConfigLoader;
use crate::constants::network::HEALTH_CHECK_TIMEOUT_SECS;
use crate::types::{DrillError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub model: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run the provider's health check. Errors count as unreachable.
pub async fn check_provider(provider: &dyn LlmProvider, timeout: Duration) -> ProviderStatus {
    let outcome = with_timeout(timeout, provider.health_check(), "provider health check").await;

    let (reachable, error) = match outcome {
        Ok(reachable) => (reachable, None),
        Err(e) => {
            warn!("Health check for {} failed: {}", provider.name(), e);
            (false, Some(e.to_string()))
        }
    };

    ProviderStatus {
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
        reachable,
        error,
    }
}

pub async fn run(provider: Option<String>, model: Option<String>) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(provider) = provider {
        config.llm.provider = provider;
    }
    if let Some(model) = model {
        config.llm.model = Some(model);
    }

    let provider = create_provider(&config.llm)?;
    let status = check_provider(
        provider.as_ref(),
        Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS),
    )
    .await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    if status.reachable {
        Ok(())
    } else {
        Err(DrillError::LlmApi(format!(
            "{} ({}) is not reachable",
            status.provider, status.model
        )))
    }
}
