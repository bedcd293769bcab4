use std::sync::Arc;
use std::time::Duration;

use super::auth::{SharedVerifier, SupabaseAuthVerifier};
use crate::ai::create_provider;
use crate::config::Config;
use crate::drill::{DrillPromptBuilder, ValidatingGenerator};
use crate::storage::SharedStore;
use crate::types::Result;

/// Everything a request needs, shared across handlers
pub struct AppState {
    pub generator: ValidatingGenerator,
    pub store: SharedStore,
    pub auth: SharedVerifier,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(generator: ValidatingGenerator, store: SharedStore, auth: SharedVerifier) -> Self {
        Self {
            generator,
            store,
            auth,
        }
    }

    /// Wire the configured provider and auth service around `store`
    pub fn from_config(config: &Config, store: SharedStore) -> Result<Self> {
        let provider = create_provider(&config.llm)?;
        let generator = ValidatingGenerator::new(
            provider,
            DrillPromptBuilder::default(),
            Duration::from_secs(config.llm.timeout_secs),
        );
        let auth = Arc::new(SupabaseAuthVerifier::new(&config.auth)?);
        Ok(Self::new(generator, store, auth))
    }
}
