//! Validating drill generator.
//!
//! At most [`MAX_ATTEMPTS`] model calls per request. A parseable but invalid
//! response earns one retry carrying a targeted hint; unparseable output,
//! timeouts and transport errors end the request immediately.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::handicap::{ParsedHandicap, parse_handicap};
use super::hint::RetryHintBuilder;
use super::prompts::DrillPromptBuilder;
use super::request::DrillRequest;
use super::schema::{self, Drill};
use crate::ai::{SharedProvider, TokenUsage, extract_json_from_response, with_timeout};
use crate::constants::generation::MAX_ATTEMPTS;
use crate::types::{DrillError, Result, preview};

/// Successful generation
#[derive(Debug, Clone)]
pub struct Generation {
    pub drill: Drill,
    /// Model calls made, 1 or 2
    pub attempts: u8,
    /// Summed over every attempt
    pub usage: TokenUsage,
    /// Wall-clock model time summed over every attempt
    pub latency_ms: u64,
    /// Model that produced the accepted drill
    pub model: String,
}

pub struct ValidatingGenerator {
    provider: SharedProvider,
    prompts: DrillPromptBuilder,
    system_prompt: String,
    timeout: Duration,
}

impl ValidatingGenerator {
    pub fn new(provider: SharedProvider, prompts: DrillPromptBuilder, timeout: Duration) -> Self {
        let system_prompt = prompts.build_system_prompt();
        Self {
            provider,
            prompts,
            system_prompt,
            timeout,
        }
    }

    /// Parse the request's handicap and generate a validated drill
    pub async fn generate(&self, request: &DrillRequest) -> Result<Generation> {
        let hcp = parse_handicap(request.hcp_input.as_deref())?;
        self.generate_with_hcp(request, hcp).await
    }

    /// Generate with an already-parsed handicap, which is written into the
    /// returned drill regardless of what the model produced
    pub async fn generate_with_hcp(
        &self,
        request: &DrillRequest,
        hcp: ParsedHandicap,
    ) -> Result<Generation> {
        let mut hint: Option<String> = None;
        let mut last_errors = Vec::new();
        let mut usage = TokenUsage::default();
        let mut latency_ms = 0u64;

        for attempt in 1..=MAX_ATTEMPTS {
            let user_prompt = self
                .prompts
                .build_user_prompt(request, &hcp, hint.as_deref());

            debug!(
                attempt,
                provider = self.provider.name(),
                system_chars = self.system_prompt.len(),
                user_chars = user_prompt.len(),
                "Requesting drill"
            );

            let response = with_timeout(
                self.timeout,
                self.provider.generate(&self.system_prompt, &user_prompt),
                "drill generation",
            )
            .await?;
            usage.accumulate(&response.usage);
            latency_ms = latency_ms.saturating_add(response.timing.total_ms);

            let candidate = extract_json_from_response(&response.text)?;

            match schema::validate(&candidate) {
                Ok(drill) => {
                    info!(
                        attempt,
                        drill_type = %drill.drill_type(),
                        band = %hcp.band,
                        tokens = usage.total(),
                        latency_ms,
                        provider = %response.metadata.provider,
                        model = %response.metadata.model,
                        "Drill generated"
                    );
                    return Ok(Generation {
                        drill: drill.with_hcp(hcp),
                        attempts: attempt,
                        usage,
                        latency_ms,
                        model: response.metadata.model,
                    });
                }
                Err(failure) => {
                    warn!(
                        attempt,
                        errors = failure.errors.len(),
                        "Generated drill failed validation: {}",
                        failure
                    );
                    debug!(raw = %preview(&response.text, 300), "Rejected model output");
                    hint = Some(RetryHintBuilder::build(&candidate, &failure.errors));
                    last_errors = failure.errors;
                }
            }
        }

        Err(DrillError::SchemaValidation {
            attempts: MAX_ATTEMPTS,
            errors: last_errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming};
    use crate::drill::handicap::HandicapBand;
    use crate::drill::prompts::FixedSeed;
    use crate::drill::schema::DrillType;
    use crate::drill::testing::{ScriptedProvider, score_entry_drill, score_entry_missing_prompt};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    fn generator(provider: Arc<ScriptedProvider>) -> ValidatingGenerator {
        ValidatingGenerator::new(
            provider,
            DrillPromptBuilder::new(Arc::new(FixedSeed("TESTSEED".to_string()))),
            Duration::from_secs(5),
        )
    }

    fn putting_request() -> DrillRequest {
        DrillRequest::from_json(&json!({
            "goal": "putting confidence",
            "hcpInput": "18",
            "shotArea": "putting"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![score_entry_drill()]));
        let generation = generator(provider.clone())
            .generate(&putting_request())
            .await
            .unwrap();

        assert_eq!(generation.attempts, 1);
        assert_eq!(provider.calls(), 1);
        assert_eq!(generation.drill.drill_type(), DrillType::ScoreEntry);
    }

    #[tokio::test]
    async fn test_retry_after_missing_field() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![
            score_entry_missing_prompt(),
            score_entry_drill(),
        ]));
        let generation = generator(provider.clone())
            .generate(&putting_request())
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(generation.attempts, 2);
        assert_eq!(generation.usage.total(), 2 * (12 + 8));
        assert_eq!(generation.latency_ms, 2 * 7);
        assert_eq!(generation.model, "mock-model");
        assert_eq!(
            generation.drill.base.hcp,
            ParsedHandicap {
                input: Some("18".to_string()),
                value: Some(18.0),
                band: HandicapBand::Mid13To20,
            }
        );

        let prompts = provider.user_prompts();
        assert!(!prompts[0].contains("HIGHEST_PRIORITY"));
        assert!(prompts[1].contains("HIGHEST_PRIORITY"));
        assert!(prompts[1].contains("Missing or empty required fields: prompt."));
    }

    #[tokio::test]
    async fn test_two_failures_are_terminal() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![
            score_entry_missing_prompt(),
            score_entry_missing_prompt(),
            score_entry_drill(),
        ]));
        let err = generator(provider.clone())
            .generate(&putting_request())
            .await
            .unwrap_err();

        assert_eq!(provider.calls(), 2);
        match err {
            DrillError::SchemaValidation { attempts, errors } => {
                assert_eq!(attempts, 2);
                assert_eq!(errors, vec!["prompt: required".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_type_gets_generic_hint() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![
            json!({"drill_type": "freestyle", "title": "?"}),
            score_entry_drill(),
        ]));
        generator(provider.clone())
            .generate(&putting_request())
            .await
            .unwrap();

        let retry_prompt = &provider.user_prompts()[1];
        assert!(retry_prompt.contains("did not have a valid `drill_type`"));
        assert!(retry_prompt.contains("conditional_entry"));
    }

    #[tokio::test]
    async fn test_model_hcp_is_overwritten() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![score_entry_drill()]));
        let request = DrillRequest::from_json(&json!({"hcpInput": "31"})).unwrap();
        let generation = generator(provider).generate(&request).await.unwrap();

        assert_eq!(generation.drill.base.hcp.band, HandicapBand::Beginner31Plus);
        assert_eq!(generation.drill.base.hcp.value, Some(31.0));
        let value = serde_json::to_value(&generation.drill).unwrap();
        assert_eq!(value["hcp"]["band"], "31_plus");
    }

    #[tokio::test]
    async fn test_unparseable_output_is_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            "I'm sorry, I can't help with that.".to_string(),
            score_entry_drill().to_string(),
        ]));
        let err = generator(provider.clone())
            .generate(&putting_request())
            .await
            .unwrap_err();

        assert!(matches!(err, DrillError::UpstreamParse { .. }));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_output_is_accepted() {
        let fenced = format!("```json\n{}\n```", score_entry_drill());
        let provider = Arc::new(ScriptedProvider::new(vec![fenced]));
        let generation = generator(provider).generate(&putting_request()).await.unwrap();
        assert_eq!(generation.attempts, 1);
    }

    #[tokio::test]
    async fn test_invalid_handicap_skips_model() {
        let provider = Arc::new(ScriptedProvider::from_values(vec![score_entry_drill()]));
        let request = DrillRequest::from_json(&json!({"hcpInput": "-3"})).unwrap();
        let err = generator(provider.clone()).generate(&request).await.unwrap_err();

        assert!(matches!(err, DrillError::Input(_)));
        assert_eq!(provider.calls(), 0);
    }

    struct SlowProvider;

    #[async_trait]
    impl LlmProvider for SlowProvider {
        async fn generate(&self, _system: &str, _user: &str) -> Result<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(LlmResponse::with_metrics(
                "{}".to_string(),
                TokenUsage::default(),
                ResponseTiming::default(),
                ResponseMetadata::default(),
            ))
        }

        fn name(&self) -> &str {
            "slow"
        }

        fn model(&self) -> &str {
            "slow-model"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_timeout_is_surfaced_without_retry() {
        let generator = ValidatingGenerator::new(
            Arc::new(SlowProvider),
            DrillPromptBuilder::default(),
            Duration::from_millis(20),
        );
        let err = generator.generate(&putting_request()).await.unwrap_err();
        assert!(matches!(err, DrillError::Timeout { .. }));
    }
}
