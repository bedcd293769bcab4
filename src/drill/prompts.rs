//! Drill prompt construction.
//!
//! The system prompt is static for the life of the process: rules, the
//! six-type taxonomy, handicap tuning and the few-shot corpus. The user prompt
//! carries everything request-specific, a variation seed, and finally any
//! retry hint.

use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;

use super::corpus;
use super::handicap::{HandicapBand, ParsedHandicap};
use super::request::DrillRequest;
use super::schema::{BASE_FIELDS, DrillType};
use crate::ai::PromptBuilder;
use crate::constants::drill::{GOAL_MAX_CHARS, MAX_TIME_MINUTES, MIN_TIME_MINUTES, TITLE_MAX_CHARS};
use crate::constants::generation::VARIATION_SEED_LEN;

// =============================================================================
// Variation seed
// =============================================================================

/// Source of the short token that keeps repeated identical requests from
/// producing identical drills
pub trait VariationSeed: Send + Sync {
    fn next_seed(&self) -> String;
}

/// Random alphanumeric seed
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSeed;

impl VariationSeed for RandomSeed {
    fn next_seed(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(VARIATION_SEED_LEN)
            .map(char::from)
            .collect()
    }
}

/// Always the same seed; for reproducible prompts
#[derive(Debug, Clone)]
pub struct FixedSeed(pub String);

impl VariationSeed for FixedSeed {
    fn next_seed(&self) -> String {
        self.0.clone()
    }
}

// =============================================================================
// Prompt builder
// =============================================================================

/// Builds system and user prompts for drill generation
#[derive(Clone)]
pub struct DrillPromptBuilder {
    seed: Arc<dyn VariationSeed>,
}

impl std::fmt::Debug for DrillPromptBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrillPromptBuilder").finish_non_exhaustive()
    }
}

impl Default for DrillPromptBuilder {
    fn default() -> Self {
        Self::new(Arc::new(RandomSeed))
    }
}

impl DrillPromptBuilder {
    pub fn new(seed: Arc<dyn VariationSeed>) -> Self {
        Self { seed }
    }

    pub fn build_system_prompt(&self) -> String {
        let taxonomy: Vec<String> = DrillType::ALL
            .iter()
            .map(|t| {
                format!(
                    "`{}`: {}. Required fields: {}",
                    t,
                    t.summary(),
                    t.required_fields().join(", ")
                )
            })
            .collect();

        let bands: Vec<String> = HandicapBand::ALL
            .iter()
            .map(|b| format!("`{}`: {}", b, b.difficulty_narrative()))
            .collect();

        let examples: Vec<String> = corpus::examples()
            .iter()
            .map(|e| {
                serde_json::to_string_pretty(&e.drill).unwrap_or_else(|_| e.drill.to_string())
            })
            .collect();

        PromptBuilder::new()
            .role(
                "golf coach",
                "designing structured, measurable practice drills",
            )
            .objectives(vec![
                "Design exactly one practice drill for the player described in the user message",
                "Pick the single drill_type whose scoring shape fits the goal best",
                "Return one JSON object and nothing else",
            ])
            .bullets(
                "Rules",
                vec![
                    format!(
                        "Every drill has these fields: {}, plus `drill_type`",
                        BASE_FIELDS.join(", ")
                    ),
                    format!("`title` is at most {} characters", TITLE_MAX_CHARS),
                    format!("`goal` is at most {} characters", GOAL_MAX_CHARS),
                    format!(
                        "`time_minutes` is a whole number between {} and {}",
                        MIN_TIME_MINUTES, MAX_TIME_MINUTES
                    ),
                    "`setup_steps` and `rules` each have at least two short, concrete entries"
                        .to_string(),
                    "`shot_area` uses only: putting, chipping, pitching, bunker, wedges, driver \
                     (comma-join several)"
                        .to_string(),
                    "`lower_is_better` is true only when a lower score is a better result"
                        .to_string(),
                    "Include every required field for the chosen drill_type and no fields from \
                     other types"
                        .to_string(),
                    "For `points` drills at least one outcome must award positive points".to_string(),
                    "Distances are in metres".to_string(),
                    "Do not output an `hcp` field".to_string(),
                ],
            )
            .bullets("Drill Types", taxonomy)
            .bullets("Difficulty by Handicap Band", bands)
            .section("Examples", "One valid drill of each type:")
            .code("json", &examples.join("\n\n"))
            .section(
                "Output Format",
                "Respond with a single JSON object. No markdown, no commentary.",
            )
            .build()
    }

    pub fn build_user_prompt(
        &self,
        request: &DrillRequest,
        hcp: &ParsedHandicap,
        retry_hint: Option<&str>,
    ) -> String {
        let mut builder = PromptBuilder::new();

        if let Some(base) = request.base_drill_without_hcp() {
            let base_json = serde_json::to_string_pretty(&base).unwrap_or_else(|_| base.to_string());
            builder = builder
                .section(
                    "Remix",
                    "Modify the existing drill below. Be conservative: keep its structure, \
                     scoring system and drill_type unless the requested change cannot work \
                     without a different shape. Change only what the request asks for.",
                )
                .code("json", &base_json)
                .context_item("Requested change", &request.goal);
        } else {
            builder = builder.context_item("Goal", &request.goal);
        }

        builder = builder
            .context_item("Time budget", &format!("{} minutes", request.time_minutes))
            .context_item(
                "Shot area",
                request
                    .shot_area_label()
                    .as_deref()
                    .unwrap_or("any (choose what fits the goal)"),
            )
            .context_item("Handicap", &hcp.describe())
            .section("Difficulty", hcp.band.difficulty_narrative());

        let mut environment = Vec::new();
        if let Some(area) = request.practice_area {
            environment.push(area.prompt_hint().to_string());
        }
        if let Some(method) = request.measurement_method {
            environment.push(method.prompt_hint().to_string());
        }
        if !environment.is_empty() {
            builder = builder.bullets("Environment", environment);
        }

        if let Some(distances) = request.effective_flag_distances() {
            let listed = distances
                .iter()
                .map(|d| format_distance(*d))
                .collect::<Vec<_>>()
                .join(", ");
            builder = builder.section(
                "Flag Distances",
                &format!(
                    "Flags are set at: {}. Use ONLY these distances for every target and \
                     station. Do not invent other distances.",
                    listed
                ),
            );
        }

        builder = builder.text(&format!(
            "Variation seed: {} (use it to vary the drill idea; do not echo it)",
            self.seed.next_seed()
        ));

        if let Some(hint) = retry_hint {
            builder = builder.priority(hint);
        }

        builder.build()
    }
}

fn format_distance(metres: f64) -> String {
    if metres.fract() == 0.0 {
        format!("{}m", metres as i64)
    } else {
        format!("{}m", metres)
    }
}
