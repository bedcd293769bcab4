//! Retry hint construction.
//!
//! When the failed output names a known drill type, the hint lists exactly
//! which required fields were missing plus the first few validation messages.
//! Otherwise it restates the six valid types and their required fields.

use serde_json::Value;

use super::schema::{BASE_FIELDS, DrillType};
use crate::constants::generation::HINT_MAX_ERRORS;
use crate::types::is_missing_value;

/// Builds the correction appended to the retry prompt
pub struct RetryHintBuilder;

impl RetryHintBuilder {
    pub fn build(attempted: &Value, errors: &[String]) -> String {
        match identify_type(attempted) {
            Some(drill_type) => Self::targeted(attempted, drill_type, errors),
            None => Self::generic(),
        }
    }

    /// Base and variant fields that are absent, null, blank or empty arrays
    pub fn missing_fields(attempted: &Value, drill_type: DrillType) -> Vec<&'static str> {
        BASE_FIELDS
            .iter()
            .chain(drill_type.required_fields())
            .copied()
            .filter(|field| is_missing_value(attempted.get(*field)))
            .collect()
    }

    fn targeted(attempted: &Value, drill_type: DrillType, errors: &[String]) -> String {
        let mut hint = format!(
            "Your previous response was a `{}` drill but it failed validation.",
            drill_type
        );

        let missing = Self::missing_fields(attempted, drill_type);
        if !missing.is_empty() {
            hint.push_str(&format!(
                "\nMissing or empty required fields: {}.",
                missing.join(", ")
            ));
        }

        if !errors.is_empty() {
            hint.push_str("\nFix these problems:");
            for error in errors.iter().take(HINT_MAX_ERRORS) {
                hint.push_str(&format!("\n- {}", error));
            }
            if errors.len() > HINT_MAX_ERRORS {
                hint.push_str(&format!(
                    "\n- ...and {} more",
                    errors.len() - HINT_MAX_ERRORS
                ));
            }
        }

        hint.push_str(&format!(
            "\nReturn the complete corrected JSON object with drill_type `{}` and every \
             required field: {}.",
            drill_type,
            drill_type.required_fields().join(", ")
        ));
        hint
    }

    fn generic() -> String {
        let mut hint = String::from(
            "Your previous response did not have a valid `drill_type`. Set drill_type to \
             exactly one of: points, score_entry, station_entry, station_outcomes, \
             conditional_entry, retry_entry.\nInclude all required fields for the type you pick:",
        );
        for drill_type in DrillType::ALL {
            hint.push_str(&format!(
                "\n- {}: {}",
                drill_type,
                drill_type.required_fields().join(", ")
            ));
        }
        hint.push_str(&format!(
            "\nEvery type also needs: {}.",
            BASE_FIELDS.join(", ")
        ));
        hint
    }
}

fn identify_type(attempted: &Value) -> Option<DrillType> {
    attempted
        .get("drill_type")
        .and_then(Value::as_str)
        .and_then(|tag| DrillType::from_tag(tag.trim()))
}
