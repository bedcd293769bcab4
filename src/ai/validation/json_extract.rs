//! JSON Extraction for LLM responses.
//!
//! Handles the formatting noise models add around otherwise valid JSON:
//! - Markdown code fence wrapping (```json ... ```)
//! - Byte order mark
//! - Trailing commas before `]` or `}`
//! - JSON embedded in explanatory text

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{DrillError, Result};

/// Extract and parse JSON from a model response.
///
/// Primary entry point; returns `DrillError::UpstreamParse` when no JSON
/// document can be recovered.
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonExtractor::new()
        .parse_or_extract(content)
        .map(|(value, _)| value)
}

/// JSON extraction strategies, least invasive first
#[derive(Debug, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, falling back to cleanup and extraction.
    ///
    /// Returns (Value, was_cleaned)
    pub fn parse_or_extract(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = self.preprocess(raw);

        if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
            return Ok((value, false));
        }

        debug!("Initial JSON parse failed, attempting cleanup");

        let without_commas = self.fix_trailing_commas(&cleaned);
        if let Ok(value) = serde_json::from_str::<Value>(&without_commas) {
            warn!("JSON parsed after trailing comma cleanup");
            return Ok((value, true));
        }

        if let Some(value) = self.extract_object_from_mixed(&cleaned) {
            warn!("JSON extracted from mixed content");
            return Ok((value, true));
        }

        Err(DrillError::upstream_parse(
            "model output is not valid JSON",
            &cleaned,
        ))
    }

    fn preprocess(&self, raw: &str) -> String {
        let s = raw.trim().trim_start_matches('\u{feff}').trim();
        self.strip_code_fences(s).trim().to_string()
    }

    fn strip_code_fences(&self, s: &str) -> String {
        let mut result = s.to_string();

        if result.starts_with("```")
            && let Some(first_newline) = result.find('\n')
        {
            result = result[first_newline + 1..].to_string();
        }

        if result.ends_with("```") {
            result = result[..result.len() - 3].trim_end().to_string();
        }

        result
    }

    /// Drop commas that directly precede `]` or `}` outside strings
    fn fix_trailing_commas(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());
        let mut in_string = false;
        let mut escape = false;

        for (i, &ch) in chars.iter().enumerate() {
            if escape {
                escape = false;
                result.push(ch);
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                ',' if !in_string => {
                    let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                    if matches!(next, Some(']') | Some('}')) {
                        continue;
                    }
                }
                _ => {}
            }

            result.push(ch);
        }

        result
    }

    /// First balanced `{...}` in mixed content that parses, allowing
    /// trailing-comma cleanup. Spans that fail to parse are skipped whole, so
    /// objects nested inside them are never returned. An unclosed span ends
    /// the search.
    fn extract_object_from_mixed(&self, s: &str) -> Option<Value> {
        let mut offset = 0;

        while let Some(found) = s[offset..].find('{') {
            let start = offset + found;
            let candidate = Self::balanced_object(&s[start..])?;

            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return Some(value);
            }
            let without_commas = self.fix_trailing_commas(candidate);
            if let Ok(value) = serde_json::from_str::<Value>(&without_commas) {
                return Some(value);
            }

            debug!(skipped = candidate.len(), "Brace span is not JSON, scanning on");
            offset = start + candidate.len();
        }

        None
    }

    /// Balanced object starting at the `{` that opens `s`
    fn balanced_object(s: &str) -> Option<&str> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (i, ch) in s.char_indices() {
            if escape {
                escape = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&s[..i + 1]);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let (value, cleaned) = JsonExtractor::new()
            .parse_or_extract(r#"{"drill_type": "points"}"#)
            .unwrap();
        assert!(!cleaned);
        assert_eq!(value["drill_type"], "points");
    }

    #[test]
    fn test_strip_code_fences_and_bom() {
        let input = "\u{feff}```json\n{\"key\": \"value\"}\n```";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["key"], "value");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let input = r#"{"rules": ["a", "b",], "title": "x,}",}"#;
        let (value, cleaned) = JsonExtractor::new().parse_or_extract(input).unwrap();
        assert!(cleaned);
        assert_eq!(value["rules"].as_array().unwrap().len(), 2);
        // commas inside strings are untouched
        assert_eq!(value["title"], "x,}");
    }

    #[test]
    fn test_extract_from_mixed() {
        let input = r#"Here is your drill:
{"title": "Ladder {putting}", "rules": []}
Enjoy the session!"#;
        let (value, cleaned) = JsonExtractor::new().parse_or_extract(input).unwrap();
        assert!(cleaned);
        assert_eq!(value["title"], "Ladder {putting}");
    }

    #[test]
    fn test_skips_prose_braces_before_json() {
        let input = "Here is the drill {as requested}:\n{\"drill_type\": \"points\"}";
        let value = extract_json_from_response(input).unwrap();
        assert_eq!(value["drill_type"], "points");
    }

    #[test]
    fn test_truncated_object_never_yields_nested_object() {
        let input = r#"Drill: {"title": "Ladder", "outcomes": [{"label": "Holed", "points": 2}, {"lab"#;
        let err = extract_json_from_response(input).unwrap_err();
        assert!(matches!(err, DrillError::UpstreamParse { .. }));
    }

    #[test]
    fn test_truncated_output_is_upstream_parse_error() {
        let input = r#"{"title": "Ladder", "rules": ["one", "tw"#;
        let err = extract_json_from_response(input).unwrap_err();
        assert!(matches!(err, DrillError::UpstreamParse { .. }));
    }

    #[test]
    fn test_prose_only_is_upstream_parse_error() {
        let err = extract_json_from_response("Sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, DrillError::UpstreamParse { .. }));
    }

    #[test]
    fn test_non_object_json_still_parses() {
        // syntactically valid; shape problems belong to schema validation
        let value = extract_json_from_response("[1, 2, 3]").unwrap();
        assert!(value.is_array());
    }
}
