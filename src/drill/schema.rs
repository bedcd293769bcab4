//! Drill model and structural validation.
//!
//! A drill is a shared base plus exactly one of six variants selected by the
//! `drill_type` tag. Validation works on raw `serde_json::Value` so every
//! problem is reported at once, with a field path, before anything is
//! deserialized. Only known keys survive into the validated drill.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::handicap::ParsedHandicap;
use crate::constants::drill::{
    GOAL_MAX_CHARS, MAX_ATTEMPTS_PER_DRILL, MAX_RETRY_ATTEMPTS, MAX_SHOTS_PER_STATION,
    MAX_TIME_MINUTES, MIN_RULES, MIN_SETUP_STEPS, MIN_TIME_MINUTES, TITLE_MAX_CHARS,
};

// =============================================================================
// Closed vocabularies
// =============================================================================

/// Drill variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillType {
    Points,
    ScoreEntry,
    StationEntry,
    StationOutcomes,
    ConditionalEntry,
    RetryEntry,
}

impl DrillType {
    pub const ALL: [DrillType; 6] = [
        Self::Points,
        Self::ScoreEntry,
        Self::StationEntry,
        Self::StationOutcomes,
        Self::ConditionalEntry,
        Self::RetryEntry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::ScoreEntry => "score_entry",
            Self::StationEntry => "station_entry",
            Self::StationOutcomes => "station_outcomes",
            Self::ConditionalEntry => "conditional_entry",
            Self::RetryEntry => "retry_entry",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Variant-specific fields; base fields are in [`BASE_FIELDS`]
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Points => &["outcomes", "target_points", "distances", "end_condition"],
            Self::ScoreEntry => &["prompt", "score_min", "score_max", "attempts"],
            Self::StationEntry => &[
                "stations",
                "station_score_min",
                "station_score_max",
                "station_score_label",
            ],
            Self::StationOutcomes => &["stations", "outcomes", "shots_per_station"],
            Self::ConditionalEntry => &["prompt", "conditions", "attempts"],
            Self::RetryEntry => &["prompt", "success_criteria", "max_attempts"],
        }
    }

    /// One-line description used in the system prompt taxonomy
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Points => "each shot earns points from a fixed outcome table until a target or end condition is reached",
            Self::ScoreEntry => "the player enters a single numeric score per attempt within a fixed range",
            Self::StationEntry => "the player moves through stations and enters one score per station",
            Self::StationOutcomes => "the player hits a fixed number of shots per station and records an outcome for each",
            Self::ConditionalEntry => "what happens next depends on the result of each attempt",
            Self::RetryEntry => "the player repeats a task until a success criterion is met or attempts run out",
        }
    }
}

impl fmt::Display for DrillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every variant carries (besides `hcp`, which is always recomputed)
pub const BASE_FIELDS: &[&str] = &[
    "title",
    "goal",
    "icon",
    "time_minutes",
    "shot_area",
    "setup_steps",
    "rules",
    "lower_is_better",
];

/// Part of the game a drill trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotArea {
    Putting,
    Chipping,
    Pitching,
    Bunker,
    Wedges,
    Driver,
    /// Legacy catch-all
    Mixed,
}

impl ShotArea {
    pub const ALL: [ShotArea; 7] = [
        Self::Putting,
        Self::Chipping,
        Self::Pitching,
        Self::Bunker,
        Self::Wedges,
        Self::Driver,
        Self::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Putting => "putting",
            Self::Chipping => "chipping",
            Self::Pitching => "pitching",
            Self::Bunker => "bunker",
            Self::Wedges => "wedges",
            Self::Driver => "driver",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == raw)
    }

    /// Split a comma-joined list into known areas (deduplicated, in order)
    /// and the entries that were not recognized.
    pub fn parse_list(raw: &str) -> (Vec<ShotArea>, Vec<String>) {
        let mut known = Vec::new();
        let mut unknown = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match Self::parse(part) {
                Some(area) if !known.contains(&area) => known.push(area),
                Some(_) => {}
                None => unknown.push(part.to_string()),
            }
        }
        (known, unknown)
    }

    pub fn join(areas: &[ShotArea]) -> String {
        areas
            .iter()
            .map(ShotArea::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

// =============================================================================
// Drill model
// =============================================================================

/// A validated drill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    #[serde(flatten)]
    pub base: DrillBase,
    #[serde(flatten)]
    pub kind: DrillKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillBase {
    pub title: String,
    pub goal: String,
    pub icon: String,
    pub time_minutes: i64,
    /// One area or a comma-joined list
    pub shot_area: String,
    pub setup_steps: Vec<String>,
    pub rules: Vec<String>,
    pub lower_is_better: bool,
    #[serde(default)]
    pub hcp: ParsedHandicap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "drill_type", rename_all = "snake_case")]
pub enum DrillKind {
    Points {
        outcomes: Vec<Outcome>,
        target_points: i64,
        distances: Vec<f64>,
        end_condition: String,
    },
    ScoreEntry {
        prompt: String,
        score_min: i64,
        score_max: i64,
        attempts: i64,
    },
    StationEntry {
        stations: Vec<Station>,
        station_score_min: i64,
        station_score_max: i64,
        station_score_label: String,
    },
    StationOutcomes {
        stations: Vec<Station>,
        outcomes: Vec<Outcome>,
        shots_per_station: i64,
    },
    ConditionalEntry {
        prompt: String,
        conditions: Vec<Condition>,
        attempts: i64,
    },
    RetryEntry {
        prompt: String,
        success_criteria: String,
        max_attempts: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub when: String,
    pub then: String,
}

impl Drill {
    pub fn drill_type(&self) -> DrillType {
        match self.kind {
            DrillKind::Points { .. } => DrillType::Points,
            DrillKind::ScoreEntry { .. } => DrillType::ScoreEntry,
            DrillKind::StationEntry { .. } => DrillType::StationEntry,
            DrillKind::StationOutcomes { .. } => DrillType::StationOutcomes,
            DrillKind::ConditionalEntry { .. } => DrillType::ConditionalEntry,
            DrillKind::RetryEntry { .. } => DrillType::RetryEntry,
        }
    }

    /// Replace whatever handicap the drill carried
    pub fn with_hcp(mut self, hcp: ParsedHandicap) -> Self {
        self.base.hcp = hcp;
        self
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Every problem found in one candidate, each prefixed with its field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.errors.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Validate an untrusted candidate and build a [`Drill`] from it.
///
/// Any `hcp` in the candidate is ignored; the returned drill carries the
/// default (`no_hcp`) until the caller overwrites it.
pub fn validate(candidate: &Value) -> std::result::Result<Drill, ValidationFailure> {
    let Some(obj) = candidate.as_object() else {
        return Err(ValidationFailure {
            errors: vec!["drill: expected a JSON object".to_string()],
        });
    };

    let mut checker = FieldChecker::new(obj, String::new());
    check_base(&mut checker);

    let drill_type = match obj.get("drill_type") {
        None | Some(Value::Null) => {
            checker.fail("drill_type", format!("required (one of {})", all_tags()));
            None
        }
        Some(Value::String(tag)) => match DrillType::from_tag(tag.trim()) {
            Some(t) => Some(t),
            None => {
                checker.fail(
                    "drill_type",
                    format!("unknown type '{}' (expected one of {})", tag, all_tags()),
                );
                None
            }
        },
        Some(_) => {
            checker.fail("drill_type", "must be a string");
            None
        }
    };

    if let Some(drill_type) = drill_type {
        check_variant(&mut checker, drill_type);
        checker
            .cleaned
            .insert("drill_type".to_string(), drill_type.as_str().into());
    }

    if !checker.errors.is_empty() {
        return Err(ValidationFailure {
            errors: checker.errors,
        });
    }

    serde_json::from_value(Value::Object(checker.cleaned)).map_err(|e| ValidationFailure {
        errors: vec![format!("drill: {}", e)],
    })
}

fn all_tags() -> String {
    DrillType::ALL
        .iter()
        .map(DrillType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_base(c: &mut FieldChecker<'_>) {
    c.text("title", Some(TITLE_MAX_CHARS));
    c.text("goal", Some(GOAL_MAX_CHARS));
    c.text("icon", None);
    c.integer("time_minutes", MIN_TIME_MINUTES, MAX_TIME_MINUTES);
    c.shot_area("shot_area");
    c.text_list("setup_steps", MIN_SETUP_STEPS);
    c.text_list("rules", MIN_RULES);
    c.boolean("lower_is_better");
}

fn check_variant(c: &mut FieldChecker<'_>, drill_type: DrillType) {
    match drill_type {
        DrillType::Points => {
            if let Some(outcomes) = c.objects("outcomes", 2, check_outcome) {
                let any_positive = outcomes
                    .iter()
                    .any(|o| o.get("points").and_then(Value::as_i64).unwrap_or(0) > 0);
                if !any_positive {
                    c.fail(
                        "outcomes",
                        "at least one outcome must award positive points",
                    );
                }
            }
            c.integer("target_points", 1, i64::MAX);
            c.positive_numbers("distances", 1);
            c.text("end_condition", None);
        }
        DrillType::ScoreEntry => {
            c.text("prompt", None);
            c.ordered_range("score_min", "score_max");
            c.integer("attempts", 1, MAX_ATTEMPTS_PER_DRILL);
        }
        DrillType::StationEntry => {
            c.objects("stations", 2, check_station);
            c.ordered_range("station_score_min", "station_score_max");
            c.text("station_score_label", None);
        }
        DrillType::StationOutcomes => {
            c.objects("stations", 2, check_station);
            c.objects("outcomes", 2, check_outcome);
            c.integer("shots_per_station", 1, MAX_SHOTS_PER_STATION);
        }
        DrillType::ConditionalEntry => {
            c.text("prompt", None);
            c.objects("conditions", 2, |item| {
                item.text("when", None);
                item.text("then", None);
            });
            c.integer("attempts", 1, MAX_ATTEMPTS_PER_DRILL);
        }
        DrillType::RetryEntry => {
            c.text("prompt", None);
            c.text("success_criteria", None);
            c.integer("max_attempts", 1, MAX_RETRY_ATTEMPTS);
        }
    }
}

fn check_outcome(item: &mut FieldChecker<'_>) {
    item.text("label", None);
    item.integer("points", i64::MIN, i64::MAX);
}

fn check_station(item: &mut FieldChecker<'_>) {
    item.text("label", None);
    item.optional_positive("distance_m");
}

/// Accumulates errors and normalized values for one JSON object
struct FieldChecker<'a> {
    source: &'a Map<String, Value>,
    prefix: String,
    cleaned: Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> FieldChecker<'a> {
    fn new(source: &'a Map<String, Value>, prefix: String) -> Self {
        Self {
            source,
            prefix,
            cleaned: Map::new(),
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl fmt::Display) {
        self.errors
            .push(format!("{}{}: {}", self.prefix, field, message));
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let source = self.source;
        match source.get(field) {
            None | Some(Value::Null) => {
                self.fail(field, "required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn text(&mut self, field: &str, max_chars: Option<usize>) {
        let Some(value) = self.required(field) else {
            return;
        };
        match value.as_str().map(str::trim) {
            None => self.fail(field, "must be a string"),
            Some("") => self.fail(field, "must not be empty"),
            Some(s) => match max_chars {
                Some(max) if s.chars().count() > max => {
                    self.fail(field, format!("must be at most {} characters", max))
                }
                _ => {
                    self.cleaned.insert(field.to_string(), s.into());
                }
            },
        }
    }

    fn integer(&mut self, field: &str, min: i64, max: i64) -> Option<i64> {
        let value = self.required(field)?;
        let Some(n) = as_integer(value) else {
            self.fail(field, "must be an integer");
            return None;
        };
        if n < min || n > max {
            let message = match (min, max) {
                (i64::MIN, _) => format!("must be at most {}", max),
                (_, i64::MAX) => format!("must be at least {}", min),
                _ => format!("must be between {} and {}", min, max),
            };
            self.fail(field, message);
            return None;
        }
        self.cleaned.insert(field.to_string(), n.into());
        Some(n)
    }

    fn ordered_range(&mut self, min_field: &str, max_field: &str) {
        let low = self.integer(min_field, i64::MIN, i64::MAX);
        let high = self.integer(max_field, i64::MIN, i64::MAX);
        if let (Some(low), Some(high)) = (low, high)
            && low >= high
        {
            self.fail(max_field, format!("must be greater than {}", min_field));
        }
    }

    fn boolean(&mut self, field: &str) {
        let Some(value) = self.required(field) else {
            return;
        };
        match value.as_bool() {
            Some(b) => {
                self.cleaned.insert(field.to_string(), b.into());
            }
            None => self.fail(field, "must be a boolean"),
        }
    }

    fn shot_area(&mut self, field: &str) {
        let Some(value) = self.required(field) else {
            return;
        };
        let Some(raw) = value.as_str() else {
            self.fail(field, "must be a string");
            return;
        };
        let (known, unknown) = ShotArea::parse_list(raw);
        if !unknown.is_empty() {
            self.fail(field, format!("unknown area(s): {}", unknown.join(", ")));
        } else if known.is_empty() {
            self.fail(field, "must not be empty");
        } else {
            self.cleaned
                .insert(field.to_string(), ShotArea::join(&known).into());
        }
    }

    fn array(&mut self, field: &str, min_len: usize) -> Option<&'a Vec<Value>> {
        let value = self.required(field)?;
        let Some(items) = value.as_array() else {
            self.fail(field, "must be an array");
            return None;
        };
        if items.len() < min_len {
            self.fail(
                field,
                format!("must contain at least {} item(s), got {}", min_len, items.len()),
            );
            return None;
        }
        Some(items)
    }

    fn text_list(&mut self, field: &str, min_len: usize) {
        let Some(items) = self.array(field, min_len) else {
            return;
        };
        let mut cleaned = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item.as_str().map(str::trim) {
                Some(s) if !s.is_empty() => cleaned.push(Value::from(s)),
                _ => {
                    self.fail(&format!("{}[{}]", field, i), "must be a non-empty string");
                    ok = false;
                }
            }
        }
        if ok {
            self.cleaned.insert(field.to_string(), Value::Array(cleaned));
        }
    }

    fn positive_numbers(&mut self, field: &str, min_len: usize) {
        let Some(items) = self.array(field, min_len) else {
            return;
        };
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            if !item.as_f64().is_some_and(|n| n.is_finite() && n > 0.0) {
                self.fail(&format!("{}[{}]", field, i), "must be a positive number");
                ok = false;
            }
        }
        if ok {
            self.cleaned
                .insert(field.to_string(), Value::Array(items.clone()));
        }
    }

    fn optional_positive(&mut self, field: &str) {
        let source = self.source;
        match source.get(field) {
            None | Some(Value::Null) => {}
            Some(value) if value.as_f64().is_some_and(|n| n.is_finite() && n > 0.0) => {
                self.cleaned.insert(field.to_string(), value.clone());
            }
            Some(_) => self.fail(field, "must be a positive number"),
        }
    }

    /// Validate an array of objects; returns the cleaned items when all pass.
    fn objects<F>(
        &mut self,
        field: &str,
        min_len: usize,
        check_item: F,
    ) -> Option<Vec<Map<String, Value>>>
    where
        F: Fn(&mut FieldChecker<'a>),
    {
        let items = self.array(field, min_len)?;
        let mut cleaned = Vec::with_capacity(items.len());
        let mut ok = true;

        for (i, item) in items.iter().enumerate() {
            let path = format!("{}{}[{}]", self.prefix, field, i);
            let Some(obj) = item.as_object() else {
                self.errors.push(format!("{}: must be an object", path));
                ok = false;
                continue;
            };
            let mut nested = FieldChecker::new(obj, format!("{}.", path));
            check_item(&mut nested);
            if nested.errors.is_empty() {
                cleaned.push(nested.cleaned);
            } else {
                self.errors.extend(nested.errors);
                ok = false;
            }
        }

        if !ok {
            return None;
        }
        self.cleaned.insert(
            field.to_string(),
            Value::Array(cleaned.iter().cloned().map(Value::Object).collect()),
        );
        Some(cleaned)
    }
}

/// Integers, including floats with no fractional part (`20.0`)
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::handicap::HandicapBand;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "title": "Ladder Putting",
            "goal": "Build distance control from 3 to 12 feet",
            "icon": "⛳",
            "time_minutes": 20,
            "shot_area": "putting",
            "setup_steps": ["Place tees at 3, 6, 9 and 12 feet", "Use three balls"],
            "rules": ["Hole out every putt", "Restart the ladder after a three-putt"],
            "lower_is_better": false
        })
    }

    fn with(mut value: Value, extra: Value) -> Value {
        let obj = value.as_object_mut().unwrap();
        for (k, v) in extra.as_object().unwrap() {
            obj.insert(k.clone(), v.clone());
        }
        value
    }

    fn points_drill() -> Value {
        with(
            base(),
            json!({
                "drill_type": "points",
                "outcomes": [{"label": "Holed", "points": 3}, {"label": "Missed", "points": 0}],
                "target_points": 21,
                "distances": [1, 2, 3.5],
                "end_condition": "Stop at 21 points"
            }),
        )
    }

    #[test]
    fn test_valid_points_drill() {
        let drill = validate(&points_drill()).unwrap();
        assert_eq!(drill.drill_type(), DrillType::Points);
        assert_eq!(drill.base.hcp.band, HandicapBand::NoHcp);
        match drill.kind {
            DrillKind::Points {
                ref outcomes,
                target_points,
                ..
            } => {
                assert_eq!(outcomes.len(), 2);
                assert_eq!(target_points, 21);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_points_requires_positive_outcome() {
        let mut candidate = points_drill();
        candidate["outcomes"] = json!([
            {"label": "Holed", "points": 0},
            {"label": "Missed", "points": -1}
        ]);
        let failure = validate(&candidate).unwrap_err();
        assert_eq!(failure.errors.len(), 1);
        assert!(failure.errors[0].contains("positive points"));
    }

    #[test]
    fn test_score_entry_missing_prompt() {
        let candidate = with(
            base(),
            json!({"drill_type": "score_entry", "score_min": 0, "score_max": 10, "attempts": 10}),
        );
        let failure = validate(&candidate).unwrap_err();
        assert_eq!(failure.errors, vec!["prompt: required".to_string()]);
    }

    #[test]
    fn test_score_range_must_be_ordered() {
        let candidate = with(
            base(),
            json!({"drill_type": "score_entry", "prompt": "Putts made", "score_min": 5, "score_max": 5, "attempts": 10}),
        );
        let failure = validate(&candidate).unwrap_err();
        assert!(failure.errors[0].starts_with("score_max:"));
    }

    #[test]
    fn test_base_bounds() {
        let mut candidate = points_drill();
        candidate["title"] = json!("x".repeat(61));
        candidate["time_minutes"] = json!(90);
        candidate["setup_steps"] = json!(["only one"]);
        candidate["rules"] = json!([]);
        candidate["lower_is_better"] = json!("no");
        let failure = validate(&candidate).unwrap_err();
        let fields: Vec<&str> = failure
            .errors
            .iter()
            .map(|e| e.split(':').next().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec!["title", "time_minutes", "setup_steps", "rules", "lower_is_better"]
        );
    }

    #[test]
    fn test_unknown_and_missing_drill_type() {
        let missing = validate(&base()).unwrap_err();
        assert!(missing.errors.iter().any(|e| e.starts_with("drill_type: required")));

        let unknown = validate(&with(base(), json!({"drill_type": "freestyle"}))).unwrap_err();
        assert!(unknown.errors.iter().any(|e| e.contains("unknown type 'freestyle'")));
    }

    #[test]
    fn test_non_object_candidate() {
        let failure = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(failure.errors, vec!["drill: expected a JSON object".to_string()]);
    }

    #[test]
    fn test_nested_errors_have_paths() {
        let candidate = with(
            base(),
            json!({
                "drill_type": "station_entry",
                "stations": [{"label": "Left"}, {"label": "", "distance_m": -3}],
                "station_score_min": 0,
                "station_score_max": 5,
                "station_score_label": "Balls inside 1m"
            }),
        );
        let failure = validate(&candidate).unwrap_err();
        assert_eq!(
            failure.errors,
            vec![
                "stations[1].label: must not be empty".to_string(),
                "stations[1].distance_m: must be a positive number".to_string(),
            ]
        );
    }

    #[test]
    fn test_model_hcp_and_unknown_keys_are_dropped() {
        let mut candidate = points_drill();
        candidate["hcp"] = json!({"input": "+9", "value": -9, "band": "plus_5_to_0"});
        candidate["coach_notes"] = json!("ignore me");
        let drill = validate(&candidate).unwrap();
        assert_eq!(drill.base.hcp, ParsedHandicap::none());

        let value = serde_json::to_value(&drill).unwrap();
        assert!(value.get("coach_notes").is_none());
        assert_eq!(value["drill_type"], "points");
        assert_eq!(value["hcp"]["band"], "no_hcp");
    }

    #[test]
    fn test_whole_floats_accepted_as_integers() {
        let mut candidate = points_drill();
        candidate["time_minutes"] = json!(20.0);
        let drill = validate(&candidate).unwrap();
        assert_eq!(drill.base.time_minutes, 20);

        candidate["time_minutes"] = json!(20.5);
        assert!(validate(&candidate).is_err());
    }

    #[test]
    fn test_shot_area_lists_are_normalized() {
        let mut candidate = points_drill();
        candidate["shot_area"] = json!("Putting, chipping");
        assert_eq!(
            validate(&candidate).unwrap().base.shot_area,
            "putting,chipping"
        );

        candidate["shot_area"] = json!("putting, lob");
        let failure = validate(&candidate).unwrap_err();
        assert!(failure.errors[0].contains("lob"));
    }

    #[test]
    fn test_validated_drill_revalidates() {
        let drill = validate(&points_drill()).unwrap();
        let again = validate(&serde_json::to_value(&drill).unwrap()).unwrap();
        assert_eq!(drill, again);
    }

    #[test]
    fn test_required_fields_cover_every_type() {
        for drill_type in DrillType::ALL {
            assert!(!drill_type.required_fields().is_empty());
            assert_eq!(DrillType::from_tag(drill_type.as_str()), Some(drill_type));
        }
    }
}
