//! Drill request parsing.
//!
//! The request body comes from the app's own UI, so coercion is lenient:
//! unknown enum values become `None` and out-of-range numbers are clamped.
//! The only hard failure is a body that is not a JSON object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::schema::ShotArea;
use crate::constants::drill::{
    DEFAULT_GOAL, DEFAULT_TIME_MINUTES, MAX_TIME_MINUTES, MIN_TIME_MINUTES,
};
use crate::types::{DrillError, Result, json_positive_numbers, json_string};

/// Where the player will practise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeArea {
    DrivingRange,
    ShortGameArea,
    OnCourse,
    IndoorSimulator,
}

impl PracticeArea {
    pub const ALL: [PracticeArea; 4] = [
        Self::DrivingRange,
        Self::ShortGameArea,
        Self::OnCourse,
        Self::IndoorSimulator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DrivingRange => "driving_range",
            Self::ShortGameArea => "short_game_area",
            Self::OnCourse => "on_course",
            Self::IndoorSimulator => "indoor_simulator",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == raw)
    }

    /// Environment constraint given to the model
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::DrivingRange => {
                "Driving range: mats or grass tees, fixed target flags, no putting green and no \
                 bunker. Ball flight is visible but roll-out is not."
            }
            Self::ShortGameArea => {
                "Short game area: chipping green with flags, practice bunker and rough nearby. \
                 Full swings longer than a wedge are not possible."
            }
            Self::OnCourse => {
                "On course: real holes and lies, one ball per shot, keep pace of play in mind \
                 and avoid setups that need extra equipment."
            }
            Self::IndoorSimulator => {
                "Indoor simulator: hitting into a screen from a mat. No real green, bunker or \
                 roll-out; scoring must come from the simulator's shot data."
            }
        }
    }
}

/// How shot results are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMethod {
    LaunchMonitor,
    VisualManual,
}

impl MeasurementMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LaunchMonitor => "launch_monitor",
            Self::VisualManual => "visual_manual",
        }
    }

    /// Canonical values plus the legacy aliases older clients still send
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "launch_monitor" | "simulator_builtin" => Some(Self::LaunchMonitor),
            "visual_manual" | "no_measurement" => Some(Self::VisualManual),
            _ => None,
        }
    }

    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Self::LaunchMonitor => {
                "A launch monitor is available: scoring may use carry distance, dispersion and \
                 other measured numbers."
            }
            Self::VisualManual => {
                "No measuring device: every result must be judged by eye or counted by hand \
                 (holed, inside a club length, on the green)."
            }
        }
    }
}

/// Coerced generation request
#[derive(Debug, Clone, PartialEq)]
pub struct DrillRequest {
    pub goal: String,
    pub hcp_input: Option<String>,
    pub time_minutes: i64,
    /// Empty when no known area was requested
    pub shot_areas: Vec<ShotArea>,
    /// Drill to remix, when present
    pub base_drill: Option<Value>,
    /// Switches persistence from insert to update
    pub existing_id: Option<String>,
    pub practice_area: Option<PracticeArea>,
    pub measurement_method: Option<MeasurementMethod>,
    pub flag_distances: Vec<f64>,
}

impl Default for DrillRequest {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL.to_string(),
            hcp_input: None,
            time_minutes: DEFAULT_TIME_MINUTES,
            shot_areas: Vec::new(),
            base_drill: None,
            existing_id: None,
            practice_area: None,
            measurement_method: None,
            flag_distances: Vec::new(),
        }
    }
}

impl DrillRequest {
    /// Parse a raw HTTP body. An empty body is treated as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DrillError::Input(format!("Invalid JSON body: {}", e)))?;
        Self::from_json(&value)
    }

    /// Coerce every known field, ignoring anything unrecognized
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DrillError::Input(
                "Request body must be a JSON object".to_string(),
            ));
        }

        let request = Self {
            goal: json_string(value, "goal").unwrap_or_else(|| DEFAULT_GOAL.to_string()),
            hcp_input: coerce_hcp_input(value.get("hcpInput")),
            time_minutes: coerce_time(value.get("timeMinutes")),
            shot_areas: coerce_shot_areas(value.get("shotArea")),
            base_drill: value.get("baseDrill").filter(|v| v.is_object()).cloned(),
            existing_id: json_string(value, "existingId"),
            practice_area: json_string(value, "practiceArea")
                .and_then(|s| PracticeArea::parse(&s)),
            measurement_method: json_string(value, "measurementMethod")
                .and_then(|s| MeasurementMethod::parse(&s)),
            flag_distances: json_positive_numbers(value, "flagDistances"),
        };

        debug!(
            remix = request.is_remix(),
            update = request.existing_id.is_some(),
            "Parsed drill request"
        );
        Ok(request)
    }

    pub fn is_remix(&self) -> bool {
        self.base_drill.is_some()
    }

    /// Comma-joined shot areas, `None` when unset
    pub fn shot_area_label(&self) -> Option<String> {
        (!self.shot_areas.is_empty()).then(|| ShotArea::join(&self.shot_areas))
    }

    /// Flag distances, only when they apply to the chosen practice area
    pub fn effective_flag_distances(&self) -> Option<&[f64]> {
        (self.practice_area == Some(PracticeArea::ShortGameArea)
            && !self.flag_distances.is_empty())
        .then_some(self.flag_distances.as_slice())
    }

    /// The remix base with its `hcp` removed
    pub fn base_drill_without_hcp(&self) -> Option<Value> {
        self.base_drill.as_ref().map(|base| {
            let mut base = base.clone();
            if let Some(obj) = base.as_object_mut() {
                obj.remove("hcp");
            }
            base
        })
    }
}

fn coerce_hcp_input(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_time(value: Option<&Value>) -> i64 {
    let minutes = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    minutes
        .filter(|m| m.is_finite())
        .map(|m| (m.round() as i64).clamp(MIN_TIME_MINUTES, MAX_TIME_MINUTES))
        .unwrap_or(DEFAULT_TIME_MINUTES)
}

fn coerce_shot_areas(value: Option<&Value>) -> Vec<ShotArea> {
    let raw = match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        _ => return Vec::new(),
    };
    let (known, unknown) = ShotArea::parse_list(&raw);
    if !unknown.is_empty() {
        debug!(?unknown, "Dropping unrecognized shot areas");
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_uses_defaults() {
        let request = DrillRequest::from_json(&json!({})).unwrap();
        assert_eq!(request, DrillRequest::default());
        assert_eq!(request.time_minutes, 20);
        assert_eq!(request.goal, DEFAULT_GOAL);
    }

    #[test]
    fn test_empty_body_is_default() {
        assert_eq!(
            DrillRequest::from_body(b"  ").unwrap(),
            DrillRequest::default()
        );
    }

    #[test]
    fn test_malformed_body_is_input_error() {
        let err = DrillRequest::from_body(b"{not json").unwrap_err();
        assert_eq!(err.status_code(), 400);
        let err = DrillRequest::from_body(b"[1,2]").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unknown_enums_become_none() {
        let request = DrillRequest::from_json(&json!({
            "shotArea": "lob",
            "practiceArea": "backyard",
            "measurementMethod": "laser"
        }))
        .unwrap();
        assert!(request.shot_areas.is_empty());
        assert_eq!(request.shot_area_label(), None);
        assert_eq!(request.practice_area, None);
        assert_eq!(request.measurement_method, None);
    }

    #[test]
    fn test_shot_area_list_drops_unknown_entries() {
        let request =
            DrillRequest::from_json(&json!({"shotArea": "putting, lob,Chipping,putting"})).unwrap();
        assert_eq!(
            request.shot_areas,
            vec![ShotArea::Putting, ShotArea::Chipping]
        );
        assert_eq!(request.shot_area_label().as_deref(), Some("putting,chipping"));
    }

    #[test]
    fn test_measurement_aliases() {
        let parse = |s: &str| {
            DrillRequest::from_json(&json!({"measurementMethod": s}))
                .unwrap()
                .measurement_method
        };
        assert_eq!(parse("simulator_builtin"), Some(MeasurementMethod::LaunchMonitor));
        assert_eq!(parse("no_measurement"), Some(MeasurementMethod::VisualManual));
        assert_eq!(parse("launch_monitor"), Some(MeasurementMethod::LaunchMonitor));
    }

    #[test]
    fn test_time_is_clamped() {
        let time = |v: Value| {
            DrillRequest::from_json(&json!({"timeMinutes": v}))
                .unwrap()
                .time_minutes
        };
        assert_eq!(time(json!(1)), 5);
        assert_eq!(time(json!(600)), 60);
        assert_eq!(time(json!(32.6)), 33);
        assert_eq!(time(json!("45")), 45);
        assert_eq!(time(json!("soon")), 20);
        assert_eq!(time(Value::Null), 20);
    }

    #[test]
    fn test_hcp_input_accepts_numbers() {
        let request = DrillRequest::from_json(&json!({"hcpInput": 18})).unwrap();
        assert_eq!(request.hcp_input.as_deref(), Some("18"));
        let request = DrillRequest::from_json(&json!({"hcpInput": "  "})).unwrap();
        assert_eq!(request.hcp_input, None);
    }

    #[test]
    fn test_flag_distances_only_for_short_game_area() {
        let request = DrillRequest::from_json(&json!({
            "practiceArea": "short_game_area",
            "flagDistances": [20, -5, "x", 40]
        }))
        .unwrap();
        assert_eq!(request.effective_flag_distances(), Some(&[20.0, 40.0][..]));

        let range = DrillRequest::from_json(&json!({
            "practiceArea": "driving_range",
            "flagDistances": [20, 40]
        }))
        .unwrap();
        assert_eq!(range.effective_flag_distances(), None);
    }

    #[test]
    fn test_base_drill_must_be_object_and_hcp_is_stripped() {
        let request = DrillRequest::from_json(&json!({"baseDrill": "nope"})).unwrap();
        assert!(!request.is_remix());

        let request = DrillRequest::from_json(&json!({
            "baseDrill": {"title": "Ladder", "hcp": {"band": "0_to_5"}},
            "existingId": "  "
        }))
        .unwrap();
        assert!(request.is_remix());
        assert_eq!(request.existing_id, None);
        let base = request.base_drill_without_hcp().unwrap();
        assert!(base.get("hcp").is_none());
        assert_eq!(base["title"], "Ladder");
    }
}
