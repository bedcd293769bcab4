//! Few-shot example corpus.
//!
//! One example per drill type, embedded in the system prompt. The corpus is
//! checked against the schema at startup; a failing example stops the process.

use serde_json::{Value, json};
use tracing::debug;

use super::schema::{self, Drill, DrillType};
use crate::types::{DrillError, Result};

/// A bundled example drill
#[derive(Debug, Clone)]
pub struct CorpusExample {
    pub name: &'static str,
    pub drill_type: DrillType,
    pub drill: Value,
}

/// All bundled examples, one per drill type, in taxonomy order
pub fn examples() -> Vec<CorpusExample> {
    vec![
        CorpusExample {
            name: "Three-Foot Circle",
            drill_type: DrillType::Points,
            drill: json!({
                "drill_type": "points",
                "title": "Three-Foot Circle",
                "goal": "Convert short putts under light pressure",
                "icon": "🎯",
                "time_minutes": 15,
                "shot_area": "putting",
                "setup_steps": [
                    "Place six balls in a circle one metre from the hole",
                    "Add a second circle of six balls at two metres"
                ],
                "rules": [
                    "Putt every ball once, inner circle first",
                    "Score each putt from the outcome table",
                    "Finish as soon as you reach the target"
                ],
                "lower_is_better": false,
                "outcomes": [
                    {"label": "Holed", "points": 2},
                    {"label": "Lip out", "points": 1},
                    {"label": "Missed", "points": 0}
                ],
                "target_points": 18,
                "distances": [1, 2],
                "end_condition": "Reach 18 points or finish all twelve balls"
            }),
        },
        CorpusExample {
            name: "Up and Down Challenge",
            drill_type: DrillType::ScoreEntry,
            drill: json!({
                "drill_type": "score_entry",
                "title": "Up and Down Challenge",
                "goal": "Save par from around the green",
                "icon": "⛳",
                "time_minutes": 25,
                "shot_area": "chipping,putting",
                "setup_steps": [
                    "Drop nine balls in varied lies around one green",
                    "Take a wedge and your putter only"
                ],
                "rules": [
                    "Chip then putt out each ball",
                    "Record the total strokes for all nine balls"
                ],
                "lower_is_better": true,
                "prompt": "Total strokes for nine up-and-downs",
                "score_min": 9,
                "score_max": 40,
                "attempts": 1
            }),
        },
        CorpusExample {
            name: "Wedge Ladder",
            drill_type: DrillType::StationEntry,
            drill: json!({
                "drill_type": "station_entry",
                "title": "Wedge Ladder",
                "goal": "Dial in carry distances with partial wedges",
                "icon": "🪜",
                "time_minutes": 30,
                "shot_area": "wedges",
                "setup_steps": [
                    "Pick targets at 30, 50 and 70 metres",
                    "Hit five balls at each target"
                ],
                "rules": [
                    "Count balls finishing within five metres of the target",
                    "Move to the next station after five balls"
                ],
                "lower_is_better": false,
                "stations": [
                    {"label": "30 m", "distance_m": 30},
                    {"label": "50 m", "distance_m": 50},
                    {"label": "70 m", "distance_m": 70}
                ],
                "station_score_min": 0,
                "station_score_max": 5,
                "station_score_label": "Balls within 5 m"
            }),
        },
        CorpusExample {
            name: "Bunker Clock",
            drill_type: DrillType::StationOutcomes,
            drill: json!({
                "drill_type": "station_outcomes",
                "title": "Bunker Clock",
                "goal": "Escape the sand first time from different lies",
                "icon": "🏖️",
                "time_minutes": 20,
                "shot_area": "bunker",
                "setup_steps": [
                    "Set up three spots in a greenside bunker",
                    "Use a flat lie, an uphill lie and a plugged lie"
                ],
                "rules": [
                    "Hit four balls from each spot",
                    "Record where every ball finishes"
                ],
                "lower_is_better": false,
                "stations": [
                    {"label": "Flat lie"},
                    {"label": "Uphill lie"},
                    {"label": "Plugged lie"}
                ],
                "outcomes": [
                    {"label": "On green", "points": 1},
                    {"label": "Still in bunker", "points": 0}
                ],
                "shots_per_station": 4
            }),
        },
        CorpusExample {
            name: "Fairway Finder",
            drill_type: DrillType::ConditionalEntry,
            drill: json!({
                "drill_type": "conditional_entry",
                "title": "Fairway Finder",
                "goal": "Hit pressure drives into a defined corridor",
                "icon": "🏌️",
                "time_minutes": 30,
                "shot_area": "driver",
                "setup_steps": [
                    "Pick two flags on the range 30 metres apart as the fairway",
                    "Tee up ten balls"
                ],
                "rules": [
                    "Hit one drive at a time with a full pre-shot routine",
                    "Apply the condition that matches each result"
                ],
                "lower_is_better": false,
                "prompt": "Did the drive finish inside the corridor?",
                "conditions": [
                    {"when": "Drive finishes in the corridor", "then": "Add one to your streak"},
                    {"when": "Drive misses the corridor", "then": "Reset the streak to zero"}
                ],
                "attempts": 10
            }),
        },
        CorpusExample {
            name: "Lag to the Fringe",
            drill_type: DrillType::RetryEntry,
            drill: json!({
                "drill_type": "retry_entry",
                "title": "Lag to the Fringe",
                "goal": "Stop long putts close to the edge of the green",
                "icon": "🔁",
                "time_minutes": 15,
                "shot_area": "putting",
                "setup_steps": [
                    "Stand twelve metres from the far fringe",
                    "Use one ball"
                ],
                "rules": [
                    "The ball must stop within one putter length of the fringe",
                    "Balls that reach the fringe do not count"
                ],
                "lower_is_better": true,
                "prompt": "Attempts needed to stop a putt inside the zone",
                "success_criteria": "Ball stops within one putter length of the fringe without touching it",
                "max_attempts": 20
            }),
        },
    ]
}

/// Validate every bundled example, failing on the first that does not pass
pub fn validate_corpus() -> Result<Vec<Drill>> {
    validate_examples(&examples())
}

/// Each example must pass the schema and validate as the type it is labelled with
pub fn validate_examples(examples: &[CorpusExample]) -> Result<Vec<Drill>> {
    let mut drills = Vec::new();
    for example in examples {
        let drill = schema::validate(&example.drill).map_err(|failure| {
            DrillError::Config(format!(
                "Few-shot example '{}' fails validation: {}",
                example.name, failure
            ))
        })?;
        if drill.drill_type() != example.drill_type {
            return Err(DrillError::Config(format!(
                "Few-shot example '{}' is labelled {} but validates as {}",
                example.name,
                example.drill_type,
                drill.drill_type()
            )));
        }
        drills.push(drill);
    }
    debug!("Validated {} few-shot examples", drills.len());
    Ok(drills)
}
