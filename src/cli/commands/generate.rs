//! Generate Command
//!
//! One-off drill generation from the terminal, optionally saved to the
//! local store under an owner id.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::ai::create_provider;
use crate::config::ConfigLoader;
use crate::drill::{DrillPromptBuilder, DrillRequest, ValidatingGenerator, validate_corpus};
use crate::storage::{Database, DrillStore, SqliteDrillStore};
use crate::types::{DrillError, Result};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub goal: String,
    pub hcp: Option<String>,
    pub time_minutes: Option<u32>,
    pub shot_area: Option<String>,
    pub practice_area: Option<String>,
    pub measurement: Option<String>,
    pub flag_distances: Vec<f64>,
    /// JSON file holding a drill to remix
    pub base_drill: Option<PathBuf>,
    /// Persist under this owner id
    pub save_as: Option<String>,
    /// Update this drill instead of inserting
    pub existing_id: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

impl GenerateOptions {
    /// Same shape the HTTP API accepts
    pub fn request_json(&self) -> Result<Value> {
        let mut body = Map::new();
        body.insert("goal".to_string(), json!(self.goal));

        let optional = [
            ("hcpInput", self.hcp.clone().map(Value::from)),
            ("timeMinutes", self.time_minutes.map(Value::from)),
            ("shotArea", self.shot_area.clone().map(Value::from)),
            ("practiceArea", self.practice_area.clone().map(Value::from)),
            ("measurementMethod", self.measurement.clone().map(Value::from)),
            ("existingId", self.existing_id.clone().map(Value::from)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.to_string(), value);
            }
        }

        if !self.flag_distances.is_empty() {
            body.insert("flagDistances".to_string(), json!(self.flag_distances));
        }

        if let Some(path) = &self.base_drill {
            let content = std::fs::read_to_string(path)?;
            let base: Value = serde_json::from_str(&content).map_err(|e| {
                DrillError::Input(format!("{} is not valid JSON: {}", path.display(), e))
            })?;
            body.insert("baseDrill".to_string(), base);
        }

        Ok(Value::Object(body))
    }
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(provider) = &options.provider {
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &options.model {
        config.llm.model = Some(model.clone());
    }

    validate_corpus()?;
    let request = DrillRequest::from_json(&options.request_json()?)?;

    let generator = ValidatingGenerator::new(
        create_provider(&config.llm)?,
        DrillPromptBuilder::default(),
        Duration::from_secs(config.llm.timeout_secs),
    );
    let generation = generator.generate(&request).await?;

    let mut id = None;
    if let Some(owner) = &options.save_as {
        let store = SqliteDrillStore::new(Arc::new(Database::open(
            &config.storage.database_path,
        )?));
        id = Some(match &request.existing_id {
            Some(existing) => {
                store.update(existing, owner, &generation.drill).await?;
                existing.clone()
            }
            None => store.insert(owner, &generation.drill).await?,
        });
    }

    let output = json!({
        "id": id,
        "drill": generation.drill,
        "saved": options.save_as.is_some(),
        "attempts": generation.attempts,
        "tokens": generation.usage.total(),
        "model": generation.model,
        "latency_ms": generation.latency_ms,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::{MeasurementMethod, PracticeArea, ShotArea};
    use tempfile::TempDir;

    #[test]
    fn test_request_json_round_trips_through_coercion() {
        let options = GenerateOptions {
            goal: "lag putting".to_string(),
            hcp: Some("+1.5".to_string()),
            time_minutes: Some(45),
            shot_area: Some("putting,chipping".to_string()),
            practice_area: Some("short_game_area".to_string()),
            measurement: Some("no_measurement".to_string()),
            flag_distances: vec![10.0, 20.0],
            ..GenerateOptions::default()
        };

        let request = DrillRequest::from_json(&options.request_json().unwrap()).unwrap();
        assert_eq!(request.goal, "lag putting");
        assert_eq!(request.hcp_input.as_deref(), Some("+1.5"));
        assert_eq!(request.time_minutes, 45);
        assert_eq!(request.shot_areas, vec![ShotArea::Putting, ShotArea::Chipping]);
        assert_eq!(request.practice_area, Some(PracticeArea::ShortGameArea));
        assert_eq!(request.measurement_method, Some(MeasurementMethod::VisualManual));
        assert_eq!(request.flag_distances, vec![10.0, 20.0]);
        assert!(!request.is_remix());
    }

    #[test]
    fn test_base_drill_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base.json");
        std::fs::write(&path, r#"{"title": "Ladder", "drill_type": "points"}"#).unwrap();

        let options = GenerateOptions {
            goal: "shorter".to_string(),
            base_drill: Some(path),
            ..GenerateOptions::default()
        };
        let body = options.request_json().unwrap();
        assert_eq!(body["baseDrill"]["title"], "Ladder");
    }

    #[test]
    fn test_invalid_base_drill_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base.json");
        std::fs::write(&path, "not json").unwrap();

        let options = GenerateOptions {
            base_drill: Some(path),
            ..GenerateOptions::default()
        };
        assert!(matches!(options.request_json(), Err(DrillError::Input(_))));
    }
}
