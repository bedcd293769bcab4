//! Test doubles shared by the generator and server tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::ai::{LlmProvider, LlmResponse, ResponseMetadata, ResponseTiming, TokenUsage};
use crate::types::Result;

/// Replays canned responses in order, repeating the last one when exhausted.
/// Every call reports 12 input and 8 output tokens over 7 ms.
pub struct ScriptedProvider {
    responses: Vec<String>,
    calls: AtomicU32,
    user_prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            calls: AtomicU32::new(0),
            user_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        Self::new(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn user_prompts(&self) -> Vec<String> {
        self.user_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<LlmResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        self.user_prompts
            .lock()
            .unwrap()
            .push(user_prompt.to_string());
        let text = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default();
        Ok(LlmResponse::with_metrics(
            text,
            TokenUsage::new(12, 8),
            ResponseTiming { total_ms: 7 },
            ResponseMetadata {
                model: self.model().to_string(),
                provider: self.name().to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// A complete `score_entry` drill as a model might return it
pub fn score_entry_drill() -> Value {
    json!({
        "drill_type": "score_entry",
        "title": "Confidence Circle",
        "goal": "Build confidence on short putts",
        "icon": "⛳",
        "time_minutes": 20,
        "shot_area": "putting",
        "setup_steps": ["Place ten balls one metre from the hole", "Use one putter"],
        "rules": ["Putt each ball once", "Count putts holed"],
        "lower_is_better": false,
        "prompt": "Putts holed out of ten",
        "score_min": 0,
        "score_max": 10,
        "attempts": 3,
        "hcp": {"input": "+4", "value": -4.0, "band": "plus_5_to_0"}
    })
}

/// The same drill without its `prompt` field
pub fn score_entry_missing_prompt() -> Value {
    let mut drill = score_entry_drill();
    if let Some(obj) = drill.as_object_mut() {
        obj.remove("prompt");
    }
    drill
}
