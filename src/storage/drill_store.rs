//! Drill persistence behind an async trait.
//!
//! `update` is scoped to the owner: a drill that does not exist and a drill
//! owned by someone else are indistinguishable to the caller.

use std::sync::Arc;

use async_trait::async_trait;

use super::database::SharedDatabase;
use crate::drill::Drill;
use crate::types::{DrillError, Result};

#[async_trait]
pub trait DrillStore: Send + Sync {
    /// Insert a new drill and return its generated id
    async fn insert(&self, owner: &str, drill: &Drill) -> Result<String>;

    /// Replace the payload of an existing drill owned by `owner`
    async fn update(&self, id: &str, owner: &str, drill: &Drill) -> Result<()>;
}

pub type SharedStore = Arc<dyn DrillStore>;

/// SQLite-backed store; blocking work runs on the blocking thread pool
#[derive(Debug, Clone)]
pub struct SqliteDrillStore {
    db: SharedDatabase,
}

impl SqliteDrillStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &SharedDatabase {
        &self.db
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(SharedDatabase) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(db))
            .await
            .map_err(|e| DrillError::Persistence(format!("Storage task failed: {}", e)))?
    }
}

#[async_trait]
impl DrillStore for SqliteDrillStore {
    async fn insert(&self, owner: &str, drill: &Drill) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let owner = owner.to_string();
        let drill_type = drill.drill_type().as_str();
        let payload = serde_json::to_value(drill)?;

        let saved_id = id.clone();
        self.run_blocking(move |db| db.insert_drill(&saved_id, &owner, drill_type, &payload))
            .await?;
        Ok(id)
    }

    async fn update(&self, id: &str, owner: &str, drill: &Drill) -> Result<()> {
        let id = id.to_string();
        let owner = owner.to_string();
        let drill_type = drill.drill_type().as_str();
        let payload = serde_json::to_value(drill)?;

        let changed = self
            .run_blocking({
                let id = id.clone();
                move |db| db.update_drill(&id, &owner, drill_type, &payload)
            })
            .await?;

        if changed == 0 {
            return Err(DrillError::Persistence(format!(
                "Drill {} not found or not owned by caller",
                id
            )));
        }
        Ok(())
    }
}
