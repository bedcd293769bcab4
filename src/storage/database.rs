//! Database Layer with Connection Pooling
//!
//! SQLite behind an r2d2 pool:
//! - WAL mode and busy timeout on every pooled connection
//! - Schema version recorded in `user_version`; newer files are refused
//! - Drill rows stored as opaque JSON payloads keyed by id and owner

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};

use crate::types::{DrillError, Result, ResultExt};

/// Shared database handle for async contexts.
pub type SharedDatabase = Arc<Database>;

const SCHEMA: &str = include_str!("schema.sql");

/// Schema version written to `PRAGMA user_version`
const SCHEMA_VERSION: u32 = 1;

/// A persisted drill row
#[derive(Debug, Clone)]
pub struct DrillRow {
    pub id: String,
    pub coach_id: String,
    pub drill_type: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_size: u32,
    pub min_idle: u32,
    /// Timeout for acquiring a connection (seconds)
    pub connection_timeout_secs: u64,
}

impl PoolConfig {
    const MIN_POOL_SIZE: u32 = 2;
    const MAX_POOL_SIZE: u32 = 16;

    /// clamp(cores * 2, MIN, MAX)
    pub fn optimal_pool_size() -> u32 {
        let cores = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(2);
        (cores * 2).clamp(Self::MIN_POOL_SIZE, Self::MAX_POOL_SIZE)
    }

    pub fn auto() -> Self {
        let max_size = Self::optimal_pool_size();
        Self {
            max_size,
            min_idle: (max_size / 4).max(1),
            connection_timeout_secs: 30,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::auto()
    }
}

/// Thread-safe database with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("Database")
            .field("connections", &state.connections)
            .field("idle", &state.idle_connections)
            .finish()
    }
}

impl Database {
    /// Open (or create) a database file and bring its schema up to date.
    /// `:memory:` opens a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref() == Path::new(":memory:") {
            return Self::open_in_memory();
        }
        Self::open_with_config(path, PoolConfig::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self> {
        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(Some(config.min_idle))
            .connection_timeout(std::time::Duration::from_secs(
                config.connection_timeout_secs,
            ))
            .build(manager)
            .map_err(|e| {
                DrillError::Persistence(format!("Failed to create connection pool: {}", e))
            })?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    /// In-memory database on a single pooled connection, so every caller
    /// sees the same data.
    pub fn open_in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())
            .map_err(|e| {
                DrillError::Persistence(format!("Failed to create in-memory pool: {}", e))
            })?;

        let db = Self { pool };
        db.initialize()?;
        Ok(db)
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA busy_timeout = 5000;
            "#,
        )
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            DrillError::Persistence(format!("Failed to acquire database connection: {}", e))
        })
    }

    fn initialize(&self) -> Result<()> {
        let conn = self.conn()?;
        let current_version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .with_context("Failed to read schema version")?;

        if current_version > SCHEMA_VERSION {
            return Err(DrillError::Persistence(format!(
                "Database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            )));
        }

        conn.execute_batch(SCHEMA)
            .with_context("Failed to initialize database schema")?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .with_context("Failed to set schema version")?;
        Ok(())
    }

    /// Schema version recorded in the database file
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.conn()?;
        let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version)
    }

    // =========================================================================
    // Drill rows
    // =========================================================================

    pub fn insert_drill(
        &self,
        id: &str,
        coach_id: &str,
        drill_type: &str,
        payload: &serde_json::Value,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let payload = serde_json::to_string(payload)?;

        self.conn()?
            .execute(
                "INSERT INTO drills (id, coach_id, drill_type, payload, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, coach_id, drill_type, payload, now],
            )
            .with_context("Failed to insert drill")?;

        tracing::debug!(id, coach_id, "Inserted drill");
        Ok(())
    }

    /// Update a drill owned by `coach_id`; returns the number of rows changed
    pub fn update_drill(
        &self,
        id: &str,
        coach_id: &str,
        drill_type: &str,
        payload: &serde_json::Value,
    ) -> Result<usize> {
        let now = chrono::Utc::now().to_rfc3339();
        let payload = serde_json::to_string(payload)?;

        let changed = self
            .conn()?
            .execute(
                "UPDATE drills SET drill_type = ?3, payload = ?4, updated_at = ?5
                 WHERE id = ?1 AND coach_id = ?2",
                params![id, coach_id, drill_type, payload, now],
            )
            .with_context("Failed to update drill")?;

        tracing::debug!(id, coach_id, changed, "Updated drill");
        Ok(changed)
    }

    pub fn get_drill(&self, id: &str) -> Result<Option<DrillRow>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, coach_id, drill_type, payload, created_at, updated_at
                 FROM drills WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .with_context("Failed to load drill")?;

        row.map(
            |(id, coach_id, drill_type, payload, created_at, updated_at)| -> Result<DrillRow> {
                Ok(DrillRow {
                    id,
                    coach_id,
                    drill_type,
                    payload: serde_json::from_str(&payload)?,
                    created_at,
                    updated_at,
                })
            },
        )
        .transpose()
    }

    /// Drills owned by `coach_id`, most recently updated first
    pub fn list_drills(&self, coach_id: &str) -> Result<Vec<DrillRow>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, coach_id, drill_type, payload, created_at, updated_at
                 FROM drills WHERE coach_id = ?1 ORDER BY updated_at DESC",
            )
            .with_context("Failed to prepare drill listing")?;

        let rows = stmt
            .query_map(params![coach_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .with_context("Failed to list drills")?;

        let mut drills = Vec::new();
        for row in rows {
            let (id, coach_id, drill_type, payload, created_at, updated_at) =
                row.with_context("Failed to read drill row")?;
            drills.push(DrillRow {
                id,
                coach_id,
                drill_type,
                payload: serde_json::from_str(&payload)?,
                created_at,
                updated_at,
            });
        }
        Ok(drills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();
        db.insert_drill("d1", "coach-a", "points", &json!({"title": "Ladder"}))
            .unwrap();

        let row = db.get_drill("d1").unwrap().unwrap();
        assert_eq!(row.coach_id, "coach-a");
        assert_eq!(row.drill_type.as_deref(), Some("points"));
        assert_eq!(row.payload["title"], "Ladder");
        assert_eq!(row.created_at, row.updated_at);
        assert!(db.get_drill("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_is_owner_scoped() {
        let db = Database::open_in_memory().unwrap();
        db.insert_drill("d1", "coach-a", "points", &json!({"v": 1}))
            .unwrap();

        let changed = db
            .update_drill("d1", "coach-b", "points", &json!({"v": 2}))
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(db.get_drill("d1").unwrap().unwrap().payload["v"], 1);

        let changed = db
            .update_drill("d1", "coach-a", "retry_entry", &json!({"v": 3}))
            .unwrap();
        assert_eq!(changed, 1);
        let row = db.get_drill("d1").unwrap().unwrap();
        assert_eq!(row.payload["v"], 3);
        assert_eq!(row.drill_type.as_deref(), Some("retry_entry"));
    }

    #[test]
    fn test_list_drills_by_owner() {
        let db = Database::open_in_memory().unwrap();
        db.insert_drill("d1", "coach-a", "points", &json!({})).unwrap();
        db.insert_drill("d2", "coach-b", "points", &json!({})).unwrap();
        db.insert_drill("d3", "coach-a", "points", &json!({})).unwrap();

        let ids: Vec<String> = db
            .list_drills("coach-a")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"d1".to_string()) && ids.contains(&"d3".to_string()));
    }

    #[test]
    fn test_file_database_persists_and_is_versioned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drills.db");

        {
            let db = Database::open(&path).unwrap();
            db.insert_drill("d1", "coach-a", "points", &json!({"x": 1}))
                .unwrap();
            assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        }

        let reopened = Database::open(&path).unwrap();
        assert!(reopened.get_drill("d1").unwrap().is_some());
    }

    #[test]
    fn test_refuses_newer_schema_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
                .unwrap();
        }

        let err = Database::open(&path).unwrap_err();
        assert!(matches!(err, DrillError::Persistence(ref msg) if msg.contains("newer")));
    }
}
