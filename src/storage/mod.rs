pub mod database;
pub mod drill_store;

pub use database::{Database, DrillRow, PoolConfig, SharedDatabase};
pub use drill_store::{DrillStore, SharedStore, SqliteDrillStore};
