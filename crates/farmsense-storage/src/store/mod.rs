use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;

use crate::error::Result;
use ids::AnimalIdGenerator;

pub mod animal;
mod ids;

/// Attempts made to find an unused id before an insert gives up.
const MAX_ID_ATTEMPTS: usize = 8;

/// SeaORM-backed animal store.
pub struct AnimalStore {
    pub(crate) db: DatabaseConnection,
    ids: AnimalIdGenerator,
}

impl AnimalStore {
    /// Connects to the database and brings the schema up to date.
    ///
    /// - `db_url`: full connection URL, e.g. `sqlite:///data/farmsense.db?mode=rwc`
    /// - `data_dir`: local data directory, created if missing
    pub async fn new(db_url: &str, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let db = Database::connect(db_url).await?;

        if db_url.starts_with("sqlite:") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None).await?;

        tracing::info!(db_url = %db_url, "Initialized animal store");

        Ok(Self {
            db,
            ids: AnimalIdGenerator::new(1, 1),
        })
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
