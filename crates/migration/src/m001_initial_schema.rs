use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_initial_schema"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

const UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS animals (
    id TEXT PRIMARY KEY NOT NULL,
    display_id TEXT NOT NULL,
    reproductive_stage TEXT,
    pregnancy_status TEXT,
    health_condition TEXT,
    activity_level TEXT,
    last_insemination_date TEXT,
    days_since_insemination INTEGER,
    postpartum_days INTEGER,
    temperature_c REAL,
    heart_rate_bpm REAL,
    respiration_bpm REAL,
    milk_yield_liters REAL,
    estrus_detected INTEGER,
    created_at TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_animals_display_id ON animals(display_id);
";

const DOWN_SQL: &str = "
DROP INDEX IF EXISTS idx_animals_display_id;
DROP TABLE IF EXISTS animals;
";
