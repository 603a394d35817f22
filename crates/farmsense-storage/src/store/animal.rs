use async_trait::async_trait;
use chrono::Utc;
use farmsense_common::types::{AnimalRecord, AnimalUpdate, NewAnimal};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr,
};

use crate::entities::animal::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::{AnimalStore, MAX_ID_ATTEMPTS};
use crate::AnimalRepository;

fn to_record(m: animal::Model) -> AnimalRecord {
    AnimalRecord {
        id: m.id,
        display_id: m.display_id,
        reproductive_stage: m.reproductive_stage,
        pregnancy_status: m.pregnancy_status,
        health_condition: m.health_condition,
        activity_level: m.activity_level,
        last_insemination_date: m.last_insemination_date,
        // Negative counters in legacy rows are treated as unknown
        days_since_insemination: m
            .days_since_insemination
            .and_then(|v| u32::try_from(v).ok()),
        postpartum_days: m.postpartum_days.and_then(|v| u32::try_from(v).ok()),
        temperature_c: m.temperature_c,
        heart_rate_bpm: m.heart_rate_bpm,
        respiration_bpm: m.respiration_bpm,
        milk_yield_liters: m.milk_yield_liters,
        estrus_detected: m.estrus_detected,
        last_updated: m.last_updated.with_timezone(&Utc),
    }
}

fn not_found(id: &str) -> StorageError {
    StorageError::NotFound {
        entity: "animal",
        id: id.to_string(),
    }
}

#[async_trait]
impl AnimalRepository for AnimalStore {
    async fn list_animals(&self) -> Result<Vec<AnimalRecord>> {
        let rows = Entity::find()
            .order_by_asc(Column::DisplayId)
            .order_by_asc(Column::Id)
            .all(self.db())
            .await?;
        Ok(rows.into_iter().map(to_record).collect())
    }

    async fn get_animal(&self, id: &str) -> Result<Option<AnimalRecord>> {
        let model = Entity::find_by_id(id.to_owned()).one(self.db()).await?;
        Ok(model.map(to_record))
    }

    async fn find_by_display_id(&self, display_id: &str) -> Result<Option<AnimalRecord>> {
        let model = Entity::find()
            .filter(Column::DisplayId.eq(display_id))
            .order_by_asc(Column::Id)
            .one(self.db())
            .await?;
        Ok(model.map(to_record))
    }

    async fn insert_animal(&self, animal: &NewAnimal) -> Result<AnimalRecord> {
        let now = Utc::now().fixed_offset();
        let mut am = animal::ActiveModel {
            id: Set(self.ids.next_id()),
            display_id: Set(animal.display_id.clone()),
            reproductive_stage: Set(animal.reproductive_stage.clone()),
            pregnancy_status: Set(animal.pregnancy_status.clone()),
            health_condition: Set(animal.health_condition.clone()),
            activity_level: Set(animal.activity_level.clone()),
            last_insemination_date: Set(animal.last_insemination_date),
            days_since_insemination: Set(animal.days_since_insemination.map(i64::from)),
            postpartum_days: Set(animal.postpartum_days.map(i64::from)),
            temperature_c: Set(animal.temperature_c),
            heart_rate_bpm: Set(animal.heart_rate_bpm),
            respiration_bpm: Set(animal.respiration_bpm),
            milk_yield_liters: Set(animal.milk_yield_liters),
            estrus_detected: Set(animal.estrus_detected),
            created_at: Set(now),
            last_updated: Set(now),
        };

        // A restarted store can reissue an id already on disk; draw again.
        for attempt in 1..=MAX_ID_ATTEMPTS {
            match am.clone().insert(self.db()).await {
                Ok(model) => return Ok(to_record(model)),
                Err(e)
                    if attempt < MAX_ID_ATTEMPTS
                        && matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    tracing::debug!(attempt, "Animal id already taken, drawing a new one");
                    am.id = Set(self.ids.next_id());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorageError::Other(
            "could not assign a unique animal id".to_string(),
        ))
    }

    async fn update_animal(&self, id: &str, update: &AnimalUpdate) -> Result<AnimalRecord> {
        let model = Entity::find_by_id(id.to_owned())
            .one(self.db())
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut am: animal::ActiveModel = model.into();
        if let Some(ref v) = update.reproductive_stage {
            am.reproductive_stage = Set(Some(v.clone()));
        }
        if let Some(ref v) = update.pregnancy_status {
            am.pregnancy_status = Set(Some(v.clone()));
        }
        if let Some(ref v) = update.health_condition {
            am.health_condition = Set(Some(v.clone()));
        }
        if let Some(ref v) = update.activity_level {
            am.activity_level = Set(Some(v.clone()));
        }
        if let Some(v) = update.last_insemination_date {
            am.last_insemination_date = Set(Some(v));
        }
        if let Some(v) = update.days_since_insemination {
            am.days_since_insemination = Set(Some(i64::from(v)));
        }
        if let Some(v) = update.postpartum_days {
            am.postpartum_days = Set(Some(i64::from(v)));
        }
        if let Some(v) = update.temperature_c {
            am.temperature_c = Set(Some(v));
        }
        if let Some(v) = update.heart_rate_bpm {
            am.heart_rate_bpm = Set(Some(v));
        }
        if let Some(v) = update.respiration_bpm {
            am.respiration_bpm = Set(Some(v));
        }
        if let Some(v) = update.milk_yield_liters {
            am.milk_yield_liters = Set(Some(v));
        }
        if let Some(v) = update.estrus_detected {
            am.estrus_detected = Set(Some(v));
        }
        am.last_updated = Set(Utc::now().fixed_offset());

        // Single-row UPDATE: readers see either the old or the new record.
        match am.update(self.db()).await {
            Ok(model) => Ok(to_record(model)),
            Err(DbErr::RecordNotUpdated) => Err(not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn count_animals(&self) -> Result<u64> {
        Ok(Entity::find().count(self.db()).await?)
    }
}
