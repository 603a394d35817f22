use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_id: String,
    pub reproductive_stage: Option<String>,
    pub pregnancy_status: Option<String>,
    pub health_condition: Option<String>,
    pub activity_level: Option<String>,
    pub last_insemination_date: Option<Date>,
    pub days_since_insemination: Option<i64>,
    pub postpartum_days: Option<i64>,
    pub temperature_c: Option<f64>,
    pub heart_rate_bpm: Option<f64>,
    pub respiration_bpm: Option<f64>,
    pub milk_yield_liters: Option<f64>,
    pub estrus_detected: Option<bool>,
    pub created_at: DateTimeWithTimeZone,
    pub last_updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
