use crate::AlertRule;
use farmsense_common::types::{AlertKind, AnimalRecord, Severity};

/// Marks animals that have delivered and are in their postpartum period.
pub struct PostpartumStageRule {
    /// Pregnancy status value meaning the animal has given birth,
    /// compared case-insensitively.
    pub delivered_status: String,
}

impl Default for PostpartumStageRule {
    fn default() -> Self {
        Self {
            delivered_status: "delivered".to_string(),
        }
    }
}

impl AlertRule for PostpartumStageRule {
    fn kind(&self) -> AlertKind {
        AlertKind::PostpartumStage
    }

    fn severity(&self) -> Severity {
        Severity::Info
    }

    fn evaluate(&self, record: &AnimalRecord, _critical_id: Option<&str>) -> Option<String> {
        let status = record.pregnancy_status.as_deref()?;
        let days = record.postpartum_days?;
        if status.trim().eq_ignore_ascii_case(&self.delivered_status) {
            Some(format!("Postpartum stage: day {days} after delivery"))
        } else {
            None
        }
    }
}

/// Fever early in the postpartum period points to a uterine infection.
pub struct PostpartumInfectionRule {
    pub max_postpartum_days: u32,
    pub fever_temperature_c: f64,
}

impl Default for PostpartumInfectionRule {
    fn default() -> Self {
        Self {
            max_postpartum_days: 10,
            fever_temperature_c: 40.0,
        }
    }
}

impl AlertRule for PostpartumInfectionRule {
    fn kind(&self) -> AlertKind {
        AlertKind::PostpartumInfection
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn evaluate(&self, record: &AnimalRecord, _critical_id: Option<&str>) -> Option<String> {
        let days = record.postpartum_days?;
        let temperature = record.temperature_c?;
        if days <= self.max_postpartum_days && temperature >= self.fever_temperature_c {
            Some(format!(
                "Postpartum infection suspected: {temperature:.1}°C on postpartum day {days}"
            ))
        } else {
            None
        }
    }
}
