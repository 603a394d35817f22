use crate::AlertRule;
use farmsense_common::types::{AlertKind, AnimalRecord, Severity};

/// Fires once enough days have passed since insemination without the
/// animal returning to estrus.
pub struct PregnancyConfirmedRule {
    pub min_days_since_insemination: u32,
}

impl Default for PregnancyConfirmedRule {
    fn default() -> Self {
        Self {
            min_days_since_insemination: 45,
        }
    }
}

impl AlertRule for PregnancyConfirmedRule {
    fn kind(&self) -> AlertKind {
        AlertKind::PregnancyConfirmed
    }

    fn severity(&self) -> Severity {
        Severity::Success
    }

    fn evaluate(&self, record: &AnimalRecord, _critical_id: Option<&str>) -> Option<String> {
        let days = record.days_since_insemination?;
        let estrus = record.estrus_detected?;
        if days >= self.min_days_since_insemination && !estrus {
            Some(format!(
                "Pregnancy confirmed: {days} days since insemination without estrus"
            ))
        } else {
            None
        }
    }
}

/// Fires when estrus is detected again after insemination, which usually
/// means the insemination did not take.
pub struct PregnancyFailureRule {
    pub min_days_since_insemination: u32,
}

impl Default for PregnancyFailureRule {
    fn default() -> Self {
        Self {
            min_days_since_insemination: 21,
        }
    }
}

impl AlertRule for PregnancyFailureRule {
    fn kind(&self) -> AlertKind {
        AlertKind::PregnancyFailure
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn evaluate(&self, record: &AnimalRecord, _critical_id: Option<&str>) -> Option<String> {
        let days = record.days_since_insemination?;
        let estrus = record.estrus_detected?;
        if days >= self.min_days_since_insemination && estrus {
            Some(format!(
                "Pregnancy failure suspected: estrus detected {days} days after insemination"
            ))
        } else {
            None
        }
    }
}
