use crate::AlertRule;
use farmsense_common::types::{AlertKind, AnimalRecord, Severity};

/// Fires only for the animal currently held by the critical selector.
///
/// The record's own vitals are not consulted: the selector decides, and its
/// hold keeps the alert stable while the vitals fluctuate.
pub struct CriticalConditionRule;

impl AlertRule for CriticalConditionRule {
    fn kind(&self) -> AlertKind {
        AlertKind::CriticalCondition
    }

    fn severity(&self) -> Severity {
        Severity::Danger
    }

    fn evaluate(&self, record: &AnimalRecord, critical_id: Option<&str>) -> Option<String> {
        if critical_id? == record.id {
            Some("Critical condition: immediate veterinary attention required".to_string())
        } else {
            None
        }
    }
}
