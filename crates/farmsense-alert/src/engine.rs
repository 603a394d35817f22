use crate::rules::critical_condition::CriticalConditionRule;
use crate::rules::postpartum::{PostpartumInfectionRule, PostpartumStageRule};
use crate::rules::pregnancy::{PregnancyConfirmedRule, PregnancyFailureRule};
use crate::AlertRule;
use farmsense_common::types::{Alert, AlertKind, AnimalRecord, EnrichedAnimal};

pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl AlertEngine {
    pub fn new(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    /// The built-in rule set, in display order.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(PregnancyConfirmedRule::default()),
            Box::new(CriticalConditionRule),
            Box::new(PostpartumStageRule::default()),
            Box::new(PostpartumInfectionRule::default()),
            Box::new(PregnancyFailureRule::default()),
        ])
    }

    pub fn rules(&self) -> &[Box<dyn AlertRule>] {
        &self.rules
    }

    /// Get a rule by the kind of alert it produces.
    pub fn get_rule(&self, kind: AlertKind) -> Option<&dyn AlertRule> {
        self.rules
            .iter()
            .find(|r| r.kind() == kind)
            .map(|r| r.as_ref())
    }

    /// Evaluates every rule against `record`. Rules are independent; the
    /// output follows rule registration order.
    pub fn derive_alerts(&self, record: &AnimalRecord, critical_id: Option<&str>) -> Vec<Alert> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(record, critical_id).map(|message| Alert {
                    kind: rule.kind(),
                    message,
                    severity: rule.severity(),
                })
            })
            .collect()
    }

    /// Attaches derived alerts and the critical flag to a record.
    pub fn enrich(&self, record: AnimalRecord, critical_id: Option<&str>) -> EnrichedAnimal {
        let alerts = self.derive_alerts(&record, critical_id);
        let is_critical = critical_id == Some(record.id.as_str());
        EnrichedAnimal::new(record, alerts, is_critical)
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::standard()
    }
}
