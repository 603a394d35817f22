//! Alert derivation for animal records.
//!
//! [`engine::AlertEngine`] runs an ordered list of [`AlertRule`]s against a
//! record; the order of the rules is the display order of the alerts.
//! [`critical::CriticalSelector`] nominates the one animal that carries the
//! critical-condition alert and holds that nomination for a fixed duration.

pub mod critical;
pub mod engine;
pub mod rules;


use farmsense_common::types::{AlertKind, AnimalRecord, Severity};

/// A rule that inspects one animal record and optionally produces an alert.
///
/// Rules are stateless; everything they need comes from the record and the
/// externally selected critical id. Fields a rule depends on that are
/// unknown (`None`) make the rule not fire.
pub trait AlertRule: Send + Sync {
    /// The kind of alert this rule produces.
    fn kind(&self) -> AlertKind;

    /// The severity assigned to alerts produced by this rule.
    fn severity(&self) -> Severity;

    /// Returns the alert message if the rule condition holds, `None` otherwise.
    fn evaluate(&self, record: &AnimalRecord, critical_id: Option<&str>) -> Option<String>;
}
