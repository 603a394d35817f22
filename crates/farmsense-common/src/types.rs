use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current vital and reproductive state of one animal.
///
/// Every optional field models "unknown": alert rules that depend on an
/// unknown field simply do not fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnimalRecord {
    /// Stable identifier assigned at creation
    pub id: String,
    /// Ear tag shown to farm staff
    pub display_id: String,
    #[serde(default)]
    pub reproductive_stage: Option<String>,
    #[serde(default)]
    pub pregnancy_status: Option<String>,
    #[serde(default)]
    pub health_condition: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub last_insemination_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_since_insemination: Option<u32>,
    #[serde(default)]
    pub postpartum_days: Option<u32>,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub heart_rate_bpm: Option<f64>,
    #[serde(default)]
    pub respiration_bpm: Option<f64>,
    #[serde(default)]
    pub milk_yield_liters: Option<f64>,
    #[serde(default)]
    pub estrus_detected: Option<bool>,
    pub last_updated: DateTime<Utc>,
}

/// Fields for a new animal. The store assigns `id` and `last_updated`.
///
/// The aliases accept the column names used by the legacy herd export
/// (`cow_id`, `last_ai_date`, `days_since_ai`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewAnimal {
    #[serde(alias = "cow_id")]
    pub display_id: String,
    #[serde(default)]
    pub reproductive_stage: Option<String>,
    #[serde(default)]
    pub pregnancy_status: Option<String>,
    #[serde(default)]
    pub health_condition: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default, alias = "last_ai_date")]
    pub last_insemination_date: Option<NaiveDate>,
    #[serde(default, alias = "days_since_ai")]
    pub days_since_insemination: Option<u32>,
    #[serde(default)]
    pub postpartum_days: Option<u32>,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub heart_rate_bpm: Option<f64>,
    #[serde(default)]
    pub respiration_bpm: Option<f64>,
    #[serde(default)]
    pub milk_yield_liters: Option<f64>,
    #[serde(default)]
    pub estrus_detected: Option<bool>,
}

/// Partial update of an animal record. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalUpdate {
    pub reproductive_stage: Option<String>,
    pub pregnancy_status: Option<String>,
    pub health_condition: Option<String>,
    pub activity_level: Option<String>,
    pub last_insemination_date: Option<NaiveDate>,
    pub days_since_insemination: Option<u32>,
    pub postpartum_days: Option<u32>,
    pub temperature_c: Option<f64>,
    pub heart_rate_bpm: Option<f64>,
    pub respiration_bpm: Option<f64>,
    pub milk_yield_liters: Option<f64>,
    pub estrus_detected: Option<bool>,
}

impl AnimalUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Alert severity, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use farmsense_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Danger > Severity::Info);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Danger => write!(f, "danger"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Severity::Success),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "danger" => Ok(Severity::Danger),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// The fixed set of alerts the rule engine can derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PregnancyConfirmed,
    CriticalCondition,
    PostpartumStage,
    PostpartumInfection,
    PregnancyFailure,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::PregnancyConfirmed => "pregnancy_confirmed",
            AlertKind::CriticalCondition => "critical_condition",
            AlertKind::PostpartumStage => "postpartum_stage",
            AlertKind::PostpartumInfection => "postpartum_infection",
            AlertKind::PregnancyFailure => "pregnancy_failure",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
}

/// Display label for the most severe alert an animal carries.
///
/// # Examples
///
/// ```
/// use farmsense_common::types::{Alert, AlertKind, AlertLevel, Severity};
///
/// let alerts = vec![
///     Alert { kind: AlertKind::PostpartumStage, message: "postpartum".into(), severity: Severity::Info },
///     Alert { kind: AlertKind::PregnancyFailure, message: "failure".into(), severity: Severity::Warning },
/// ];
/// assert_eq!(AlertLevel::from_alerts(&alerts), AlertLevel::Warning);
/// assert_eq!(AlertLevel::from_alerts(&[]).label(), "Normal");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum AlertLevel {
    Normal,
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        alerts
            .iter()
            .map(|a| a.severity)
            .max()
            .map(Self::from)
            .unwrap_or(AlertLevel::Normal)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "Normal",
            AlertLevel::Info => "Info",
            AlertLevel::Warning => "Warning",
            AlertLevel::Critical => "Critical",
        }
    }
}

impl From<Severity> for AlertLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => AlertLevel::Normal,
            Severity::Info => AlertLevel::Info,
            Severity::Warning => AlertLevel::Warning,
            Severity::Danger => AlertLevel::Critical,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An animal record as served by the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrichedAnimal {
    #[serde(flatten)]
    pub record: AnimalRecord,
    pub alerts: Vec<Alert>,
    pub is_critical: bool,
    pub alert_level: AlertLevel,
}

impl EnrichedAnimal {
    pub fn new(record: AnimalRecord, alerts: Vec<Alert>, is_critical: bool) -> Self {
        let alert_level = AlertLevel::from_alerts(&alerts);
        Self {
            record,
            alerts,
            is_critical,
            alert_level,
        }
    }
}
