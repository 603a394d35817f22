use farmsense_alert::critical::CriticalThresholds;
use farmsense_common::types::NewAnimal;
use farmsense_simulator::{PerturbMode, SimulationParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub critical: CriticalConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            database: DatabaseConfig::default(),
            simulation: SimulationConfig::default(),
            critical: CriticalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full SeaORM connection URL. When unset, a SQLite file inside
    /// `data_dir` is used.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            data_dir: default_data_dir(),
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => format!(
                "sqlite://{}?mode=rwc",
                std::path::Path::new(&self.data_dir)
                    .join("farmsense.db")
                    .display()
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_simulation_enabled")]
    pub enabled: bool,
    #[serde(default = "default_simulation_tick_secs")]
    pub tick_secs: u64,
    #[serde(default)]
    pub mode: PerturbMode,
    #[serde(default = "default_stable_count")]
    pub stable_count: usize,
    /// Largest per-tick temperature change, in °C.
    #[serde(default = "default_temperature_delta")]
    pub temperature_delta: f64,
    #[serde(default = "default_heart_rate_delta")]
    pub heart_rate_delta: f64,
    #[serde(default = "default_respiration_delta")]
    pub respiration_delta: f64,
    #[serde(default = "default_milk_delta")]
    pub milk_delta: f64,
    #[serde(default = "default_estrus_flip_probability")]
    pub estrus_flip_probability: f64,
    #[serde(default = "default_day_increment_probability")]
    pub day_increment_probability: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: default_simulation_enabled(),
            tick_secs: default_simulation_tick_secs(),
            mode: PerturbMode::default(),
            stable_count: default_stable_count(),
            temperature_delta: default_temperature_delta(),
            heart_rate_delta: default_heart_rate_delta(),
            respiration_delta: default_respiration_delta(),
            milk_delta: default_milk_delta(),
            estrus_flip_probability: default_estrus_flip_probability(),
            day_increment_probability: default_day_increment_probability(),
        }
    }
}

impl SimulationConfig {
    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            mode: self.mode,
            stable_count: self.stable_count,
            temperature_delta: self.temperature_delta,
            heart_rate_delta: self.heart_rate_delta,
            respiration_delta: self.respiration_delta,
            milk_delta: self.milk_delta,
            estrus_flip_probability: self.estrus_flip_probability,
            day_increment_probability: self.day_increment_probability,
        }
    }

    /// Rejects deltas and probabilities the simulator cannot use.
    pub fn validate(&self) -> anyhow::Result<()> {
        let deltas = [
            ("temperature_delta", self.temperature_delta),
            ("heart_rate_delta", self.heart_rate_delta),
            ("respiration_delta", self.respiration_delta),
            ("milk_delta", self.milk_delta),
        ];
        for (name, value) in deltas {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("simulation.{name} must be a finite, non-negative number, got {value}");
            }
        }

        let probabilities = [
            ("estrus_flip_probability", self.estrus_flip_probability),
            ("day_increment_probability", self.day_increment_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("simulation.{name} must be between 0 and 1, got {value}");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalConfig {
    /// How long a nominated animal stays critical, in seconds.
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
    #[serde(default = "default_critical_temperature_c")]
    pub temperature_c: f64,
    #[serde(default = "default_critical_heart_rate_bpm")]
    pub heart_rate_bpm: f64,
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self {
            hold_secs: default_hold_secs(),
            temperature_c: default_critical_temperature_c(),
            heart_rate_bpm: default_critical_heart_rate_bpm(),
        }
    }
}

impl CriticalConfig {
    pub fn hold(&self) -> chrono::Duration {
        let secs = i64::try_from(self.hold_secs).unwrap_or(i64::MAX);
        chrono::Duration::seconds(secs.min(i64::MAX / 1000))
    }

    pub fn thresholds(&self) -> CriticalThresholds {
        CriticalThresholds {
            temperature_c: self.temperature_c,
            heart_rate_bpm: self.heart_rate_bpm,
        }
    }
}

// ---- Seed file types (used by `init-animals` CLI subcommand) ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalsSeedFile {
    #[serde(default)]
    pub animals: Vec<NewAnimal>,
}

fn default_http_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_simulation_enabled() -> bool {
    true
}

fn default_simulation_tick_secs() -> u64 {
    5
}

fn default_stable_count() -> usize {
    7
}

fn default_temperature_delta() -> f64 {
    0.3
}

fn default_heart_rate_delta() -> f64 {
    5.0
}

fn default_respiration_delta() -> f64 {
    2.0
}

fn default_milk_delta() -> f64 {
    1.0
}

fn default_estrus_flip_probability() -> f64 {
    0.05
}

fn default_day_increment_probability() -> f64 {
    0.10
}

fn default_hold_secs() -> u64 {
    60
}

fn default_critical_temperature_c() -> f64 {
    40.0
}

fn default_critical_heart_rate_bpm() -> f64 {
    100.0
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.simulation.validate()?;
        Ok(config)
    }
}
