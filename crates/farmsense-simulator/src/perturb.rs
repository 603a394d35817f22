use farmsense_common::types::{AnimalRecord, AnimalUpdate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which fields a simulation step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerturbMode {
    /// Temperature only.
    #[default]
    Narrow,
    /// All vitals, estrus flag and day counters.
    Full,
}

impl std::fmt::Display for PerturbMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PerturbMode::Narrow => write!(f, "narrow"),
            PerturbMode::Full => write!(f, "full"),
        }
    }
}

impl std::str::FromStr for PerturbMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "narrow" => Ok(PerturbMode::Narrow),
            "full" => Ok(PerturbMode::Full),
            _ => Err(format!("unknown simulation mode: {s}")),
        }
    }
}

/// Physiological range a simulated vital is clamped to.
pub struct VitalBounds;

impl VitalBounds {
    pub const TEMPERATURE_C: (f64, f64) = (36.5, 42.0);
    pub const HEART_RATE_BPM: (f64, f64) = (40.0, 120.0);
    pub const RESPIRATION_BPM: (f64, f64) = (15.0, 40.0);
    pub const MILK_YIELD_LITERS: (f64, f64) = (0.0, 50.0);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub mode: PerturbMode,
    /// Number of records left untouched each tick.
    pub stable_count: usize,
    pub temperature_delta: f64,
    pub heart_rate_delta: f64,
    pub respiration_delta: f64,
    pub milk_delta: f64,
    pub estrus_flip_probability: f64,
    pub day_increment_probability: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            mode: PerturbMode::Narrow,
            stable_count: 7,
            temperature_delta: 0.3,
            heart_rate_delta: 5.0,
            respiration_delta: 2.0,
            milk_delta: 1.0,
            estrus_flip_probability: 0.05,
            day_increment_probability: 0.10,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn step<R: Rng + ?Sized>(
    current: f64,
    delta: f64,
    (min, max): (f64, f64),
    decimals: i32,
    rng: &mut R,
) -> f64 {
    let change = if delta.is_finite() && delta > 0.0 {
        rng.gen_range(-delta..=delta)
    } else {
        0.0
    };
    round_to(current + change, decimals).clamp(min, max)
}

fn chance<R: Rng + ?Sized>(p: f64, rng: &mut R) -> bool {
    // NaN never fires
    if p.is_nan() {
        return false;
    }
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Computes one random step for `record`.
///
/// Only known fields are touched; an unknown field stays unknown. The
/// returned update holds just the fields that were stepped.
pub fn perturb<R: Rng + ?Sized>(
    record: &AnimalRecord,
    params: &SimulationParams,
    rng: &mut R,
) -> AnimalUpdate {
    let mut update = AnimalUpdate {
        temperature_c: record.temperature_c.map(|t| {
            step(
                t,
                params.temperature_delta,
                VitalBounds::TEMPERATURE_C,
                1,
                rng,
            )
        }),
        ..Default::default()
    };

    if params.mode == PerturbMode::Narrow {
        return update;
    }

    update.heart_rate_bpm = record
        .heart_rate_bpm
        .map(|hr| step(hr, params.heart_rate_delta, VitalBounds::HEART_RATE_BPM, 0, rng));
    update.respiration_bpm = record.respiration_bpm.map(|rr| {
        step(
            rr,
            params.respiration_delta,
            VitalBounds::RESPIRATION_BPM,
            0,
            rng,
        )
    });
    update.milk_yield_liters = record
        .milk_yield_liters
        .map(|m| step(m, params.milk_delta, VitalBounds::MILK_YIELD_LITERS, 1, rng));

    if let Some(estrus) = record.estrus_detected {
        if chance(params.estrus_flip_probability, rng) {
            update.estrus_detected = Some(!estrus);
        }
    }
    if let Some(days) = record.days_since_insemination {
        if chance(params.day_increment_probability, rng) {
            update.days_since_insemination = Some(days.saturating_add(1));
        }
    }
    if let Some(days) = record.postpartum_days {
        if chance(params.day_increment_probability, rng) {
            update.postpartum_days = Some(days.saturating_add(1));
        }
    }

    update
}
