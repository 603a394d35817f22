use chrono::{DateTime, Duration, Utc};
use farmsense_common::types::AnimalRecord;
use rand::seq::SliceRandom;
use rand::Rng;

/// Vital-sign thresholds that make an animal a critical candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalThresholds {
    pub temperature_c: f64,
    pub heart_rate_bpm: f64,
}

impl Default for CriticalThresholds {
    fn default() -> Self {
        Self {
            temperature_c: 40.0,
            heart_rate_bpm: 100.0,
        }
    }
}

impl CriticalThresholds {
    /// An animal is eligible when either vital reaches its threshold.
    /// Unknown vitals never make an animal eligible.
    pub fn is_eligible(&self, record: &AnimalRecord) -> bool {
        record
            .temperature_c
            .is_some_and(|t| t >= self.temperature_c)
            || record
                .heart_rate_bpm
                .is_some_and(|hr| hr >= self.heart_rate_bpm)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    Holding {
        selected_id: String,
        since: DateTime<Utc>,
    },
}

/// Nominates at most one animal as critical and keeps that nomination for
/// `hold` regardless of how the animal's vitals move in the meantime.
///
/// The selector is plain state; callers share it behind a mutex so that
/// concurrent evaluations cannot pick different animals.
pub struct CriticalSelector {
    hold: Duration,
    thresholds: CriticalThresholds,
    state: SelectionState,
}

impl CriticalSelector {
    pub fn new(hold: Duration, thresholds: CriticalThresholds) -> Self {
        Self {
            hold,
            thresholds,
            state: SelectionState::Idle,
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn thresholds(&self) -> &CriticalThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Holding { selected_id, .. } => Some(selected_id),
        }
    }

    /// Runs one evaluation tick and returns the currently held id.
    ///
    /// While a hold is active nothing changes. Once it has expired (or when
    /// idle) a new animal is drawn uniformly from the eligible records; with
    /// no eligible record the selector goes idle.
    pub fn evaluate<R: Rng + ?Sized>(
        &mut self,
        records: &[AnimalRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<&str> {
        if let SelectionState::Holding { since, .. } = self.state {
            if now - since < self.hold {
                return self.selected_id();
            }
        }

        let eligible: Vec<&AnimalRecord> = records
            .iter()
            .filter(|r| self.thresholds.is_eligible(r))
            .collect();

        match eligible.choose(rng) {
            Some(chosen) => {
                tracing::info!(
                    animal_id = %chosen.id,
                    display_id = %chosen.display_id,
                    candidates = eligible.len(),
                    hold_secs = self.hold.num_seconds(),
                    "Critical animal selected"
                );
                self.state = SelectionState::Holding {
                    selected_id: chosen.id.clone(),
                    since: now,
                };
            }
            None => {
                if let SelectionState::Holding { selected_id, .. } = &self.state {
                    tracing::info!(animal_id = %selected_id, "Critical hold released");
                }
                self.state = SelectionState::Idle;
            }
        }

        self.selected_id()
    }
}
