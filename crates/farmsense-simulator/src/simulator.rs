use crate::perturb::{perturb, SimulationParams};
use farmsense_common::types::{AnimalRecord, AnimalUpdate};
use farmsense_storage::{AnimalRepository, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A record the tick could not persist.
#[derive(Debug, Clone, PartialEq)]
pub struct TickFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of one simulation tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub updated: Vec<String>,
    pub stable: Vec<String>,
    /// Records with no known field to perturb.
    pub skipped: Vec<String>,
    pub failures: Vec<TickFailure>,
}

impl TickReport {
    pub fn total(&self) -> usize {
        self.updated.len() + self.stable.len() + self.skipped.len() + self.failures.len()
    }
}

/// Picks `min(count, records.len())` distinct ids uniformly at random.
pub fn choose_stable_ids<R: Rng + ?Sized>(
    records: &[AnimalRecord],
    count: usize,
    rng: &mut R,
) -> HashSet<String> {
    records
        .choose_multiple(rng, count.min(records.len()))
        .map(|r| r.id.clone())
        .collect()
}

pub struct Simulator {
    repo: Arc<dyn AnimalRepository>,
    params: SimulationParams,
    rng: Mutex<StdRng>,
}

impl Simulator {
    pub fn new(repo: Arc<dyn AnimalRepository>, params: SimulationParams) -> Self {
        Self {
            repo,
            params,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same as [`Simulator::new`] with a reproducible random sequence.
    pub fn with_seed(repo: Arc<dyn AnimalRepository>, params: SimulationParams, seed: u64) -> Self {
        Self {
            repo,
            params,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Runs one simulation step over every stored record.
    ///
    /// Listing the records is the only fallible step; a failed update is
    /// recorded in the report and the remaining records are still processed.
    pub async fn tick(&self) -> Result<TickReport> {
        let records = self.repo.list_animals().await?;
        let mut report = TickReport::default();

        let planned: Vec<(String, AnimalUpdate)> = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            let stable = choose_stable_ids(&records, self.params.stable_count, &mut *rng);
            let mut planned = Vec::with_capacity(records.len());
            for record in &records {
                if stable.contains(&record.id) {
                    report.stable.push(record.id.clone());
                    continue;
                }
                let update = perturb(record, &self.params, &mut *rng);
                if update.is_empty() {
                    report.skipped.push(record.id.clone());
                } else {
                    planned.push((record.id.clone(), update));
                }
            }
            planned
        };

        for (id, update) in planned {
            match self.repo.update_animal(&id, &update).await {
                Ok(_) => report.updated.push(id),
                Err(e) => {
                    tracing::warn!(animal_id = %id, error = %e, "Failed to persist simulated update");
                    report.failures.push(TickFailure {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            mode = %self.params.mode,
            updated = report.updated.len(),
            stable = report.stable.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Simulation tick complete"
        );
        Ok(report)
    }
}
