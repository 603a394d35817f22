use crate::perturb::{perturb, PerturbMode, SimulationParams, VitalBounds};
use crate::simulator::{choose_stable_ids, Simulator};
use async_trait::async_trait;
use chrono::Utc;
use farmsense_common::types::{AnimalRecord, AnimalUpdate, NewAnimal};
use farmsense_storage::{AnimalRepository, AnimalStore, Result, StorageError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// In-memory repository that can be told to reject updates for some ids.
#[derive(Default)]
struct MemoryRepo {
    records: Mutex<Vec<AnimalRecord>>,
    failing: HashSet<String>,
    fail_list: bool,
}

impl MemoryRepo {
    fn with_records(records: Vec<AnimalRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    fn snapshot(&self) -> Vec<AnimalRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnimalRepository for MemoryRepo {
    async fn list_animals(&self) -> Result<Vec<AnimalRecord>> {
        if self.fail_list {
            return Err(StorageError::Other("database unavailable".into()));
        }
        Ok(self.snapshot())
    }

    async fn get_animal(&self, id: &str) -> Result<Option<AnimalRecord>> {
        Ok(self.snapshot().into_iter().find(|r| r.id == id))
    }

    async fn find_by_display_id(&self, display_id: &str) -> Result<Option<AnimalRecord>> {
        Ok(self
            .snapshot()
            .into_iter()
            .find(|r| r.display_id == display_id))
    }

    async fn insert_animal(&self, _animal: &NewAnimal) -> Result<AnimalRecord> {
        Err(StorageError::Other("read-only".into()))
    }

    async fn update_animal(&self, id: &str, update: &AnimalUpdate) -> Result<AnimalRecord> {
        if self.failing.contains(id) {
            return Err(StorageError::Other(format!("write rejected for {id}")));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StorageError::NotFound {
                entity: "animal",
                id: id.to_string(),
            })?;
        if let Some(v) = update.temperature_c {
            record.temperature_c = Some(v);
        }
        if let Some(v) = update.heart_rate_bpm {
            record.heart_rate_bpm = Some(v);
        }
        if let Some(v) = update.respiration_bpm {
            record.respiration_bpm = Some(v);
        }
        if let Some(v) = update.milk_yield_liters {
            record.milk_yield_liters = Some(v);
        }
        if let Some(v) = update.estrus_detected {
            record.estrus_detected = Some(v);
        }
        if let Some(v) = update.days_since_insemination {
            record.days_since_insemination = Some(v);
        }
        if let Some(v) = update.postpartum_days {
            record.postpartum_days = Some(v);
        }
        record.last_updated = Utc::now();
        Ok(record.clone())
    }

    async fn count_animals(&self) -> Result<u64> {
        Ok(self.snapshot().len() as u64)
    }
}

fn animal(id: &str) -> AnimalRecord {
    AnimalRecord {
        id: id.to_string(),
        display_id: format!("C-{id}"),
        reproductive_stage: None,
        pregnancy_status: None,
        health_condition: None,
        activity_level: None,
        last_insemination_date: None,
        days_since_insemination: Some(20),
        postpartum_days: Some(3),
        temperature_c: Some(38.6),
        heart_rate_bpm: Some(70.0),
        respiration_bpm: Some(28.0),
        milk_yield_liters: Some(25.0),
        estrus_detected: Some(false),
        last_updated: Utc::now(),
    }
}

fn herd(n: usize) -> Vec<AnimalRecord> {
    (0..n).map(|i| animal(&i.to_string())).collect()
}

fn within(value: Option<f64>, (min, max): (f64, f64)) -> bool {
    value.map_or(true, |v| (min..=max).contains(&v))
}

fn full_params(stable_count: usize) -> SimulationParams {
    SimulationParams {
        mode: PerturbMode::Full,
        stable_count,
        ..Default::default()
    }
}

#[test]
fn narrow_mode_only_touches_temperature() {
    let mut rng = StdRng::seed_from_u64(42);
    let record = animal("1");
    let params = SimulationParams::default();

    for _ in 0..50 {
        let update = perturb(&record, &params, &mut rng);
        let t = update.temperature_c.unwrap();
        assert!((t - 38.6).abs() <= 0.3 + 1e-9, "step too large: {t}");
        assert_eq!(
            update,
            AnimalUpdate {
                temperature_c: Some(t),
                ..Default::default()
            }
        );
    }
}

#[test]
fn unknown_fields_stay_unknown() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut record = animal("1");
    record.temperature_c = None;
    record.milk_yield_liters = None;
    record.estrus_detected = None;
    record.postpartum_days = None;
    let params = SimulationParams {
        estrus_flip_probability: 1.0,
        day_increment_probability: 1.0,
        ..full_params(0)
    };

    let update = perturb(&record, &params, &mut rng);
    assert_eq!(update.temperature_c, None);
    assert_eq!(update.milk_yield_liters, None);
    assert_eq!(update.estrus_detected, None);
    assert_eq!(update.postpartum_days, None);
    assert!(update.heart_rate_bpm.is_some());
    assert_eq!(update.days_since_insemination, Some(21));

    let narrow = perturb(&record, &SimulationParams::default(), &mut rng);
    assert!(narrow.is_empty());
}

#[test]
fn full_mode_flips_and_increments_with_certainty() {
    let mut rng = StdRng::seed_from_u64(9);
    let record = animal("1");
    let params = SimulationParams {
        estrus_flip_probability: 1.0,
        day_increment_probability: 1.0,
        ..full_params(0)
    };

    let update = perturb(&record, &params, &mut rng);
    assert_eq!(update.estrus_detected, Some(true));
    assert_eq!(update.days_since_insemination, Some(21));
    assert_eq!(update.postpartum_days, Some(4));

    let never = SimulationParams {
        estrus_flip_probability: 0.0,
        day_increment_probability: 0.0,
        ..full_params(0)
    };
    let update = perturb(&record, &never, &mut rng);
    assert_eq!(update.estrus_detected, None);
    assert_eq!(update.days_since_insemination, None);
}

#[test]
fn non_finite_params_leave_values_unchanged() {
    let mut rng = StdRng::seed_from_u64(1);
    let record = animal("1");
    let params = SimulationParams {
        temperature_delta: f64::INFINITY,
        heart_rate_delta: f64::NAN,
        respiration_delta: f64::NEG_INFINITY,
        milk_delta: f64::NAN,
        estrus_flip_probability: f64::NAN,
        day_increment_probability: f64::NAN,
        ..full_params(0)
    };

    for _ in 0..20 {
        let update = perturb(&record, &params, &mut rng);
        assert_eq!(update.temperature_c, Some(38.6));
        assert_eq!(update.heart_rate_bpm, Some(70.0));
        assert_eq!(update.respiration_bpm, Some(28.0));
        assert_eq!(update.milk_yield_liters, Some(25.0));
        assert_eq!(update.estrus_detected, None);
        assert_eq!(update.days_since_insemination, None);
        assert_eq!(update.postpartum_days, None);
    }
}

#[test]
fn values_are_clamped_at_the_edges() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut record = animal("1");
    record.temperature_c = Some(42.0);
    record.heart_rate_bpm = Some(40.0);
    record.respiration_bpm = Some(40.0);
    record.milk_yield_liters = Some(0.0);
    let params = SimulationParams {
        temperature_delta: 5.0,
        heart_rate_delta: 50.0,
        respiration_delta: 20.0,
        milk_delta: 20.0,
        ..full_params(0)
    };

    for _ in 0..200 {
        let update = perturb(&record, &params, &mut rng);
        assert!(within(update.temperature_c, VitalBounds::TEMPERATURE_C));
        assert!(within(update.heart_rate_bpm, VitalBounds::HEART_RATE_BPM));
        assert!(within(update.respiration_bpm, VitalBounds::RESPIRATION_BPM));
        assert!(within(update.milk_yield_liters, VitalBounds::MILK_YIELD_LITERS));
    }
}

#[test]
fn stable_subset_is_bounded_by_herd_size() {
    let mut rng = StdRng::seed_from_u64(5);
    assert_eq!(choose_stable_ids(&herd(20), 7, &mut rng).len(), 7);
    assert_eq!(choose_stable_ids(&herd(4), 7, &mut rng).len(), 4);
    assert!(choose_stable_ids(&[], 7, &mut rng).is_empty());
}

#[tokio::test]
async fn tick_leaves_stable_subset_untouched() {
    let repo = Arc::new(MemoryRepo::with_records(herd(12)));
    let sim = Simulator::with_seed(repo.clone(), full_params(7), 17);
    let before = repo.snapshot();

    let report = sim.tick().await.unwrap();
    assert_eq!(report.stable.len(), 7);
    assert_eq!(report.updated.len(), 5);
    assert!(report.failures.is_empty());
    assert_eq!(report.total(), 12);

    let after = repo.snapshot();
    for id in &report.stable {
        let b = before.iter().find(|r| &r.id == id).unwrap();
        let a = after.iter().find(|r| &r.id == id).unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn stable_subset_is_rechosen_each_tick() {
    let repo = Arc::new(MemoryRepo::with_records(herd(30)));
    let sim = Simulator::with_seed(repo, full_params(7), 23);

    let mut seen = HashSet::new();
    for _ in 0..10 {
        let report = sim.tick().await.unwrap();
        seen.extend(report.stable);
    }
    assert!(seen.len() > 7);
}

#[tokio::test]
async fn values_stay_in_bounds_after_many_ticks() {
    let mut records = herd(10);
    records[0].temperature_c = Some(41.9);
    records[1].heart_rate_bpm = Some(119.0);
    records[2].milk_yield_liters = Some(0.5);
    records[3].respiration_bpm = Some(15.0);
    let repo = Arc::new(MemoryRepo::with_records(records));
    let sim = Simulator::with_seed(repo.clone(), full_params(2), 99);

    for _ in 0..500 {
        sim.tick().await.unwrap();
    }

    for r in repo.snapshot() {
        assert!(within(r.temperature_c, VitalBounds::TEMPERATURE_C), "{r:?}");
        assert!(within(r.heart_rate_bpm, VitalBounds::HEART_RATE_BPM), "{r:?}");
        assert!(within(r.respiration_bpm, VitalBounds::RESPIRATION_BPM), "{r:?}");
        assert!(within(r.milk_yield_liters, VitalBounds::MILK_YIELD_LITERS), "{r:?}");
    }
}

#[tokio::test]
async fn failed_updates_do_not_abort_the_tick() {
    let repo = Arc::new(MemoryRepo {
        records: Mutex::new(herd(6)),
        failing: HashSet::from(["2".to_string(), "4".to_string()]),
        fail_list: false,
    });
    let sim = Simulator::with_seed(repo, full_params(0), 7);

    let report = sim.tick().await.unwrap();
    let failed: HashSet<_> = report.failures.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(failed, HashSet::from(["2", "4"]));
    assert_eq!(report.updated.len(), 4);
    assert!(report.failures[0].error.contains("write rejected"));
}

#[tokio::test]
async fn failed_listing_fails_the_tick() {
    let repo = Arc::new(MemoryRepo {
        fail_list: true,
        ..Default::default()
    });
    let sim = Simulator::new(repo, SimulationParams::default());
    assert!(sim.tick().await.is_err());
}

#[tokio::test]
async fn tick_persists_through_sqlite_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("farmsense.db").display()
    );
    let store = Arc::new(AnimalStore::new(&db_url, dir.path()).await.unwrap());
    for i in 0..3 {
        store
            .insert_animal(&NewAnimal {
                display_id: format!("C-{i}"),
                temperature_c: Some(38.5),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    let before = store.list_animals().await.unwrap();

    let sim = Simulator::with_seed(store.clone(), SimulationParams::default(), 1);
    let report = sim.tick().await.unwrap();
    assert_eq!(report.stable.len(), 3);
    assert!(report.updated.is_empty());

    let params = SimulationParams {
        stable_count: 0,
        ..Default::default()
    };
    let sim = Simulator::with_seed(store.clone(), params, 1);
    let report = sim.tick().await.unwrap();
    assert_eq!(report.updated.len(), 3);

    for r in store.list_animals().await.unwrap() {
        let b = before.iter().find(|x| x.id == r.id).unwrap();
        assert!(r.last_updated >= b.last_updated);
        assert!((r.temperature_c.unwrap() - 38.5).abs() <= 0.3 + 1e-9);
    }
}
