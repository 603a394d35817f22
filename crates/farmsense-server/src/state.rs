use crate::config::ServerConfig;
use chrono::{DateTime, Utc};
use farmsense_alert::critical::CriticalSelector;
use farmsense_alert::engine::AlertEngine;
use farmsense_common::types::AnimalRecord;
use farmsense_storage::AnimalRepository;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnimalRepository>,
    pub alert_engine: Arc<AlertEngine>,
    pub selector: Arc<Mutex<CriticalSelector>>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnimalRepository>, config: ServerConfig) -> Self {
        let selector = CriticalSelector::new(config.critical.hold(), config.critical.thresholds());
        Self {
            store,
            alert_engine: Arc::new(AlertEngine::standard()),
            selector: Arc::new(Mutex::new(selector)),
            start_time: Utc::now(),
            config: Arc::new(config),
        }
    }

    /// Runs one selector evaluation over `records` and returns the held id.
    pub fn evaluate_critical(&self, records: &[AnimalRecord]) -> Option<String> {
        let mut selector = self
            .selector
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        selector
            .evaluate(records, Utc::now(), &mut rand::thread_rng())
            .map(str::to_owned)
    }

    /// The currently held id, without re-evaluating.
    pub fn current_critical(&self) -> Option<String> {
        self.selector
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .selected_id()
            .map(str::to_owned)
    }
}
