#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use farmsense_common::types::{AnimalRecord, AnimalUpdate, NewAnimal};
use farmsense_server::app;
use farmsense_server::config::{DatabaseConfig, ServerConfig};
use farmsense_server::state::AppState;
use farmsense_storage::{AnimalRepository, AnimalStore, StorageError};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub store: Arc<AnimalStore>,
    pub state: AppState,
    pub app: axum::Router,
}

pub async fn build_test_context() -> Result<TestContext> {
    build_test_context_with(ServerConfig::default()).await
}

pub async fn build_test_context_with(mut config: ServerConfig) -> Result<TestContext> {
    let temp_dir = tempfile::tempdir()?;
    config.database = DatabaseConfig {
        url: None,
        data_dir: temp_dir.path().to_string_lossy().to_string(),
    };
    config.simulation.enabled = false;

    let store = Arc::new(
        AnimalStore::new(&config.database.connection_url(), temp_dir.path()).await?,
    );
    let state = AppState::new(store.clone(), config);
    let app = app::build_http_app(state.clone());

    Ok(TestContext {
        temp_dir,
        store,
        state,
        app,
    })
}

/// Repository whose every call fails, for exercising error paths.
pub struct FailingRepo;

fn unavailable() -> StorageError {
    StorageError::Other("database unavailable".to_string())
}

#[async_trait]
impl AnimalRepository for FailingRepo {
    async fn list_animals(&self) -> farmsense_storage::Result<Vec<AnimalRecord>> {
        Err(unavailable())
    }

    async fn get_animal(&self, _id: &str) -> farmsense_storage::Result<Option<AnimalRecord>> {
        Err(unavailable())
    }

    async fn find_by_display_id(
        &self,
        _display_id: &str,
    ) -> farmsense_storage::Result<Option<AnimalRecord>> {
        Err(unavailable())
    }

    async fn insert_animal(&self, _animal: &NewAnimal) -> farmsense_storage::Result<AnimalRecord> {
        Err(unavailable())
    }

    async fn update_animal(
        &self,
        _id: &str,
        _update: &AnimalUpdate,
    ) -> farmsense_storage::Result<AnimalRecord> {
        Err(unavailable())
    }

    async fn count_animals(&self) -> farmsense_storage::Result<u64> {
        Err(unavailable())
    }
}

pub fn build_failing_app() -> axum::Router {
    let state = AppState::new(Arc::new(FailingRepo), ServerConfig::default());
    app::build_http_app(state)
}

pub async fn request_no_body(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, Value, Option<String>) {
    let (status, bytes, trace_id) = request_raw(app, method, uri).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(bytes.as_bytes())
            .unwrap_or_else(|_| Value::String(bytes.clone()))
    };
    (status, json, trace_id)
}

pub async fn request_raw(
    app: &axum::Router,
    method: &str,
    uri: &str,
) -> (StatusCode, String, Option<String>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("request should be handled");
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");

    (
        status,
        String::from_utf8_lossy(&bytes).to_string(),
        trace_id,
    )
}

pub async fn insert(store: &AnimalStore, animal: NewAnimal) -> AnimalRecord {
    store
        .insert_animal(&animal)
        .await
        .expect("animal should insert")
}

pub fn find<'a>(list: &'a Value, display_id: &str) -> &'a Value {
    list.as_array()
        .expect("list should be an array")
        .iter()
        .find(|a| a["display_id"] == display_id)
        .expect("animal should be listed")
}

pub fn alert_kinds(animal: &Value) -> Vec<String> {
    animal["alerts"]
        .as_array()
        .expect("alerts should be an array")
        .iter()
        .map(|a| a["kind"].as_str().unwrap_or_default().to_string())
        .collect()
}
