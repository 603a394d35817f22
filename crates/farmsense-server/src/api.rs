use crate::logging::TraceId;
use crate::render;
use crate::state::AppState;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use farmsense_common::types::EnrichedAnimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: String,
}

pub fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiError { error: msg.into() })).into_response()
}

/// Service health summary
#[derive(Serialize, ToSchema)]
struct HealthResponse {
    version: String,
    uptime_secs: i64,
    animal_count: u64,
    /// Id of the animal currently held as critical
    critical_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse),
        (status = 500, description = "Store unavailable", body = ApiError)
    )
)]
async fn health(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    let animal_count = match state.store.count_animals().await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to count animals");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };
    Json(HealthResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
        animal_count,
        critical_id: state.current_critical(),
    })
    .into_response()
}

/// All animals with their derived alerts.
///
/// Each call runs one critical-selector evaluation before the alerts are
/// derived, so the flagged animal is consistent across the whole list.
#[utoipa::path(
    get,
    path = "/api/animals",
    tag = "Animals",
    responses(
        (status = 200, description = "Every animal, enriched with alerts", body = Vec<EnrichedAnimal>),
        (status = 500, description = "Store query failed", body = ApiError)
    )
)]
async fn list_animals(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    let records = match state.store.list_animals().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to list animals");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let critical_id = state.evaluate_critical(&records);
    let animals: Vec<EnrichedAnimal> = records
        .into_iter()
        .map(|r| state.alert_engine.enrich(r, critical_id.as_deref()))
        .collect();

    Json(animals).into_response()
}

#[utoipa::path(
    get,
    path = "/api/animals/{id}",
    tag = "Animals",
    params(
        ("id" = String, Path, description = "Animal id")
    ),
    responses(
        (status = 200, description = "One animal, enriched with alerts", body = EnrichedAnimal),
        (status = 404, description = "Unknown animal", body = ApiError),
        (status = 500, description = "Store query failed", body = ApiError)
    )
)]
async fn get_animal(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get_animal(&id).await {
        Ok(Some(record)) => {
            let critical_id = state.current_critical();
            Json(state.alert_engine.enrich(record, critical_id.as_deref())).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("Animal '{id}' not found")),
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, animal_id = %id, error = %e, "Failed to get animal");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Plain HTML table of every animal, without alerts.
#[utoipa::path(
    get,
    path = "/animals",
    tag = "Animals",
    responses(
        (status = 200, description = "HTML herd table", body = String, content_type = "text/html"),
        (status = 500, description = "Store query failed", body = String, content_type = "text/plain")
    )
)]
async fn animals_html(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    match state.store.list_animals().await {
        Ok(records) => Html(render::animals_table(&records)).into_response(),
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to render animals table");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching animal data: {e}"),
            )
                .into_response()
        }
    }
}

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health))
        .routes(routes!(list_animals))
        .routes(routes!(get_animal))
}

pub fn page_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(animals_html))
}
