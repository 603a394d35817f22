use crate::state::AppState;
use crate::{api, logging};
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FarmSense API",
        description = "Livestock vital-sign and reproductive alert API",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Animals", description = "Animal records and derived alerts")
    )
)]
struct ApiDoc;

pub fn build_http_app(state: AppState) -> Router {
    let (api_router, api_spec) = api::api_routes().split_for_parts();
    let (page_router, page_spec) = api::page_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(api_spec);
    merged_spec.merge(page_spec);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router
        .merge(page_router)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", merged_spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
