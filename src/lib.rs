pub mod api;
pub mod config;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::remover::BackgroundRemover;
use crate::services::storage::StorageAreas;
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::remove::remove_bg,
        api::handlers::remove::api_remove_bg,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::remove::RemoveResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "remove", description = "Background removal endpoints"),
        (name = "system", description = "Health and status endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageAreas>,
    pub remover: Arc<dyn BackgroundRemover>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    let static_dir = ServeDir::new(state.storage.root());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/remove", post(api::handlers::remove::remove_bg))
        .route("/api/remove", post(api::handlers::remove::api_remove_bg))
        .nest_service("/static", static_dir)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Resource not found." })),
    )
}
