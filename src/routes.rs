use crate::common::response::ApiError;
use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::http::{HeaderValue, StatusCode};
use axum::handler::HandlerWithoutStateExt;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{extract::State, Json, Router};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;
use utoipa::{OpenApi, ToSchema};

/// Static mount for finished outputs, matching the default public prefix.
const VIDEO_MOUNT: &str = "/videos";

pub fn configure_routes(state: AppState) -> Router<AppState> {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/health", get(health))
        .nest("/api", api_routes())
        .merge(crate::modules::conversion::router())
        .nest_service(
            VIDEO_MOUNT,
            ServeDir::new(state.storage.output_dir()).not_found_service(fallback.into_service()),
        )
        .fallback(fallback)
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new().merge(crate::modules::library::router())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin == "*" {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS_ORIGIN {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Seconds since the server started.
    pub uptime: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        uptime: state.started_at.elapsed().as_secs(),
    })
}

async fn fallback() -> impl IntoResponse {
    ApiError("Endpoint not found".to_string(), StatusCode::NOT_FOUND)
}
