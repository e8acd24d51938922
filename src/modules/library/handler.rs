use super::dto::VideoListResponse;
use super::service::LibraryService;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

#[utoipa::path(
    get,
    path = "/api/videos",
    responses(
        (status = 200, description = "Converted videos on disk", body = VideoListResponse),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    ),
    tag = "Library"
)]
pub async fn list_videos(State(state): State<AppState>) -> impl IntoResponse {
    match LibraryService::list_videos(&state).await {
        Ok(res) => ApiSuccess(res, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
