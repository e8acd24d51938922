use crate::common::range::clamp_to_size;
use crate::common::response::{ApiError, ErrorBody};
use crate::modules::conversion::model::JobState;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{HeaderMapExt, Range};
use axum_range::{KnownSize, RangeBody, Ranged};
use std::io;
use tokio::fs::File;
use uuid::Uuid;

const VIDEO_MP4: &str = "video/mp4";

fn not_found() -> Response {
    ApiError("Video not found".to_string(), StatusCode::NOT_FOUND).into_response()
}

fn not_satisfiable(size: u64) -> Response {
    let mut response =
        ApiError("Range not satisfiable".to_string(), StatusCode::RANGE_NOT_SATISFIABLE)
            .into_response();
    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", size)) {
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    response
}

/// Streams a finished output with support for single `Range` requests.
#[utoipa::path(
    get,
    path = "/stream/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Full video", content_type = "video/mp4"),
        (status = 206, description = "Partial content", content_type = "video/mp4"),
        (status = 404, description = "Video not found", body = ErrorBody),
        (status = 416, description = "Range not satisfiable", body = ErrorBody)
    ),
    tag = "Conversion"
)]
pub async fn stream_video(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // 1. Resolve the output, never a job that is still running
    let Ok(job_id) = Uuid::parse_str(&job_id) else {
        return not_found();
    };
    if let Some(job) = state.jobs.get(job_id) {
        if job != JobState::Completed {
            return not_found();
        }
    }

    let path = state.storage.output_path(job_id);
    let file = match File::open(&path).await {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return not_found(),
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let body = match KnownSize::file(file).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to stat {}: {}", path.display(), e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let size = body.byte_size();

    // 2. Parse Range header
    let range = match headers.typed_try_get::<Range>() {
        Ok(None) => None,
        Ok(Some(requested)) => match clamp_to_size(&requested, size) {
            Some(range) => Some(range),
            None => return not_satisfiable(size),
        },
        Err(e) => {
            tracing::debug!("Rejected range header for {} bytes: {}", size, e);
            return not_satisfiable(size);
        }
    };

    // 3. Let axum-range seek and bound the body
    let mut response = Ranged::new(range, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(VIDEO_MP4));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    response
}
