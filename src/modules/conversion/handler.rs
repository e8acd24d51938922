use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::common::upload::{stream_to_disk, UploadError};
use crate::modules::conversion::dto::*;
use crate::modules::conversion::service::ConversionService;
use crate::state::AppState;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

const UPLOAD_FIELD: &str = "video";

#[utoipa::path(
    post,
    path = "/convert-url",
    request_body = ConvertUrlRequest,
    responses(
        (status = 200, description = "Conversion started", body = JobAcceptedResponse),
        (status = 400, description = "Missing or invalid URL", body = ErrorBody)
    ),
    tag = "Conversion"
)]
pub async fn convert_url(
    State(state): State<AppState>,
    payload: Result<Json<ConvertUrlRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(e) => {
            warn!("Rejected convert-url body: {}", e.body_text());
            return AppError::validation("URL is required").into_response();
        }
    };

    match ConversionService::start_from_url(state, req) {
        Ok(job_id) => ApiSuccess(JobAcceptedResponse::new(job_id), StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, description = "Multipart form with a `video` file field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Conversion started", body = JobAcceptedResponse),
        (status = 400, description = "Missing file, wrong type or too large", body = ErrorBody)
    ),
    tag = "Conversion"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            warn!("Rejected upload: {}", e.body_text());
            return AppError::validation("No video file uploaded").into_response();
        }
    };
    let limit = state.config.max_upload_bytes;

    // 1. Find the video field
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return AppError::from(UploadError::from_multipart(e, limit)).into_response(),
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let job_id = Uuid::new_v4();
        let file_name = field.file_name().unwrap_or("video.mp4").to_string();
        let path = state.storage.upload_path(job_id, &file_name);
        info!("⬆️ Receiving upload {} for job {}", file_name, job_id);

        // 2. Stream to disk, then hand off
        return match stream_to_disk(field, &path, limit).await {
            Ok(stored) => {
                let job_id = ConversionService::start_from_upload(state, job_id, stored);
                ApiSuccess(JobAcceptedResponse::new(job_id), StatusCode::OK).into_response()
            }
            Err(e) => AppError::from(e).into_response(),
        };
    }

    AppError::validation("No video file uploaded").into_response()
}

#[utoipa::path(
    get,
    path = "/status/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job status", body = JobStatusResponse),
        (status = 404, description = "Job not found", body = ErrorBody)
    ),
    tag = "Conversion"
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match ConversionService::get_status(&state, &job_id) {
        Ok(res) => ApiSuccess(res, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
