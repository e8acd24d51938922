use super::dto::{ConvertUrlRequest, JobStatusResponse};
use super::model::JobState;
use crate::common::error::{AppError, AppResult};
use crate::state::AppState;
use crate::workers::transcoder::{spawn_conversion, JobSource};
use std::path::PathBuf;
use tracing::info;
use url::Url;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub struct ConversionService;

impl ConversionService {
    /// Checks the request body and returns the URL to fetch.
    pub fn validate_url(req: &ConvertUrlRequest) -> AppResult<Url> {
        let raw = req.url.trim();
        if raw.is_empty() {
            return Err(AppError::validation("URL is required"));
        }

        req.validate()
            .map_err(|e| AppError::validation(first_message(&e)))?;

        let url = Url::parse(raw).map_err(|_| AppError::validation("URL is not valid"))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(AppError::validation("Only http and https URLs are supported")),
        }
    }

    pub fn start_from_url(state: AppState, req: ConvertUrlRequest) -> AppResult<Uuid> {
        let url = Self::validate_url(&req)?;

        let job_id = Uuid::new_v4();
        state.jobs.put(job_id, JobState::processing(0));
        info!("🎥 Accepted URL job {} for {}", job_id, url);

        spawn_conversion(state, job_id, JobSource::Remote(url.into()));
        Ok(job_id)
    }

    /// Registers a job for a file the upload handler already stored under
    /// `job_id` and hands it to the background worker.
    pub fn start_from_upload(state: AppState, job_id: Uuid, path: PathBuf) -> Uuid {
        state.jobs.put(job_id, JobState::processing(0));
        info!("🎥 Accepted upload job {} ({})", job_id, path.display());

        spawn_conversion(state, job_id, JobSource::Upload(path));
        job_id
    }

    pub fn get_status(state: &AppState, raw_id: &str) -> AppResult<JobStatusResponse> {
        let job_id = Uuid::parse_str(raw_id).map_err(|_| AppError::not_found("Job not found"))?;

        let job = state
            .jobs
            .get(job_id)
            .ok_or_else(|| AppError::not_found("Job not found"))?;

        Ok(JobStatusResponse::from_state(
            job_id,
            &job,
            &state.config.public_video_prefix,
        ))
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}
