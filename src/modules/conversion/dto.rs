use super::model::{JobState, JobStatus};
use crate::infrastructure::storage::local::output_file_name;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ConvertUrlRequest {
    #[serde(default)]
    #[validate(url(message = "URL is not valid"))]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobAcceptedResponse {
    pub success: bool,
    pub job_id: Uuid,
    pub message: String,
}

impl JobAcceptedResponse {
    pub fn new(job_id: Uuid) -> Self {
        Self {
            success: true,
            job_id,
            message: "Video conversion started. Check status endpoint for progress.".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl JobStatusResponse {
    /// Projects a registry record; content URLs appear only once completed.
    pub fn from_state(job_id: Uuid, state: &JobState, video_prefix: &str) -> Self {
        let content_url = (state.status() == JobStatus::Completed)
            .then(|| format!("{}/{}", video_prefix, output_file_name(job_id)));

        Self {
            status: state.status(),
            progress: state.progress(),
            error: state.error().map(str::to_string),
            stream_url: content_url.clone(),
            download_url: content_url,
        }
    }
}
