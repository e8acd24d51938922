use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub filename: String,
    pub url: String,
    /// Only set for files named after a conversion job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoListResponse {
    pub success: bool,
    pub videos: Vec<VideoEntry>,
}
