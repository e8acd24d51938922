use crate::common::response::ErrorBody;
use crate::modules::conversion::dto::*;
use crate::modules::conversion::model::JobStatus;
use crate::modules::library::dto::{VideoEntry, VideoListResponse};
use crate::routes::HealthResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::conversion::handler::convert_url,
        crate::modules::conversion::handler::upload_video,
        crate::modules::conversion::handler::get_status,
        crate::modules::conversion::stream_handler::stream_video,
        crate::modules::library::handler::list_videos,
        crate::routes::health,
    ),
    components(
        schemas(
            ConvertUrlRequest, JobAcceptedResponse, JobStatusResponse, JobStatus,
            VideoEntry, VideoListResponse, HealthResponse, ErrorBody,
        )
    ),
    tags(
        (name = "Conversion", description = "Transcode jobs, status polling and streaming"),
        (name = "Library", description = "Converted videos on disk"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
