use super::dto::{VideoEntry, VideoListResponse};
use crate::common::error::AppResult;
use crate::infrastructure::storage::local::job_id_from_output;
use crate::state::AppState;

pub struct LibraryService;

impl LibraryService {
    pub async fn list_videos(state: &AppState) -> AppResult<VideoListResponse> {
        let prefix = &state.config.public_video_prefix;

        let videos = state
            .storage
            .list_outputs()
            .await?
            .into_iter()
            .map(|filename| VideoEntry {
                url: format!("{}/{}", prefix, filename),
                stream_url: job_id_from_output(&filename).map(|id| format!("/stream/{}", id)),
                filename,
            })
            .collect();

        Ok(VideoListResponse {
            success: true,
            videos,
        })
    }
}
