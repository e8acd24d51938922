use crate::infrastructure::media::progress::to_percent;
use crate::infrastructure::media::{Fetcher, MediaResult, TranscodeProfile, Transcoder};
use crate::infrastructure::storage::local::MediaStorage;
use crate::modules::conversion::model::JobState;
use crate::modules::conversion::repository::JobRegistry;
use crate::state::AppState;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

const PROFILE: TranscodeProfile = TranscodeProfile::p480();

/// Where the bytes for a job come from.
#[derive(Debug, Clone)]
pub enum JobSource {
    /// Already on disk, written by the upload handler.
    Upload(PathBuf),
    /// Pulled into the temp directory before transcoding.
    Remote(String),
}

/// Detaches the conversion for `job_id`; the request that created the job does
/// not wait for it. The registry is the only place its outcome shows up.
pub fn spawn_conversion(state: AppState, job_id: Uuid, source: JobSource) -> JoinHandle<()> {
    let span = tracing::info_span!("conversion", %job_id);
    tokio::spawn(async move { run_conversion(&state, job_id, source).await }.instrument(span))
}

pub async fn run_conversion(state: &AppState, job_id: Uuid, source: JobSource) {
    info!("🎥 Starting job {}", job_id);

    // 1. Resolve a local input
    let input = match source {
        JobSource::Upload(path) => path,
        JobSource::Remote(url) => {
            let temp_path = state.storage.temp_path(job_id);
            match fetch_source(state.fetcher.as_ref(), &url, &temp_path).await {
                Ok(()) => temp_path,
                Err(e) => {
                    error!("❌ Job {} failed to fetch {}: {}", job_id, url, e);
                    state.jobs.fail(job_id, e.to_string());
                    MediaStorage::remove_quietly(&temp_path).await;
                    return;
                }
            }
        }
    };

    // 2. Transcode to the 480p profile
    let output = state.storage.output_path(job_id);
    info!("Converting video to 480p: {} -> {}", input.display(), output.display());
    let result = transcode(&state.jobs, state.transcoder.as_ref(), job_id, &input, &output).await;

    // 3. Cleanup the source either way
    MediaStorage::remove_quietly(&input).await;

    match result {
        Ok(()) => info!("✅ Job {} completed successfully", job_id),
        Err(e) => error!("❌ Job {} failed: {}", job_id, e),
    }
}

pub async fn fetch_source(fetcher: &dyn Fetcher, url: &str, destination: &Path) -> MediaResult<()> {
    info!("⬇️ Downloading video from URL: {}", url);
    fetcher.fetch(url, destination).await?;
    info!("⬇️ Download completed: {}", destination.display());
    Ok(())
}

/// Runs the encoder and mirrors its progress into `jobs`.
///
/// Every progress report is applied before the terminal write, so the
/// completed/error record is always the last one for the job.
pub async fn transcode(
    jobs: &JobRegistry,
    transcoder: &dyn Transcoder,
    job_id: Uuid,
    input: &Path,
    output: &Path,
) -> MediaResult<()> {
    jobs.put(job_id, JobState::processing(0));

    let (tx, mut rx) = mpsc::unbounded_channel::<f64>();

    let reporter = async {
        while let Some(fraction) = rx.recv().await {
            let percent = to_percent(fraction);
            if jobs.report_progress(job_id, percent) {
                debug!("Job {} progress: {}%", job_id, percent);
            }
        }
    };

    let (result, ()) = tokio::join!(transcoder.transcode(input, output, &PROFILE, tx), reporter);

    match result {
        Ok(()) => {
            jobs.complete(job_id);
            Ok(())
        }
        Err(e) => {
            jobs.fail(job_id, e.to_string());
            MediaStorage::remove_quietly(output).await;
            Err(e)
        }
    }
}
