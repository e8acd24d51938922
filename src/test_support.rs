//! Fakes for the media collaborators and a throwaway application state rooted
//! in a temp directory.

use crate::config::settings::AppConfig;
use crate::infrastructure::media::{
    Fetcher, MediaError, MediaResult, ProgressSender, TranscodeProfile, Transcoder,
};
use crate::infrastructure::storage::local::MediaStorage;
use crate::modules::conversion::model::JobState;
use crate::modules::conversion::repository::JobRegistry;
use crate::state::AppState;
use async_trait::async_trait;
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use uuid::Uuid;

/// Copies the input to the output after replaying scripted progress reports.
#[derive(Default)]
pub struct FakeTranscoder {
    reports: Vec<f64>,
    fail_with: Option<String>,
    step_delay: Duration,
    hold: bool,
    parked: Notify,
    released: Notify,
    inputs: Mutex<Vec<PathBuf>>,
    pub calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn with_reports(reports: Vec<f64>) -> Self {
        Self {
            reports,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reports: vec![15.0],
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Parks after the last report until [`FakeTranscoder::release`].
    pub fn hold_before_finish(mut self) -> Self {
        self.hold = true;
        self
    }

    pub async fn wait_until_parked(&self) {
        self.parked.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn inputs(&self) -> Vec<PathBuf> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _profile: &TranscodeProfile,
        progress: ProgressSender,
    ) -> MediaResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_path_buf());

        let source = tokio::fs::read(input).await?;

        for report in &self.reports {
            let _ = progress.send(*report);
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        if self.hold {
            self.parked.notify_one();
            self.released.notified().await;
        }

        if let Some(message) = &self.fail_with {
            tokio::fs::write(output, b"partial").await?;
            return Err(MediaError::Failed {
                binary: "ffmpeg".to_string(),
                code: Some(1),
                detail: message.clone(),
            });
        }

        tokio::fs::write(output, source).await?;
        Ok(())
    }
}

pub struct FakeFetcher {
    payload: Vec<u8>,
    fail_with: Option<String>,
    pub calls: AtomicUsize,
}

impl Default for FakeFetcher {
    fn default() -> Self {
        Self {
            payload: b"remote video bytes".to_vec(),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeFetcher {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, _url: &str, destination: &Path) -> MediaResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_with {
            tokio::fs::write(destination, b"half a download").await?;
            return Err(MediaError::Failed {
                binary: "ffmpeg".to_string(),
                code: Some(1),
                detail: message.clone(),
            });
        }

        tokio::fs::write(destination, &self.payload).await?;
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub transcoder: Arc<FakeTranscoder>,
    pub fetcher: Arc<FakeFetcher>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new(transcoder: FakeTranscoder, fetcher: FakeFetcher) -> Self {
        Self::with_config(AppConfig::default(), transcoder, fetcher).await
    }

    pub async fn with_config(
        mut config: AppConfig,
        transcoder: FakeTranscoder,
        fetcher: FakeFetcher,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        config.upload_dir = dir.path().join("uploads");
        config.temp_dir = dir.path().join("temp");
        config.output_dir = dir.path().join("output");

        let storage = MediaStorage::new(&config.upload_dir, &config.temp_dir, &config.output_dir)
            .await
            .unwrap();

        let transcoder = Arc::new(transcoder);
        let fetcher = Arc::new(fetcher);
        let state = AppState::new(config, storage, transcoder.clone(), fetcher.clone());

        Self {
            state,
            transcoder,
            fetcher,
            _dir: dir,
        }
    }

    pub fn router(&self) -> Router {
        crate::app::create_app(self.state.clone())
    }

    pub fn write_upload(&self, job_id: Uuid, bytes: &[u8]) -> PathBuf {
        let path = self.state.storage.upload_path(job_id, "clip.mp4");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    pub fn write_output(&self, job_id: Uuid, bytes: &[u8]) -> PathBuf {
        let path = self.state.storage.output_path(job_id);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

pub async fn wait_for_terminal(jobs: &JobRegistry, job_id: Uuid) -> JobState {
    const MAX_POLLS: usize = 200;
    const POLL_INTERVAL_MS: u64 = 10;

    for _ in 0..MAX_POLLS {
        if let Some(state) = jobs.get(job_id) {
            if state.is_terminal() {
                return state;
            }
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }

    panic!("job {job_id} did not reach a terminal state");
}
