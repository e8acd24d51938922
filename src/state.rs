use crate::config::settings::AppConfig;
use crate::infrastructure::media::{Fetcher, Transcoder};
use crate::infrastructure::storage::local::MediaStorage;
use crate::modules::conversion::repository::JobRegistry;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub jobs: JobRegistry,
    pub storage: MediaStorage,
    pub transcoder: Arc<dyn Transcoder>,
    pub fetcher: Arc<dyn Fetcher>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: MediaStorage,
        transcoder: Arc<dyn Transcoder>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            config,
            jobs: JobRegistry::new(),
            storage,
            transcoder,
            fetcher,
            started_at: Instant::now(),
        }
    }
}
