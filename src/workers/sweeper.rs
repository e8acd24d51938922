use crate::infrastructure::storage::local::MediaStorage;
use crate::state::AppState;
use std::time::Instant;
use tracing::info;

/// Periodically evicts finished jobs when a retention policy is configured.
pub async fn start_job_sweeper(state: AppState) {
    let retention = state.config.jobs.clone();

    if !retention.is_enabled() {
        info!("🧹 Job eviction disabled, records live until shutdown");
        return;
    }

    info!(
        "🧹 Job sweeper running every {}s (ttl={:?}, max_tracked_jobs={:?})",
        retention.sweep_interval.as_secs(),
        retention.ttl,
        retention.max_tracked_jobs
    );

    let mut ticker = tokio::time::interval(retention.sweep_interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        sweep_once(&state, Instant::now()).await;
    }
}

/// Evicts according to the configured policy and deletes the evicted jobs'
/// outputs. Returns the number of jobs removed.
pub async fn sweep_once(state: &AppState, now: Instant) -> usize {
    let evicted = state.jobs.evict(&state.config.jobs, now);

    for job_id in &evicted {
        MediaStorage::remove_quietly(&state.storage.output_path(*job_id)).await;
    }

    if !evicted.is_empty() {
        info!(
            "🧹 Evicted {} finished jobs, {} still tracked",
            evicted.len(),
            state.jobs.len()
        );
    }

    evicted.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{AppConfig, JobRetention};
    use crate::modules::conversion::model::JobState;
    use crate::test_support::{FakeFetcher, FakeTranscoder, TestApp};
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test]
    async fn sweep_removes_expired_jobs_and_outputs() {
        let config = AppConfig {
            jobs: JobRetention {
                ttl: Some(Duration::from_secs(30)),
                sweep_interval: Duration::from_secs(1),
                max_tracked_jobs: None,
            },
            ..AppConfig::default()
        };
        let app = TestApp::with_config(config, FakeTranscoder::default(), FakeFetcher::default()).await;

        let done = Uuid::new_v4();
        let running = Uuid::new_v4();
        app.state.jobs.put(done, JobState::Completed);
        app.state.jobs.put(running, JobState::processing(20));
        let output = app.write_output(done, b"finished");

        assert_eq!(sweep_once(&app.state, Instant::now()).await, 0);

        let later = Instant::now() + Duration::from_secs(60);
        assert_eq!(sweep_once(&app.state, later).await, 1);
        assert!(app.state.jobs.get(done).is_none());
        assert!(app.state.jobs.get(running).is_some());
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn disabled_sweeper_returns_immediately() {
        let app = TestApp::new(FakeTranscoder::default(), FakeFetcher::default()).await;
        tokio::time::timeout(Duration::from_secs(1), start_job_sweeper(app.state.clone()))
            .await
            .expect("sweeper should exit when eviction is disabled");
    }
}
