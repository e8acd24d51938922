use super::model::JobState;
use crate::config::settings::JobRetention;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct JobEntry {
    state: JobState,
    updated_at: Instant,
}

/// In-memory job table shared by request handlers and conversion tasks.
///
/// Every write swaps in a complete [`JobState`] under the write lock and every
/// read clones one out under the read lock, so a reader can never see a status
/// from one write paired with a progress from another.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, JobEntry>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, JobEntry>> {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, JobEntry>> {
        self.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or overwrites the full record for `job_id`.
    pub fn put(&self, job_id: Uuid, state: JobState) {
        self.write().insert(
            job_id,
            JobEntry {
                state,
                updated_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, job_id: Uuid) -> Option<JobState> {
        self.read().get(&job_id).map(|entry| entry.state.clone())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replaces a non-terminal record. Unknown and terminal jobs are left
    /// untouched and `false` is returned.
    fn transition(&self, job_id: Uuid, next: JobState) -> bool {
        let mut jobs = self.write();

        match jobs.get_mut(&job_id) {
            Some(entry) if !entry.state.is_terminal() => {
                entry.state = next;
                entry.updated_at = Instant::now();
                true
            }
            _ => false,
        }
    }

    /// Last write wins: reports are not required to arrive in order.
    pub fn report_progress(&self, job_id: Uuid, percent: u8) -> bool {
        self.transition(job_id, JobState::processing(percent))
    }

    pub fn complete(&self, job_id: Uuid) -> bool {
        self.transition(job_id, JobState::Completed)
    }

    pub fn fail(&self, job_id: Uuid, error: impl Into<String>) -> bool {
        self.transition(job_id, JobState::failed(error))
    }

    /// Drops finished jobs according to `policy` and returns their ids.
    /// Jobs still processing are never evicted.
    pub fn evict(&self, policy: &JobRetention, now: Instant) -> Vec<Uuid> {
        let mut jobs = self.write();
        let mut evicted = Vec::new();

        if let Some(ttl) = policy.ttl {
            jobs.retain(|id, entry| {
                let expired = entry.state.is_terminal()
                    && now.saturating_duration_since(entry.updated_at) >= ttl;
                if expired {
                    evicted.push(*id);
                }
                !expired
            });
        }

        if let Some(max) = policy.max_tracked_jobs {
            if jobs.len() > max {
                let mut finished: Vec<(Uuid, Instant)> = jobs
                    .iter()
                    .filter(|(_, entry)| entry.state.is_terminal())
                    .map(|(id, entry)| (*id, entry.updated_at))
                    .collect();
                finished.sort_by_key(|(_, updated_at)| *updated_at);

                let excess = jobs.len() - max;
                for (id, _) in finished.into_iter().take(excess) {
                    jobs.remove(&id);
                    evicted.push(id);
                }
            }
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::conversion::model::JobStatus;
    use std::time::Duration;

    #[test]
    fn put_and_get_whole_records() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();

        assert_eq!(registry.get(id), None);

        registry.put(id, JobState::processing(0));
        assert_eq!(registry.get(id), Some(JobState::processing(0)));

        registry.put(id, JobState::processing(30));
        assert_eq!(registry.get(id), Some(JobState::processing(30)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn progress_is_last_write_wins() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();
        registry.put(id, JobState::processing(0));

        assert!(registry.report_progress(id, 60));
        assert!(registry.report_progress(id, 40));
        assert_eq!(registry.get(id).unwrap().progress(), 40);
    }

    #[test]
    fn terminal_records_are_frozen() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();
        registry.put(id, JobState::processing(10));

        assert!(registry.complete(id));
        assert!(!registry.report_progress(id, 50));
        assert!(!registry.fail(id, "late failure"));
        assert!(!registry.complete(id));

        let state = registry.get(id).unwrap();
        assert_eq!(state.status(), JobStatus::Completed);
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn failure_records_message_and_zero_progress() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();
        registry.put(id, JobState::processing(75));

        assert!(registry.fail(id, "ffmpeg exited with code 1: bad input"));
        let state = registry.get(id).unwrap();
        assert_eq!(state.status(), JobStatus::Error);
        assert_eq!(state.progress(), 0);
        assert_eq!(state.error(), Some("ffmpeg exited with code 1: bad input"));
    }

    #[test]
    fn transitions_on_unknown_jobs_are_ignored() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();

        assert!(!registry.report_progress(id, 5));
        assert!(!registry.complete(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn eviction_is_disabled_by_default() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();
        registry.put(id, JobState::Completed);

        let far_future = Instant::now() + Duration::from_secs(365 * 24 * 60 * 60);
        assert!(registry.evict(&JobRetention::default(), far_future).is_empty());
        assert!(registry.get(id).is_some());
    }

    #[test]
    fn ttl_evicts_only_expired_terminal_jobs() {
        let registry = JobRegistry::new();
        let done = Uuid::new_v4();
        let failed = Uuid::new_v4();
        let running = Uuid::new_v4();

        registry.put(done, JobState::Completed);
        registry.put(failed, JobState::failed("boom"));
        registry.put(running, JobState::processing(50));

        let policy = JobRetention {
            ttl: Some(Duration::from_secs(60)),
            ..JobRetention::default()
        };

        assert!(registry.evict(&policy, Instant::now()).is_empty());

        let later = Instant::now() + Duration::from_secs(120);
        let mut evicted = registry.evict(&policy, later);
        evicted.sort();
        let mut expected = vec![done, failed];
        expected.sort();

        assert_eq!(evicted, expected);
        assert!(registry.get(running).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn capacity_trims_oldest_terminal_jobs() {
        let registry = JobRegistry::new();
        let oldest = Uuid::new_v4();
        let newer = Uuid::new_v4();
        let running = Uuid::new_v4();

        registry.put(oldest, JobState::Completed);
        std::thread::sleep(Duration::from_millis(5));
        registry.put(newer, JobState::Completed);
        registry.put(running, JobState::processing(0));

        let policy = JobRetention {
            max_tracked_jobs: Some(2),
            ..JobRetention::default()
        };

        assert_eq!(registry.evict(&policy, Instant::now()), vec![oldest]);
        assert!(registry.get(newer).is_some());
        assert!(registry.get(running).is_some());
    }

    #[test]
    fn capacity_never_evicts_processing_jobs() {
        let registry = JobRegistry::new();
        for _ in 0..3 {
            registry.put(Uuid::new_v4(), JobState::processing(0));
        }

        let policy = JobRetention {
            max_tracked_jobs: Some(1),
            ..JobRetention::default()
        };

        assert!(registry.evict(&policy, Instant::now()).is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn concurrent_readers_never_see_torn_records() {
        let registry = JobRegistry::new();
        let id = Uuid::new_v4();
        registry.put(id, JobState::processing(0));

        let writer = {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for p in 0..=100u8 {
                    registry.report_progress(id, p);
                }
                registry.complete(id);
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    loop {
                        let state = registry.get(id).unwrap();
                        match state.status() {
                            JobStatus::Completed => {
                                assert_eq!(state.progress(), 100);
                                break;
                            }
                            JobStatus::Processing => assert!(state.progress() <= 100),
                            JobStatus::Error => panic!("unexpected failure"),
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
