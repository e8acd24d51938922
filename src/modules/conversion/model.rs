use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Error,
}

/// Whole state of one conversion job.
///
/// The variants carry exactly the fields that are meaningful for them, so a
/// `completed` record always reports 100% and an `error` record always has a
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Processing { progress: u8 },
    Completed,
    Failed { error: String },
}

impl JobState {
    pub fn processing(progress: u8) -> Self {
        JobState::Processing {
            progress: progress.min(100),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let error = error.into();
        JobState::Failed {
            error: if error.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                error
            },
        }
    }

    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Processing { .. } => JobStatus::Processing,
            JobState::Completed => JobStatus::Completed,
            JobState::Failed { .. } => JobStatus::Error,
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            JobState::Processing { progress } => *progress,
            JobState::Completed => 100,
            JobState::Failed { .. } => 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            JobState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Processing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projections_follow_variant() {
        let processing = JobState::processing(42);
        assert_eq!(processing.status(), JobStatus::Processing);
        assert_eq!(processing.progress(), 42);
        assert_eq!(processing.error(), None);
        assert!(!processing.is_terminal());

        assert_eq!(JobState::Completed.status(), JobStatus::Completed);
        assert_eq!(JobState::Completed.progress(), 100);
        assert!(JobState::Completed.is_terminal());

        let failed = JobState::failed("codec not supported");
        assert_eq!(failed.status(), JobStatus::Error);
        assert_eq!(failed.progress(), 0);
        assert_eq!(failed.error(), Some("codec not supported"));
        assert!(failed.is_terminal());
    }

    #[test]
    fn processing_progress_is_capped() {
        assert_eq!(JobState::processing(250).progress(), 100);
    }

    #[test]
    fn failures_always_have_a_message() {
        assert_eq!(JobState::failed("  ").error(), Some("Unknown error"));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&JobStatus::Processing).unwrap(), "\"processing\"");
        assert_eq!(serde_json::to_string(&JobStatus::Completed).unwrap(), "\"completed\"");
        assert_eq!(serde_json::to_string(&JobStatus::Error).unwrap(), "\"error\"");
    }
}
