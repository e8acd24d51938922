use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use std::time::Duration;

/// 500 MiB, the largest upload accepted on `/upload`.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ffmpeg_path: String,
    pub max_upload_bytes: u64,
    pub public_video_prefix: String,
    pub cors_origin: String,
    pub jobs: JobRetention,
}

/// Registry eviction knobs. Both limits are off unless configured, which keeps
/// every job record alive for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub struct JobRetention {
    pub ttl: Option<Duration>,
    pub sweep_interval: Duration,
    pub max_tracked_jobs: Option<usize>,
}

impl JobRetention {
    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some() || self.max_tracked_jobs.is_some()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        let ttl_secs: u64 = env::get_parsed(EnvKey::JobTtlSecs, 0);
        let max_tracked: usize = env::get_parsed(EnvKey::MaxTrackedJobs, 0);

        Self {
            server_host: env::get_or(EnvKey::ServerHost, "0.0.0.0"),
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            upload_dir: PathBuf::from(env::get_or(EnvKey::UploadDir, "uploads")),
            temp_dir: PathBuf::from(env::get_or(EnvKey::TempDir, "temp")),
            output_dir: PathBuf::from(env::get_or(EnvKey::OutputDir, "output")),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            public_video_prefix: env::get_or(EnvKey::PublicVideoPrefix, "/videos")
                .trim_end_matches('/')
                .to_string(),
            cors_origin: env::get_or(EnvKey::CorsOrigin, "*"),
            jobs: JobRetention {
                ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
                sweep_interval: Duration::from_secs(
                    env::get_parsed(EnvKey::JobSweepIntervalSecs, 60 * 60).max(1),
                ),
                max_tracked_jobs: (max_tracked > 0).then_some(max_tracked),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            upload_dir: PathBuf::from("uploads"),
            temp_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
            ffmpeg_path: "ffmpeg".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            public_video_prefix: "/videos".to_string(),
            cors_origin: "*".to_string(),
            jobs: JobRetention {
                sweep_interval: Duration::from_secs(60 * 60),
                ..JobRetention::default()
            },
        }
    }
}
