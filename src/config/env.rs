use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerHost,
    ServerPort,
    UploadDir,
    TempDir,
    OutputDir,
    FfmpegPath,
    MaxUploadBytes,
    PublicVideoPrefix,
    CorsOrigin,
    JobTtlSecs,
    JobSweepIntervalSecs,
    MaxTrackedJobs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerHost => "APP_HOST",
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::TempDir => "TEMP_DIR",
            EnvKey::OutputDir => "OUTPUT_DIR",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::PublicVideoPrefix => "PUBLIC_VIDEO_PREFIX",
            EnvKey::CorsOrigin => "CORS_ORIGIN",
            EnvKey::JobTtlSecs => "JOB_TTL_SECS",
            EnvKey::JobSweepIntervalSecs => "JOB_SWEEP_INTERVAL_SECS",
            EnvKey::MaxTrackedJobs => "MAX_TRACKED_JOBS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
