use axum::{
    body::Bytes,
    extract::multipart::{Field, MultipartError},
    http::StatusCode,
};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

const MAX_FILE_NAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only video files are allowed!")]
    InvalidType(String),

    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Upload stream interrupted: {0}")]
    Stream(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes an incoming upload to a local file while enforcing a byte budget.
pub struct DiskUploader {
    path: PathBuf,
    file: File,
    written: u64,
    limit: u64,
}

impl DiskUploader {
    pub async fn new(path: PathBuf, limit: u64) -> Result<Self, UploadError> {
        let file = File::create(&path).await?;

        Ok(Self {
            path,
            file,
            written: 0,
            limit,
        })
    }

    pub async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), UploadError> {
        self.written += chunk.len() as u64;

        if self.written > self.limit {
            return Err(UploadError::TooLarge { limit: self.limit });
        }

        self.file.write_all(&chunk).await?;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn finish(mut self) -> Result<PathBuf, UploadError> {
        self.file.flush().await?;
        Ok(self.path)
    }

    /// Drops the partial file. Removal errors are ignored, the file may
    /// never have received a byte.
    pub async fn abort(self) {
        let Self { path, file, .. } = self;
        drop(file);
        let _ = fs::remove_file(&path).await;
    }
}

pub fn is_video_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::VIDEO)
        .unwrap_or(false)
}

/// Keeps only the final path component and replaces anything outside
/// `[A-Za-z0-9._-]`, so the name is safe to join onto the upload directory.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILE_NAME_LEN)
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

impl UploadError {
    pub fn from_multipart(e: MultipartError, limit: u64) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge { limit }
        } else {
            UploadError::Stream(e.body_text())
        }
    }
}

pub async fn stream_to_disk(
    mut field: Field<'_>,
    path: &Path,
    limit: u64,
) -> Result<PathBuf, UploadError> {
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    // Validate request mime
    if !is_video_content_type(&content_type) {
        return Err(UploadError::InvalidType(content_type));
    }

    let mut uploader = DiskUploader::new(path.to_path_buf(), limit).await?;

    while let Some(chunk) = field.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let err = UploadError::from_multipart(e, limit);
                error!("Upload stream error: {}", err);
                uploader.abort().await;
                return Err(err);
            }
        };

        if let Err(e) = uploader.write_chunk(chunk).await {
            error!("Upload write error: {}", e);
            uploader.abort().await;
            return Err(e);
        }
    }

    info!("⬆️ Stored upload {} ({} bytes)", path.display(), uploader.written());
    uploader.finish().await
}
