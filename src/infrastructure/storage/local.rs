use crate::common::upload::sanitize_file_name;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

pub const OUTPUT_EXTENSION: &str = "mp4";

const OUTPUT_PREFIX: &str = "converted-";
const OUTPUT_SUFFIX: &str = "-480p.mp4";

pub fn output_file_name(job_id: Uuid) -> String {
    format!("{OUTPUT_PREFIX}{job_id}{OUTPUT_SUFFIX}")
}

/// Recovers the job id from a `converted-<id>-480p.mp4` name.
pub fn job_id_from_output(file_name: &str) -> Option<Uuid> {
    file_name
        .strip_prefix(OUTPUT_PREFIX)?
        .strip_suffix(OUTPUT_SUFFIX)?
        .parse()
        .ok()
}

/// Flat on-disk layout: uploads, temporary downloads and finished outputs,
/// every file name keyed by a job or upload id.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    upload_dir: PathBuf,
    temp_dir: PathBuf,
    output_dir: PathBuf,
}

impl MediaStorage {
    pub async fn new(
        upload_dir: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> io::Result<Self> {
        let storage = Self {
            upload_dir: upload_dir.into(),
            temp_dir: temp_dir.into(),
            output_dir: output_dir.into(),
        };

        for dir in [&storage.upload_dir, &storage.temp_dir, &storage.output_dir] {
            fs::create_dir_all(dir).await?;
        }

        info!(
            "✅ Media directories ready (uploads={}, temp={}, output={})",
            storage.upload_dir.display(),
            storage.temp_dir.display(),
            storage.output_dir.display()
        );
        Ok(storage)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn upload_path(&self, upload_id: Uuid, original_name: &str) -> PathBuf {
        self.upload_dir
            .join(format!("{}-{}", upload_id, sanitize_file_name(original_name)))
    }

    pub fn temp_path(&self, job_id: Uuid) -> PathBuf {
        self.temp_dir
            .join(format!("temp-{job_id}.{OUTPUT_EXTENSION}"))
    }

    pub fn output_path(&self, job_id: Uuid) -> PathBuf {
        self.output_dir.join(output_file_name(job_id))
    }

    /// File names of every finished output, sorted for stable listings.
    pub async fn list_outputs(&self) -> io::Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.output_dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(&format!(".{OUTPUT_EXTENSION}")) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    pub async fn remove_quietly(path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove {}: {}", path.display(), e),
        }
    }
}
