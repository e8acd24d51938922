//! External media collaborators: the encoder that produces the 480p output and
//! the fetcher that pulls remote sources onto local disk.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::mpsc;

pub mod error;
pub mod ffmpeg;
pub mod profile;
pub mod progress;

pub use error::{MediaError, MediaResult};
pub use profile::TranscodeProfile;

/// Fractional completion reports, 0.0 to 100.0, in arrival order.
pub type ProgressSender = mpsc::UnboundedSender<f64>;

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Encodes `input` into `output`. Resolves once the output file is closed.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &TranscodeProfile,
        progress: ProgressSender,
    ) -> MediaResult<()>;
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> MediaResult<()>;
}
