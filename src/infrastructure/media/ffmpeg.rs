use super::error::{MediaError, MediaResult};
use super::profile::TranscodeProfile;
use super::progress::{parse_duration_line, parse_progress_line, FfmpegProgress};
use super::{Fetcher, ProgressSender, Transcoder};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, trace};

/// stderr lines kept for the failure message.
const STDERR_TAIL_LINES: usize = 6;

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub fn build_transcode_args(input: &Path, output: &Path, profile: &TranscodeProfile) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-nostdin", "-y", "-nostats", "-progress", "pipe:1", "-i"]
        .into_iter()
        .map(str::to_string)
        .collect();

    args.push(path_arg(input));
    args.extend(profile.output_args());
    args.push(path_arg(output));
    args
}

pub fn build_fetch_args(url: &str, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-nostdin", "-y", "-nostats", "-i"]
        .into_iter()
        .map(str::to_string)
        .collect();

    args.push(url.to_string());
    args.extend(["-f".to_string(), "mp4".to_string()]);
    args.push(path_arg(output));
    args
}

/// Runs `binary` to completion. When `progress` is given, every finished
/// `-progress` block is forwarded as a percentage of the input duration.
async fn run_ffmpeg(
    binary: &str,
    args: Vec<String>,
    progress: Option<ProgressSender>,
) -> MediaResult<()> {
    debug!("Running: {} {}", binary, args.join(" "));

    let mut child = Command::new(binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| MediaError::spawn(binary, e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr not captured"))?;

    let (duration_tx, duration_rx) = watch::channel(None::<i64>);

    let log_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(total) = parse_duration_line(&line) {
                duration_tx.send_if_modified(|current| {
                    if current.is_none() {
                        *current = Some(total);
                        true
                    } else {
                        false
                    }
                });
            }

            if line.trim().is_empty() {
                continue;
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        tail
    });

    let progress_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        let mut current = FfmpegProgress::default();

        while let Ok(Some(line)) = lines.next_line().await {
            let Some(snapshot) = parse_progress_line(&line, &mut current) else {
                continue;
            };
            let Some(tx) = progress.as_ref() else {
                continue;
            };

            let total = *duration_rx.borrow();
            let percent = if snapshot.is_complete {
                Some(100.0)
            } else {
                total.map(|total| snapshot.percentage(total))
            };

            if let Some(percent) = percent {
                trace!(
                    "ffmpeg frame={} speed={:.2}x progress={:.1}%",
                    snapshot.frame, snapshot.speed, percent
                );
                let _ = tx.send(percent);
            }
        }
    });

    let status = child.wait().await?;
    let tail = log_task.await.unwrap_or_default();
    let _ = progress_task.await;

    if status.success() {
        return Ok(());
    }

    let detail = if tail.is_empty() {
        "no diagnostic output".to_string()
    } else {
        tail.into_iter().collect::<Vec<_>>().join("\n")
    };

    Err(MediaError::Failed {
        binary: binary.to_string(),
        code: status.code(),
        detail,
    })
}

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        profile: &TranscodeProfile,
        progress: ProgressSender,
    ) -> MediaResult<()> {
        let args = build_transcode_args(input, output, profile);
        run_ffmpeg(&self.binary, args, Some(progress)).await
    }
}

/// Pulls a remote resource through ffmpeg, so anything ffmpeg can demux over
/// the network (plain files, HLS playlists) lands locally as MP4.
#[derive(Debug, Clone)]
pub struct FfmpegFetcher {
    binary: String,
}

impl FfmpegFetcher {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Fetcher for FfmpegFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> MediaResult<()> {
        let args = build_fetch_args(url, destination);
        run_ffmpeg(&self.binary, args, None).await
    }
}
