//! FFmpeg progress parsing.
//!
//! `-progress pipe:1` writes `key=value` blocks to stdout, each block closed by
//! `progress=continue` or `progress=end`. The input duration, needed to turn
//! `out_time_us` into a percentage, only appears in the human-readable log on
//! stderr.

use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration: (\d+):(\d{2}):(\d{2})(?:\.(\d+))?")
        .expect("duration pattern is valid")
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FfmpegProgress {
    /// Output timestamp reached so far, in microseconds
    pub out_time_us: i64,
    pub frame: u64,
    pub speed: f64,
    pub is_complete: bool,
}

impl FfmpegProgress {
    pub fn percentage(&self, total_duration_us: i64) -> f64 {
        if total_duration_us <= 0 {
            return 0.0;
        }
        (self.out_time_us as f64 / total_duration_us as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Feeds one stdout line into `current`; returns a snapshot when a block ends.
pub fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let (key, value) = line.trim().split_once('=')?;

    match key {
        "out_time_us" => {
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_us = us;
            }
        }
        // Despite the name, ffmpeg reports this one in microseconds as well.
        "out_time_ms" => {
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_us = us;
            }
        }
        "frame" => {
            if let Ok(frame) = value.parse() {
                current.frame = frame;
            }
        }
        "speed" => {
            if let Some(speed) = value.strip_suffix('x').and_then(|s| s.trim().parse().ok()) {
                current.speed = speed;
            }
        }
        "progress" => {
            if value == "end" {
                current.is_complete = true;
            }
            return Some(current.clone());
        }
        _ => {}
    }

    None
}

/// Input duration in microseconds from a `  Duration: HH:MM:SS.xx,` stderr line.
pub fn parse_duration_line(line: &str) -> Option<i64> {
    let caps = DURATION_RE.captures(line)?;

    let hours: i64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: i64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: i64 = caps.get(3)?.as_str().parse().ok()?;

    let fraction_us = caps
        .get(4)
        .map(|m| {
            let digits: String = m.as_str().chars().chain(std::iter::repeat('0')).take(6).collect();
            digits.parse::<i64>().unwrap_or(0)
        })
        .unwrap_or(0);

    let total = ((hours * 60 + minutes) * 60 + seconds) * 1_000_000 + fraction_us;
    (total > 0).then_some(total)
}

/// Integer percent stored on the job, clamped to `0..=100`.
pub fn to_percent(fraction: f64) -> u8 {
    if fraction.is_nan() {
        return 0;
    }
    fraction.round().clamp(0.0, 100.0) as u8
}
