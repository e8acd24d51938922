/// Encoder settings applied to every job. The service exposes no way to pick
/// another profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeProfile {
    pub width: u32,
    pub height: u32,
    pub video_codec: &'static str,
    pub audio_codec: &'static str,
    pub video_bitrate: &'static str,
    pub audio_bitrate: &'static str,
    pub fps: u32,
    pub format: &'static str,
    pub crf: u8,
    pub preset: &'static str,
    pub h264_profile: &'static str,
    pub h264_level: &'static str,
}

impl TranscodeProfile {
    pub const fn p480() -> Self {
        Self {
            width: 854,
            height: 480,
            video_codec: "libx264",
            audio_codec: "aac",
            video_bitrate: "1000k",
            audio_bitrate: "128k",
            fps: 30,
            format: "mp4",
            crf: 23,
            preset: "medium",
            h264_profile: "baseline",
            h264_level: "3.0",
        }
    }

    /// Arguments placed between the input and the output path.
    pub fn output_args(&self) -> Vec<String> {
        let size = format!("{}x{}", self.width, self.height);
        let fps = self.fps.to_string();
        let crf = self.crf.to_string();

        [
            "-c:v",
            self.video_codec,
            "-c:a",
            self.audio_codec,
            "-s",
            size.as_str(),
            "-b:v",
            self.video_bitrate,
            "-b:a",
            self.audio_bitrate,
            "-r",
            fps.as_str(),
            "-crf",
            crf.as_str(),
            "-preset",
            self.preset,
            "-profile:v",
            self.h264_profile,
            "-level",
            self.h264_level,
            "-movflags",
            "+faststart",
            "-f",
            self.format,
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}

impl Default for TranscodeProfile {
    fn default() -> Self {
        Self::p480()
    }
}
