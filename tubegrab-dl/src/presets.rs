//! Audio and video presets: stream selection, transcode and merge settings.
//!
//! **Audio:** best audio stream → `FFmpegExtractAudio` with [`AudioCodec`] and kbps quality.
//! **Video:** best video (optionally capped to a height) + best audio → merged into `mp4`.
//!
//! ```no_run
//! use tubegrab_dl::dl::{DownloadOptions, download};
//! use tubegrab_dl::presets::VideoPreset;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts: DownloadOptions = VideoPreset::new(Some("720p")).into();
//! download("https://youtube.com/watch?v=example", opts, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! **Output:** `<home>/title.<ext>`

use crate::dl::{DownloadOptions, OutputPaths, OutputTemplates, PostProcessor};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Files are named by media title.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Container every video download is merged into.
pub const MERGE_FORMAT: &str = "mp4";

/// Bitrates offered interactively, in kbps.
pub const BITRATES: [&str; 4] = ["128", "192", "256", "320"];

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Target codec for audio extraction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum AudioCodec {
    #[default]
    Mp3,
    Aac,
    M4a,
    Opus,
    Flac,
    Wav,
}

impl AudioCodec {
    /// Menu order.
    pub const ALL: [AudioCodec; 6] = [
        AudioCodec::Mp3,
        AudioCodec::Aac,
        AudioCodec::M4a,
        AudioCodec::Opus,
        AudioCodec::Flac,
        AudioCodec::Wav,
    ];

    /// Name understood by `FFmpegExtractAudio`.
    pub fn as_str(self) -> &'static str {
        match self {
            AudioCodec::Mp3 => "mp3",
            AudioCodec::Aac => "aac",
            AudioCodec::M4a => "m4a",
            AudioCodec::Opus => "opus",
            AudioCodec::Flac => "flac",
            AudioCodec::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First run of digits in `s`, e.g. `"1080p"` → `1080`.
pub fn parse_height(s: &str) -> Option<u32> {
    DIGITS.find(s)?.as_str().parse().ok()
}

/// yt-dlp format selector: best video + best audio, optionally pinned to a height.
///
/// A resolution without digits selects the unconstrained best.
pub fn format_selector(resolution: Option<&str>) -> String {
    match resolution.and_then(parse_height) {
        Some(height) => format!("bestvideo[height={height}]+bestaudio/best"),
        None => "bestvideo+bestaudio/best".to_string(),
    }
}

/// Set the output directory of any preset.
pub fn with_output_dir(mut opts: DownloadOptions, dir: &Path) -> DownloadOptions {
    opts.paths = Some(opts.paths.unwrap_or_default().with_home(dir));
    opts
}

/// Options for listing formats without downloading anything.
pub fn resolution_query() -> DownloadOptions {
    DownloadOptions {
        noplaylist: Some(true),
        skip_download: Some(true),
        quiet: Some(true),
        no_warnings: Some(true),
        ..Default::default()
    }
}

fn base_options() -> DownloadOptions {
    DownloadOptions {
        paths: Some(OutputPaths::default()),
        outtmpl: Some(OutputTemplates::simple(OUTPUT_TEMPLATE.to_string())),
        noplaylist: Some(true),
        quiet: Some(true),
        no_warnings: Some(true),
        ..Default::default()
    }
}

/// Audio-only acquisition settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioPreset {
    pub codec: AudioCodec,
    /// Target bitrate in kbps
    pub bitrate: String,
}

impl AudioPreset {
    pub fn new(codec: AudioCodec, bitrate: impl Into<String>) -> Self {
        Self {
            codec,
            bitrate: bitrate.into(),
        }
    }
}

impl From<AudioPreset> for DownloadOptions {
    /// Best audio → `FFmpegExtractAudio(codec, bitrate)`, single video only
    fn from(preset: AudioPreset) -> Self {
        Self {
            format: Some("bestaudio/best".to_string()),
            postprocessors: Some(vec![PostProcessor {
                key: "FFmpegExtractAudio".to_string(),
                preferredcodec: Some(preset.codec.to_string()),
                preferredquality: Some(preset.bitrate),
            }]),
            ..base_options()
        }
    }
}

/// Video + audio acquisition settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoPreset {
    /// Label such as `"1080p"`; `None` means best available
    pub resolution: Option<String>,
}

impl VideoPreset {
    pub fn new(resolution: Option<&str>) -> Self {
        Self {
            resolution: resolution.map(str::to_string),
        }
    }
}

impl From<VideoPreset> for DownloadOptions {
    /// Best video (height-pinned if requested) + best audio, merged into mp4
    fn from(preset: VideoPreset) -> Self {
        Self {
            format: Some(format_selector(preset.resolution.as_deref())),
            merge_output_format: Some(MERGE_FORMAT.to_string()),
            ..base_options()
        }
    }
}
