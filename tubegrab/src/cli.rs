//! CLI argument definitions using clap.

use crate::backend::YtDlp;
use crate::config::Config;
use crate::error::InputError;
use crate::prompt::Prompter;
use crate::run::{Outcome, execute};
use clap::{Parser, ValueEnum};
use eyre::Result;
use std::fmt;
use std::path::PathBuf;
use tubegrab_dl::presets::AudioCodec;

const EXAMPLES: &str = "\
Examples:
  tubegrab -v dQw4w9WgXcQ -m audio
  tubegrab -y https://youtu.be/dQw4w9WgXcQ -f opus -b 256
  tubegrab -t https://www.tiktok.com/@user/video/123456789 -m video";

#[derive(Debug, Parser)]
#[command(name = "tubegrab")]
#[command(about = "Download YouTube or TikTok audio/video with format, bitrate and resolution selection")]
#[command(version)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Download mode (prompted if omitted)
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Audio output format (prompted if omitted in audio mode)
    #[arg(short, long, value_enum)]
    pub format: Option<AudioCodec>,

    /// Audio bitrate in kbps, e.g. 128, 192, 256, 320 (prompted if omitted in audio mode)
    #[arg(short, long, value_parser = parse_bitrate)]
    pub bitrate: Option<String>,

    /// Video resolution, e.g. 1080p, 720p (prompted from available formats if omitted)
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Where the target URL comes from; at most one may be given.
#[derive(Debug, clap::Args)]
#[group(required = false, multiple = false)]
pub struct SourceArgs {
    /// Full YouTube URL (e.g., https://www.youtube.com/watch?v=abc123)
    #[arg(short, long)]
    pub youtube: Option<String>,

    /// YouTube video ID only (the part after v=)
    #[arg(short, long = "video")]
    pub video_id: Option<String>,

    /// Full TikTok video URL
    #[arg(short, long)]
    pub tiktok: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Audio,
    Video,
}

impl Mode {
    /// Menu order.
    pub const ALL: [Mode; 2] = [Mode::Audio, Mode::Video];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Audio => f.write_str("audio"),
            Mode::Video => f.write_str("video"),
        }
    }
}

/// Accept `192`, `192k` or `192kbps`; keep the digits.
fn parse_bitrate(s: &str) -> Result<String, InputError> {
    let digits = s
        .trim()
        .trim_end_matches("kbps")
        .trim_end_matches(['k', 'K'])
        .trim();

    match digits.parse::<u32>() {
        Ok(kbps) if kbps > 0 => Ok(kbps.to_string()),
        _ => Err(InputError::InvalidBitrate(s.to_string())),
    }
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<Outcome> {
    tracing::debug!(?cli, "parsed arguments");

    let config = Config::try_from(cli)?;
    let mut prompter = Prompter::stdio();

    execute(config, &mut prompter, &YtDlp::default())
}
