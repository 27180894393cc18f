//! Resolved configuration for a run.
//!
//! Built from [`Cli`] via `TryFrom`: the URL source is expanded and checked, everything
//! still missing is left `None` for the prompts to fill in.

use crate::cli::{Cli, Mode, SourceArgs};
use crate::error::InputError;
use crate::source::{is_supported_url, video_url};
use color_eyre::Section;
use eyre::Result;
use std::path::PathBuf;
use tubegrab_dl::presets::AudioCodec;

#[derive(Debug)]
pub struct Config {
    /// Target URL from flags; `None` asks interactively
    pub url: Option<String>,
    pub mode: Option<Mode>,
    pub codec: Option<AudioCodec>,
    pub bitrate: Option<String>,
    pub resolution: Option<String>,
    pub output_dir: PathBuf,
}

impl SourceArgs {
    /// URL named by whichever source flag was given.
    pub fn url(self) -> Option<String> {
        match self {
            SourceArgs { youtube: Some(url), .. } => Some(url),
            SourceArgs { video_id: Some(id), .. } if !id.is_empty() => Some(video_url(&id)),
            SourceArgs { video_id: Some(id), .. } => Some(id),
            SourceArgs { tiktok: Some(url), .. } => Some(url),
            _ => None,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = eyre::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let url = cli.source.url();

        // Flag URLs go through the same allow-list as typed ones
        if let Some(url) = url.as_deref()
            && !is_supported_url(url)
        {
            return Err(eyre::Report::new(InputError::UnsupportedUrl(url.to_string()))
                .suggestion("pass a full https://www.youtube.com, youtu.be or tiktok.com link"));
        }

        Ok(Self {
            url,
            mode: cli.mode,
            codec: cli.format,
            bitrate: cli.bitrate,
            resolution: cli.resolution,
            output_dir: cli.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Result<Config> {
        let argv = std::iter::once("tubegrab").chain(args.iter().copied());
        Config::try_from(Cli::parse_from(argv))
    }

    #[test]
    fn expands_video_id() {
        let config = config(&["-v", "dQw4w9WgXcQ"]).unwrap();
        assert_eq!(
            config.url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn keeps_direct_urls() {
        let config = config(&["-t", "https://www.tiktok.com/@user/video/1"]).unwrap();
        assert_eq!(
            config.url.as_deref(),
            Some("https://www.tiktok.com/@user/video/1")
        );
    }

    #[test]
    fn no_source_defers_to_prompts() {
        let config = config(&["-m", "video"]).unwrap();
        assert!(config.url.is_none());
        assert_eq!(config.mode, Some(Mode::Video));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn rejects_unsupported_flag_url() {
        let err = config(&["-y", "https://example.com/watch?v=abc"]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::UnsupportedUrl(url)) if url == "https://example.com/watch?v=abc"
        ));
    }

    #[test]
    fn rejects_empty_video_id() {
        let err = config(&["-v", ""]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::UnsupportedUrl(url)) if url.is_empty()
        ));
    }

    #[test]
    fn rejects_malformed_tiktok_flag() {
        assert!(config(&["-t", "tiktok.com/@user/video/1"]).is_err());
    }
}
