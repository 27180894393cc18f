//! Resolution flow: fill in whatever the flags left open, then download.

use crate::backend::{AudioRequest, Downloader, VideoRequest};
use crate::cli::Mode;
use crate::config::Config;
use crate::prompt::{Console, Prompter, Retry};
use crate::source::is_supported_url;
use eyre::Result;
use std::process::ExitCode;
use tubegrab_dl::presets::{AudioPreset, VideoPreset};

/// How a run ended when no error occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// User declined to retry after an invalid URL
    Aborted,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed => ExitCode::SUCCESS,
            Outcome::Aborted => ExitCode::FAILURE,
        }
    }
}

/// Ask for platform and link until a supported URL is entered.
///
/// Returns `None` when the user chooses to exit.
fn prompt_url<C: Console>(prompter: &mut Prompter<C>) -> Result<Option<String>> {
    let platform = prompter.platform()?;

    loop {
        let entry = prompter.url_entry(platform)?;
        let url = platform.expand(&entry);

        if is_supported_url(&url) {
            return Ok(Some(url));
        }

        tracing::debug!(url, "rejected url");

        if prompter.retry_or_exit()? == Retry::Exit {
            prompter.notice("Exiting.")?;
            return Ok(None);
        }
    }
}

/// Ask the source which resolutions exist and let the user pick one.
///
/// `None` selects the best available when the source lists no muxed formats.
fn discover_resolution<C: Console>(
    url: &str,
    prompter: &mut Prompter<C>,
    downloader: &impl Downloader,
) -> Result<Option<String>> {
    prompter.notice("Fetching available video resolutions...")?;

    let available = downloader.list_resolutions(url)?;

    if available.is_empty() {
        prompter.notice("No video resolutions found, defaulting to best.")?;
        return Ok(None);
    }

    Ok(Some(prompter.resolution(available)?))
}

/// Run one download, prompting for anything `config` leaves open.
pub fn execute<C: Console>(
    config: Config,
    prompter: &mut Prompter<C>,
    downloader: &impl Downloader,
) -> Result<Outcome> {
    let url = match config.url {
        Some(url) => url,
        None => match prompt_url(prompter)? {
            Some(url) => url,
            None => return Ok(Outcome::Aborted),
        },
    };

    let mode = match config.mode {
        Some(mode) => mode,
        None => prompter.mode()?,
    };

    tracing::info!(url, %mode, "resolved target");

    match mode {
        Mode::Audio => {
            let codec = match config.codec {
                Some(codec) => codec,
                None => prompter.audio_codec()?,
            };
            let bitrate = match config.bitrate {
                Some(bitrate) => bitrate,
                None => prompter.bitrate()?,
            };

            downloader.download_audio(&AudioRequest {
                url,
                preset: AudioPreset::new(codec, bitrate),
                output_dir: config.output_dir,
            })?;
        }
        Mode::Video => {
            let resolution = match config.resolution {
                Some(resolution) => Some(resolution),
                None => discover_resolution(&url, prompter, downloader)?,
            };

            downloader.download_video(&VideoRequest {
                url,
                preset: VideoPreset { resolution },
                output_dir: config.output_dir,
            })?;
        }
    }

    Ok(Outcome::Completed)
}
