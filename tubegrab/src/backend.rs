//! Downloader seam between the interactive flow and yt-dlp.

use crate::progress::{ConversionProgress, DownloadProgress};
use eyre::{Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tubegrab_dl::dl::{ProgressHook, download, extract_info};
use tubegrab_dl::presets::{AudioPreset, VideoPreset, resolution_query, with_output_dir};

/// Audio-only acquisition of one URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioRequest {
    pub url: String,
    pub preset: AudioPreset,
    pub output_dir: PathBuf,
}

/// Video + audio acquisition of one URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoRequest {
    pub url: String,
    pub preset: VideoPreset,
    pub output_dir: PathBuf,
}

/// Operations the run needs from a media backend.
pub trait Downloader {
    /// Download best audio and transcode it; blocks until the file is written.
    fn download_audio(&self, request: &AudioRequest) -> Result<()>;

    /// Download best video + audio and merge them; blocks until the file is written.
    fn download_video(&self, request: &VideoRequest) -> Result<()>;

    /// Resolution labels of the muxed formats offered for `url`.
    fn list_resolutions(&self, url: &str) -> Result<BTreeSet<String>>;
}

/// [`Downloader`] backed by the yt-dlp Python package.
#[derive(Default)]
pub struct YtDlp {
    conversion: ConversionProgress,
}

fn progress_hook() -> ProgressHook {
    let progress = DownloadProgress::default();
    ProgressHook::new(move |event| progress.handle(event))
}

impl Downloader for YtDlp {
    fn download_audio(&self, request: &AudioRequest) -> Result<()> {
        tracing::info!(
            url = %request.url,
            codec = %request.preset.codec,
            bitrate = %request.preset.bitrate,
            "downloading audio"
        );

        let opts = with_output_dir(request.preset.clone().into(), &request.output_dir);
        let info = download(&request.url, opts, Some(progress_hook()))
            .wrap_err_with(|| format!("failed to download audio from {}", request.url))?;

        tracing::info!(title = %info.title, dir = ?request.output_dir.display(), "audio saved");

        self.conversion.run();

        Ok(())
    }

    fn download_video(&self, request: &VideoRequest) -> Result<()> {
        tracing::info!(
            url = %request.url,
            resolution = ?request.preset.resolution,
            "downloading video"
        );

        let opts = with_output_dir(request.preset.clone().into(), &request.output_dir);
        let info = download(&request.url, opts, Some(progress_hook()))
            .wrap_err_with(|| format!("failed to download video from {}", request.url))?;

        tracing::info!(title = %info.title, dir = ?request.output_dir.display(), "video saved");

        Ok(())
    }

    fn list_resolutions(&self, url: &str) -> Result<BTreeSet<String>> {
        let info = extract_info(url, resolution_query())
            .wrap_err_with(|| format!("failed to retrieve video info for {url}"))?;

        let resolutions = info.muxed_resolutions();

        tracing::debug!(
            formats = info.formats.len(),
            muxed = resolutions.len(),
            "listed formats"
        );

        Ok(resolutions)
    }
}
