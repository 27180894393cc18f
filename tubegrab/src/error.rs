//! Errors raised while collecting input from flags or the terminal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// URL is malformed or not on a supported platform
    #[error("unsupported URL: {0:?} (expected a YouTube or TikTok link)")]
    UnsupportedUrl(String),

    /// Bitrate flag is not a kbps number
    #[error("invalid bitrate: {0:?} (expected kbps, e.g. 192)")]
    InvalidBitrate(String),

    /// Standard input reached EOF while a prompt was waiting
    #[error("input closed while waiting for a selection")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Terminal(#[from] dialoguer::Error),
}
