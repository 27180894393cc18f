//! tubegrab: download YouTube and TikTok audio or video through yt-dlp.
//!
//! Flags fill in what they can; [`prompt`] asks for the rest; [`backend`] hands the
//! assembled request to yt-dlp with progress bars attached.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod progress;
pub mod prompt;
pub mod run;
pub mod source;
