//! Type-safe Rust bindings to [yt-dlp](https://github.com/yt-dlp/yt-dlp) Python library.
//!
//! ## Modules
//!
//! - [`dl`] - Core yt-dlp API wrappers, info dict types and progress hooks
//! - [`presets`] - Audio extraction and video merge presets
//!
//! ## Quick Start
//!
//! **Audio preset** (best audio transcoded to mp3 at 192 kbps):
//! ```no_run
//! use tubegrab_dl::dl::download;
//! use tubegrab_dl::presets::{AudioCodec, AudioPreset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! download(
//!     "https://youtube.com/watch?v=example",
//!     AudioPreset::new(AudioCodec::Mp3, "192").into(),
//!     None,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! **Progress reporting**:
//! ```no_run
//! use tubegrab_dl::dl::{ProgressHook, download};
//! use tubegrab_dl::presets::VideoPreset;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hook = ProgressHook::new(|event| {
//!     if event.is_downloading() {
//!         eprint!("\r{:6.2}%", event.percent());
//!     }
//! });
//!
//! download(
//!     "https://youtube.com/watch?v=example",
//!     VideoPreset::new(Some("720p")).into(),
//!     Some(hook),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod dl;
pub mod presets;
