//! Target URL handling: platforms, video ID expansion and the domain allow-list.

use std::fmt;
use url::Url;

/// Watch URL a bare YouTube video ID is appended to.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Host fragments accepted by [`is_supported_url`].
pub const SUPPORTED_DOMAINS: [&str; 3] = ["youtube.com", "youtu.be", "tiktok.com"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    TikTok,
}

impl Platform {
    /// Menu order.
    pub const ALL: [Platform; 2] = [Platform::YouTube, Platform::TikTok];

    /// Prompt shown when asking for a link on this platform.
    pub fn entry_prompt(self) -> &'static str {
        match self {
            Platform::YouTube => "Enter YouTube video URL or video ID",
            Platform::TikTok => "Enter full TikTok video URL",
        }
    }

    /// Turn raw user entry into a URL.
    ///
    /// YouTube accepts a bare ID; anything starting with `http` is taken as a URL.
    /// An empty entry stays empty.
    pub fn expand(self, entry: &str) -> String {
        match self {
            Platform::YouTube if !entry.is_empty() && !entry.starts_with("http") => {
                video_url(entry)
            }
            _ => entry.to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::YouTube => f.write_str("YouTube"),
            Platform::TikTok => f.write_str("TikTok"),
        }
    }
}

/// Watch URL for a YouTube video ID.
pub fn video_url(id: &str) -> String {
    format!("{YOUTUBE_WATCH_URL}{id}")
}

/// Absolute `scheme://host` URL whose host contains a supported domain.
pub fn is_supported_url(candidate: &str) -> bool {
    let Ok(url) = Url::parse(candidate) else {
        return false;
    };

    // `Url::parse` also takes `http:host` without the slashes
    let has_authority = candidate
        .get(url.scheme().len()..)
        .is_some_and(|rest| rest.starts_with("://"));
    if !has_authority {
        return false;
    }

    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        SUPPORTED_DOMAINS.iter().any(|domain| host.contains(domain))
    })
}
