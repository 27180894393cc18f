//! yt-dlp Python API wrappers.
//!
//! Type-safe bindings to [yt-dlp](https://github.com/yt-dlp/yt-dlp) `YoutubeDL` parameters.
//!
//! ```no_run
//! use tubegrab_dl::dl::download;
//! use tubegrab_dl::presets::{AudioCodec, AudioPreset};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let preset = AudioPreset::new(AudioCodec::Mp3, "192");
//! let info = download("https://youtube.com/watch?v=example", preset.into(), None)?;
//! println!("Downloaded: {}", info.title);
//! # Ok(())
//! # }
//! ```

use pyo3::ffi::c_str;
use pyo3::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Filename templates using `%(field)s` syntax. Key `default` required.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputTemplates(pub Option<HashMap<String, String>>);

impl OutputTemplates {
    /// Create with a single default template.
    pub fn simple(default: String) -> Self {
        Self(Some(HashMap::from([("default".to_string(), default)])))
    }
}

/// Download directories: `home`, `temp`, optional type-specific paths.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct OutputPaths(pub Option<HashMap<String, String>>);

impl OutputPaths {
    pub fn with_home(self, home: &Path) -> Self {
        self.with_key("home".to_string(), home)
    }

    /// Directory the final files land in, if set.
    pub fn home(&self) -> Option<&str> {
        self.0.as_ref()?.get("home").map(String::as_str)
    }

    fn with_key(self, key: String, value: &Path) -> Self {
        let mut inner = self.0.unwrap_or_default();
        inner.insert(key, value.to_string_lossy().to_string());
        Self(Some(inner))
    }
}

/// Post-download operation: `key` (e.g., `"FFmpegExtractAudio"`), optional codec and quality.
///
/// `preferredquality` is a kbps value for lossy codecs (e.g. `"192"`).
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct PostProcessor {
    pub key: String,
    pub preferredcodec: Option<String>,
    pub preferredquality: Option<String>,
}

/// yt-dlp download configuration passed to `YoutubeDL(params)`.
///
/// `None` fields are dropped before the dict reaches yt-dlp, so its own defaults apply.
#[derive(Clone, Debug, Default, IntoPyObject)]
pub struct DownloadOptions {
    pub format: Option<String>,
    pub paths: Option<OutputPaths>,
    pub outtmpl: Option<OutputTemplates>,
    pub postprocessors: Option<Vec<PostProcessor>>,
    pub merge_output_format: Option<String>,
    pub noplaylist: Option<bool>,
    pub skip_download: Option<bool>,
    pub quiet: Option<bool>,
    pub no_warnings: Option<bool>,
}

/// Essential metadata from yt-dlp info dict.
///
/// Extracted via `FromPyObject` from the sanitized info dict returned by `extract_info`.
#[derive(Clone, Debug, FromPyObject)]
#[pyo3(from_item_all)]
pub struct DownloadInfo {
    /// Video identifier (required by yt-dlp)
    pub id: String,
    /// Video title (required by yt-dlp)
    pub title: String,
    /// Extractor name (e.g., "Youtube", "TikTok")
    #[pyo3(default)]
    pub extractor_key: Option<String>,
    /// Full name of the video uploader
    #[pyo3(default)]
    pub uploader: Option<String>,
    /// Length of the video in seconds
    #[pyo3(default)]
    pub duration: Option<f64>,
    /// URL to the video webpage
    #[pyo3(default)]
    pub webpage_url: Option<String>,
    /// Extension of the downloaded media, before post-processing
    #[pyo3(default)]
    pub ext: Option<String>,
}

/// One entry of the `formats` list in an info dict.
#[derive(Clone, Debug, Default, FromPyObject)]
#[pyo3(from_item_all)]
pub struct FormatEntry {
    /// Always set by yt-dlp
    pub format_id: String,
    /// Video codec, or the literal `"none"` for audio-only streams
    #[pyo3(default)]
    pub vcodec: Option<String>,
    /// Audio codec, or the literal `"none"` for video-only streams
    #[pyo3(default)]
    pub acodec: Option<String>,
    /// Human label such as `"720p"` or `"medium"`
    #[pyo3(default)]
    pub format_note: Option<String>,
    #[pyo3(default)]
    pub height: Option<u32>,
    #[pyo3(default)]
    pub ext: Option<String>,
}

impl FormatEntry {
    /// Whether the stream carries both audio and video.
    ///
    /// Only an explicit `"none"` rules a codec out; unknown codecs count as present.
    pub fn is_muxed(&self) -> bool {
        self.vcodec.as_deref() != Some("none") && self.acodec.as_deref() != Some("none")
    }

    /// `format_note` when non-empty, else the height as `"<height>p"`.
    pub fn resolution_label(&self) -> Option<String> {
        match (self.format_note.as_deref(), self.height) {
            (Some(note), _) if !note.is_empty() => Some(note.to_string()),
            (_, Some(height)) if height > 0 => Some(format!("{height}p")),
            _ => None,
        }
    }
}

/// Info dict subset returned by a metadata-only extraction.
#[derive(Clone, Debug, FromPyObject)]
#[pyo3(from_item_all)]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    #[pyo3(default)]
    pub formats: Vec<FormatEntry>,
}

impl MediaInfo {
    /// Distinct resolution labels of muxed formats.
    pub fn muxed_resolutions(&self) -> BTreeSet<String> {
        self.formats
            .iter()
            .filter(|f| f.is_muxed())
            .filter_map(FormatEntry::resolution_label)
            .collect()
    }
}

/// Progress dict passed by yt-dlp to each entry of `progress_hooks`.
#[derive(Clone, Debug, Default, FromPyObject)]
#[pyo3(from_item_all)]
pub struct ProgressEvent {
    /// `"downloading"`, `"finished"` or `"error"`
    pub status: String,
    #[pyo3(default)]
    pub downloaded_bytes: Option<u64>,
    #[pyo3(default)]
    pub total_bytes: Option<u64>,
    /// Set when the server does not report an exact size
    #[pyo3(default)]
    pub total_bytes_estimate: Option<f64>,
    #[pyo3(default)]
    pub filename: Option<String>,
}

impl ProgressEvent {
    pub fn is_downloading(&self) -> bool {
        self.status == "downloading"
    }

    pub fn is_finished(&self) -> bool {
        self.status == "finished"
    }

    /// Completion in percent, clamped to `0..=100`.
    ///
    /// Uses the exact total, then the estimate; 0 when neither is known.
    pub fn percent(&self) -> f64 {
        let total = self
            .total_bytes
            .filter(|&t| t > 0)
            .map(|t| t as f64)
            .or(self.total_bytes_estimate.filter(|&t| t > 0.0));

        match (total, self.downloaded_bytes) {
            (Some(total), Some(done)) => (done as f64 / total * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }
}

type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Python callable forwarding yt-dlp progress dicts to a Rust closure.
#[pyclass(frozen)]
pub struct ProgressHook {
    callback: ProgressCallback,
}

impl ProgressHook {
    pub fn new(callback: impl Fn(&ProgressEvent) + Send + Sync + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }
}

#[pymethods]
impl ProgressHook {
    fn __call__(&self, event: ProgressEvent) {
        (self.callback)(&event);
    }
}

fn load_module(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    PyModule::from_code(py, c_str!(include_str!("./dl.py")), c"dl.py", c"dl")
}

/// Download a single URL and return the info dict.
///
/// Uses `extract_info(url, download=True)`; post-processors (transcode, merge) run
/// before this returns. `hook` is registered as the only progress hook.
pub fn download(
    url: &str,
    opts: DownloadOptions,
    hook: Option<ProgressHook>,
) -> Result<DownloadInfo, PyErr> {
    Python::attach(|py| {
        let module = load_module(py)?;

        let py_params = opts.into_pyobject(py)?;

        if let Some(hook) = hook {
            py_params.set_item("progress_hooks", vec![Bound::new(py, hook)?])?;
        }

        let info = module.getattr("download")?.call1((url, py_params))?;

        info.extract()
    })
}

/// Fetch metadata, including the available formats, without downloading.
pub fn extract_info(url: &str, opts: DownloadOptions) -> Result<MediaInfo, PyErr> {
    Python::attach(|py| {
        let module = load_module(py)?;

        let py_params = opts.into_pyobject(py)?;

        let info = module.getattr("extract_info")?.call1((url, py_params))?;

        info.extract()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::types::PyAnyMethods;
    use std::ffi::CStr;
    use std::sync::{Arc, Mutex};

    /// Compare Python object with dict/list literal using recursive equality.
    #[track_caller]
    fn assert_py_eq(py: Python, py_obj: &Bound<PyAny>, expected: &'static CStr) {
        let py_expected = py.eval(expected, None, None).unwrap();
        assert!(py_obj.eq(&py_expected).unwrap());
    }

    fn format(
        vcodec: &str,
        acodec: &str,
        note: Option<&str>,
        height: Option<u32>,
    ) -> FormatEntry {
        FormatEntry {
            format_id: format!("{vcodec}-{acodec}"),
            vcodec: Some(vcodec.to_string()),
            acodec: Some(acodec.to_string()),
            format_note: note.map(str::to_string),
            height,
            ..Default::default()
        }
    }

    #[test]
    fn output_templates_simple() {
        Python::attach(|py| {
            let templates = OutputTemplates::simple("%(title)s.%(ext)s".to_string());
            let py_obj = templates.into_pyobject(py).unwrap();
            assert_py_eq(py, py_obj.as_any(), c"{'default': '%(title)s.%(ext)s'}");
        });
    }

    #[test]
    fn paths_with_home() {
        let paths = OutputPaths::default().with_home(Path::new("/tmp/media"));
        assert_eq!(paths.home(), Some("/tmp/media"));

        Python::attach(|py| {
            let py_obj = paths.into_pyobject(py).unwrap();
            assert_py_eq(py, py_obj.as_any(), c"{'home': '/tmp/media'}");
        });
    }

    #[test]
    fn postprocessor_with_quality() {
        Python::attach(|py| {
            let processor = PostProcessor {
                key: "FFmpegExtractAudio".to_string(),
                preferredcodec: Some("opus".to_string()),
                preferredquality: Some("256".to_string()),
            };
            let py_obj = processor.into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                py_obj.as_any(),
                c"{'key': 'FFmpegExtractAudio', 'preferredcodec': 'opus', 'preferredquality': '256'}",
            );
        });
    }

    #[test]
    fn dl_options_custom() {
        Python::attach(|py| {
            let opts = DownloadOptions {
                format: Some("bestvideo+bestaudio/best".to_string()),
                merge_output_format: Some("mp4".to_string()),
                noplaylist: Some(true),
                ..Default::default()
            };
            let py_obj = opts.into_pyobject(py).unwrap();
            assert_py_eq(
                py,
                py_obj.as_any(),
                c"{'format': 'bestvideo+bestaudio/best', 'paths': None, 'outtmpl': None, 'postprocessors': None, 'merge_output_format': 'mp4', 'noplaylist': True, 'skip_download': None, 'quiet': None, 'no_warnings': None}"
            );
        });
    }

    #[test]
    fn extracts_media_info_with_partial_formats() {
        Python::attach(|py| {
            let dict = py
                .eval(
                    c"{'id': 'abc', 'title': 'Clip', 'formats': [{'format_id': '18', 'vcodec': 'avc1', 'acodec': 'mp4a', 'height': 360}, {'format_id': '140', 'vcodec': 'none', 'acodec': 'mp4a'}]}",
                    None,
                    None,
                )
                .unwrap();

            let info: MediaInfo = dict.extract().unwrap();

            assert_eq!(info.title, "Clip");
            assert_eq!(info.formats.len(), 2);
            assert_eq!(info.formats[0].height, Some(360));
            assert_eq!(info.formats[1].format_id, "140");
            assert_eq!(info.formats[1].format_note, None);
        });
    }

    #[test]
    fn format_without_id_is_rejected() {
        Python::attach(|py| {
            let dict = py
                .eval(c"{'id': 'abc', 'title': 'Clip', 'formats': [{'vcodec': 'avc1'}]}", None, None)
                .unwrap();

            assert!(dict.extract::<MediaInfo>().is_err());
        });
    }

    #[test]
    fn progress_hook_forwards_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook = ProgressHook::new(move |event| {
            sink.lock().unwrap().push((event.status.clone(), event.percent()));
        });

        Python::attach(|py| {
            let hook = Bound::new(py, hook).unwrap();
            let downloading = py
                .eval(
                    c"{'status': 'downloading', 'downloaded_bytes': 50, 'total_bytes': 200}",
                    None,
                    None,
                )
                .unwrap();
            let finished = py.eval(c"{'status': 'finished'}", None, None).unwrap();

            hook.call1((downloading,)).unwrap();
            hook.call1((finished,)).unwrap();
        });

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![("downloading".to_string(), 25.0), ("finished".to_string(), 0.0)]
        );
    }

    #[test]
    fn percent_prefers_exact_total() {
        let event = ProgressEvent {
            status: "downloading".to_string(),
            downloaded_bytes: Some(300),
            total_bytes: Some(1200),
            total_bytes_estimate: Some(600.0),
            ..Default::default()
        };
        assert!((event.percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn percent_falls_back_to_estimate() {
        let event = ProgressEvent {
            status: "downloading".to_string(),
            downloaded_bytes: Some(300),
            total_bytes: None,
            total_bytes_estimate: Some(600.0),
            ..Default::default()
        };
        assert!((event.percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn percent_is_zero_without_total() {
        let event = ProgressEvent {
            status: "downloading".to_string(),
            downloaded_bytes: Some(300),
            ..Default::default()
        };
        assert_eq!(event.percent(), 0.0);
    }

    #[test]
    fn percent_clamps_overshooting_estimate() {
        let event = ProgressEvent {
            status: "downloading".to_string(),
            downloaded_bytes: Some(900),
            total_bytes_estimate: Some(600.0),
            ..Default::default()
        };
        assert_eq!(event.percent(), 100.0);
    }

    #[test]
    fn muxed_requires_both_codecs() {
        assert!(format("avc1", "mp4a", None, Some(360)).is_muxed());
        assert!(!format("none", "opus", None, None).is_muxed());
        assert!(!format("vp9", "none", None, Some(1080)).is_muxed());
        assert!(FormatEntry::default().is_muxed());
    }

    #[test]
    fn resolution_label_prefers_format_note() {
        assert_eq!(
            format("avc1", "mp4a", Some("medium"), Some(360)).resolution_label(),
            Some("medium".to_string())
        );
        assert_eq!(
            format("avc1", "mp4a", Some(""), Some(720)).resolution_label(),
            Some("720p".to_string())
        );
        assert_eq!(format("avc1", "mp4a", None, None).resolution_label(), None);
    }

    #[test]
    fn muxed_resolutions_are_distinct() {
        let info = MediaInfo {
            id: "abc".to_string(),
            title: "Clip".to_string(),
            formats: vec![
                format("avc1", "mp4a", None, Some(360)),
                format("avc1", "mp4a", Some("360p"), Some(360)),
                format("avc1", "mp4a", None, Some(720)),
                format("vp9", "none", None, Some(1080)),
                format("none", "opus", None, None),
            ],
        };

        let labels: Vec<_> = info.muxed_resolutions().into_iter().collect();
        assert_eq!(labels, vec!["360p", "720p"]);
    }
}
