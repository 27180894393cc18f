//! Terminal progress bars for downloads and the conversion step.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tubegrab_dl::dl::ProgressEvent;

/// Download bar length in hundredths of a percent.
const DOWNLOAD_SCALE: u64 = 10_000;

/// 40-cell bar followed by the message slot.
fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} |{bar:40}| {msg}")
        .expect("static template")
        .progress_chars("█-")
}

fn percent_message(percent: f64) -> String {
    format!("{percent:6.2}%")
}

/// Renders yt-dlp progress events as a bar redrawn in place.
///
/// A bar starts on the first `downloading` event and ends on `finished`, so a
/// video+audio download shows one bar per stream.
pub struct DownloadProgress {
    target: fn() -> ProgressDrawTarget,
    bar: Mutex<Option<ProgressBar>>,
}

impl Default for DownloadProgress {
    fn default() -> Self {
        Self::with_target(ProgressDrawTarget::stdout)
    }
}

impl DownloadProgress {
    pub fn with_target(target: fn() -> ProgressDrawTarget) -> Self {
        Self {
            target,
            bar: Mutex::new(None),
        }
    }

    fn start(&self) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(Some(DOWNLOAD_SCALE), (self.target)());
        bar.set_style(bar_style());
        bar.set_prefix("Downloading:");
        bar
    }

    pub fn handle(&self, event: &ProgressEvent) {
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);

        if event.is_downloading() {
            let percent = event.percent();
            let bar = slot.get_or_insert_with(|| self.start());
            bar.set_position((percent * 100.0).round() as u64);
            bar.set_message(percent_message(percent));
        } else if event.is_finished() {
            match slot.take() {
                Some(bar) => {
                    bar.set_position(DOWNLOAD_SCALE);
                    let done = format!("{} Download complete.", percent_message(100.0));
                    bar.finish_with_message(done);
                }
                None => tracing::debug!(file = ?event.filename, "finished without progress"),
            }
        } else if let Some(bar) = slot.take() {
            tracing::warn!(status = %event.status, "download stopped");
            bar.abandon();
        }
    }

    /// Position of the active bar, in hundredths of a percent.
    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        let slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(ProgressBar::position)
    }
}

/// Timed animation shown after audio extraction.
///
/// yt-dlp transcodes inside the blocking download call and reports no progress for it,
/// so this only paces a fixed number of steps.
pub struct ConversionProgress {
    pub steps: u64,
    pub step_delay: Duration,
    target: fn() -> ProgressDrawTarget,
}

impl Default for ConversionProgress {
    fn default() -> Self {
        Self {
            steps: 40,
            step_delay: Duration::from_millis(30),
            target: ProgressDrawTarget::stdout,
        }
    }
}

impl ConversionProgress {
    pub fn with_target(mut self, target: fn() -> ProgressDrawTarget) -> Self {
        self.target = target;
        self
    }

    /// Run the animation to completion and return the finished bar.
    pub fn run(&self) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(Some(self.steps), (self.target)());
        bar.set_style(bar_style());
        bar.set_prefix("Conversion:");
        bar.println("Converting to audio format...");

        for step in 0..=self.steps {
            bar.set_position(step);
            bar.set_message(percent_message(step as f64 / self.steps.max(1) as f64 * 100.0));
            if step < self.steps {
                thread::sleep(self.step_delay);
            }
        }

        bar.finish_with_message(format!("{} Conversion finished!", percent_message(100.0)));
        bar
    }
}
