//! Terminal rendering of pipeline progress.

use std::time::Duration;

use databurn_core::logging::UiLogCallback;
use databurn_core::orchestrator::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar fed by pipeline progress events.
///
/// Log lines from the run are printed above the bar.
#[derive(Clone)]
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(progress_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Callback for `JobRunner::run` progress events.
    pub fn progress_callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |step, percent, message| {
            bar.set_position(u64::from(percent.min(100)));
            bar.set_message(format!("{}: {}", step, message));
        })
    }

    /// Callback for run log lines.
    pub fn log_callback(&self) -> UiLogCallback {
        let bar = self.bar.clone();
        Box::new(move |line| bar.println(line))
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}% | {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-")
}
