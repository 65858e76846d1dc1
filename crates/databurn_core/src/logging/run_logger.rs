//! Per-run logger with file and callback output.
//!
//! Every run gets its own log file. Lines also go to an optional UI
//! callback. In compact mode the callback only sees phase-level messages;
//! per-frame OCR text and tool output still reach the file and the tail
//! buffer.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogConfig, LogLevel, MessagePrefix, UiLogCallback};

/// Per-run logger with dual output (file + UI).
pub struct RunLogger {
    log_path: PathBuf,
    file: Mutex<BufWriter<File>>,
    ui_callback: Option<UiLogCallback>,
    config: LogConfig,
    /// Recent OCR text and tool output, shown when a step fails.
    tail: Mutex<VecDeque<String>>,
    /// Last progress value logged (compact mode filtering).
    last_progress: Mutex<u32>,
}

impl RunLogger {
    /// Create a logger writing `<log_dir>/<run_name>.log`.
    pub fn new(
        run_name: &str,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        ui_callback: Option<UiLogCallback>,
    ) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            log_path,
            file: Mutex::new(BufWriter::new(file)),
            ui_callback,
            tail: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
            last_progress: Mutex::new(0),
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Log an external command line.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    pub fn validation(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Validation.format(message));
    }

    /// Log a progress percentage.
    ///
    /// In compact mode only step crossings (and 100%) are logged. Returns
    /// whether the line was written.
    pub fn progress(&self, percent: u32) -> bool {
        if self.config.compact {
            let mut last = self.last_progress.lock();
            let step = self.config.progress_step.max(1);

            let current_step = (percent / step) * step;
            let last_step = (*last / step) * step;

            if current_step <= last_step && percent < 100 {
                return false;
            }
            *last = percent;
        }

        self.log(LogLevel::Info, &format!("Progress: {}%", percent));
        true
    }

    /// Record the raw OCR text of one frame.
    ///
    /// Always written to the file and the tail buffer; forwarded to the UI
    /// only outside compact mode.
    pub fn frame_text(&self, frame_index: u64, text: &str) {
        let line = MessagePrefix::Frame(frame_index).format(text.trim());
        self.push_tail(&line);

        let formatted = self.format_message(&line);
        if self.config.compact {
            self.write_file_line(&formatted);
        } else {
            self.output(&formatted);
        }
    }

    /// Record one line of external tool output.
    ///
    /// In compact mode this only feeds the tail buffer.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        self.push_tail(line);

        if self.config.compact {
            return;
        }

        let prefix = if is_stderr { "[stderr] " } else { "" };
        self.output(&self.format_message(&format!("{}{}", prefix, line)));
    }

    /// Write the tail buffer, typically after a failure.
    pub fn show_tail(&self, header: &str) {
        let buffer = self.tail.lock();
        if buffer.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in buffer.iter() {
            self.output(&self.format_message(line));
        }
    }

    pub fn clear_tail(&self) {
        self.tail.lock().clear();
    }

    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        let _ = self.file.lock().flush();
    }

    fn push_tail(&self, line: &str) {
        if self.config.error_tail == 0 {
            return;
        }
        let mut buffer = self.tail.lock();
        if buffer.len() >= self.config.error_tail {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn write_file_line(&self, formatted: &str) {
        let _ = writeln!(self.file.lock(), "{}", formatted);
    }

    fn output(&self, formatted: &str) {
        self.write_file_line(formatted);

        if let Some(callback) = &self.ui_callback {
            callback(formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Replace characters that are not allowed in filenames.
pub(crate) fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn quiet_config() -> LogConfig {
        LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("reel_04", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("reel_04.log"));
    }

    #[test]
    fn writes_prefixed_lines() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), quiet_config(), None).unwrap();

        logger.phase("Extract");
        logger.command("ffmpeg -i in.mov");
        logger.warn("frame 3 unreadable");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Extract ==="));
        assert!(content.contains("$ ffmpeg -i in.mov"));
        assert!(content.contains("[WARNING] frame 3 unreadable"));
    }

    #[test]
    fn level_filters_debug() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), quiet_config(), None).unwrap();

        logger.debug("hidden");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(!content.contains("hidden"));
    }

    #[test]
    fn compact_frame_text_skips_callback_but_reaches_file() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let callback: UiLogCallback = Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let logger = RunLogger::new("run", dir.path(), quiet_config(), Some(callback)).unwrap();
        logger.frame_text(12, "TC: 01:00:00:00\n");
        logger.info("visible");
        logger.flush();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[OCR #12] TC: 01:00:00:00"));
        assert_eq!(logger.tail(), ["[OCR #12] TC: 01:00:00:00"]);
    }

    #[test]
    fn verbose_mode_forwards_frame_text() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let callback: UiLogCallback = Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let config = LogConfig {
            compact: false,
            ..LogConfig::default()
        };
        let logger = RunLogger::new("run", dir.path(), config, Some(callback)).unwrap();
        logger.frame_text(0, "noise");
        logger.output_line("tesseract: warning", true);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn compact_mode_filters_progress() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();

        assert!(!logger.progress(5));
        assert!(!logger.progress(15));
        assert!(logger.progress(20));
        assert!(!logger.progress(25));
        assert!(logger.progress(40));
        assert!(logger.progress(100));
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            error_tail: 5,
            ..LogConfig::default()
        };
        let logger = RunLogger::new("run", dir.path(), config, None).unwrap();

        for i in 0..10 {
            logger.output_line(&format!("Line {}", i), false);
        }

        let tail = logger.tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");

        logger.clear_tail();
        assert!(logger.tail().is_empty());
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("reel_04"), "reel_04");
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
    }
}
