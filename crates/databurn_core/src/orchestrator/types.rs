//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::burnin::{RepairSummary, TextParser, TimelineConfig};
use crate::config::Settings;
use crate::frames::FrameFile;
use crate::gather::{CancelToken, GatherStrategy};
use crate::logging::RunLogger;
use crate::models::{ClipSegment, FrameReading, FrameText, ResolvedFrame};
use crate::ocr::OcrEngine;
use crate::writers::ExportFormat;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Where the run's frame texts come from.
#[derive(Debug, Clone)]
pub enum RunSource {
    /// Decode this video and OCR every frame.
    Video(PathBuf),
    /// Texts already recognized elsewhere.
    Texts(Vec<FrameText>),
}

/// One file the Export step writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTarget {
    pub format: ExportFormat,
    pub path: PathBuf,
}

impl OutputTarget {
    pub fn new(format: ExportFormat, path: impl Into<PathBuf>) -> Self {
        Self {
            format,
            path: path.into(),
        }
    }
}

/// Read-only context passed to pipeline steps.
///
/// Mutable results go in `JobState`.
pub struct Context {
    pub source: RunSource,
    pub settings: Settings,
    /// Validated timeline conventions derived from `settings`.
    pub timeline: TimelineConfig,
    pub run_name: String,
    /// Run-specific working directory (under temp_root).
    pub work_dir: PathBuf,
    pub outputs: Vec<OutputTarget>,
    pub engine: Arc<dyn OcrEngine>,
    pub cancel: CancelToken,
    pub logger: Arc<RunLogger>,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: RunSource,
        settings: Settings,
        timeline: TimelineConfig,
        run_name: impl Into<String>,
        work_dir: PathBuf,
        outputs: Vec<OutputTarget>,
        engine: Arc<dyn OcrEngine>,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            source,
            settings,
            timeline,
            run_name: run_name.into(),
            work_dir,
            outputs,
            engine,
            cancel: CancelToken::new(),
            logger,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Share an existing cancellation flag.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }

    /// Parser matching the configured grammar and frame rate.
    pub fn text_parser(&self) -> TextParser {
        TextParser::new(self.settings.timeline.grammar, self.timeline.fps)
    }

    /// The input video, when the run starts from one.
    pub fn video(&self) -> Option<&Path> {
        match &self.source {
            RunSource::Video(path) => Some(path),
            RunSource::Texts(_) => None,
        }
    }

    /// Directory ffmpeg writes frames into.
    pub fn frames_dir(&self) -> PathBuf {
        self.work_dir.join("frames")
    }
}

/// Results accumulated by the steps of one run.
///
/// Each step writes its own section once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobState {
    pub run_id: String,
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognize: Option<RecognizeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResolveOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<SegmentOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportOutput>,
}

impl JobState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    pub fn frames(&self) -> Option<&[FrameFile]> {
        self.extract.as_ref().map(|e| e.frames.as_slice())
    }

    pub fn readings(&self) -> Option<&[FrameReading]> {
        self.recognize.as_ref().map(|r| r.readings.as_slice())
    }

    pub fn resolved(&self) -> Option<&[ResolvedFrame]> {
        self.resolve.as_ref().map(|r| r.resolved.as_slice())
    }

    pub fn segments(&self) -> Option<&[ClipSegment]> {
        self.segment.as_ref().map(|s| s.segments.as_slice())
    }

    /// Pretty JSON snapshot for diagnostics.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Output from the Extract step.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractOutput {
    pub frames_dir: PathBuf,
    pub frames: Vec<FrameFile>,
}

/// Output from the Recognize step.
#[derive(Debug, Clone, Serialize)]
pub struct RecognizeOutput {
    /// Ordered by frame index.
    pub readings: Vec<FrameReading>,
    /// `None` when texts were supplied instead of recognized.
    pub strategy: Option<GatherStrategy>,
}

/// Output from the Resolve step.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveOutput {
    pub resolved: Vec<ResolvedFrame>,
    pub summary: RepairSummary,
}

/// Output from the Segment step.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentOutput {
    pub segments: Vec<ClipSegment>,
}

/// Output from the Export step.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    pub written: Vec<OutputTarget>,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Nothing to do; not an error.
    Skipped(String),
}
