//! Pipeline orchestrator for coordinating runs.
//!
//! A run is a sequence of steps that validate, execute, and record their
//! results in a shared [`JobState`].
//!
//! # Architecture
//!
//! ```text
//! Pipeline
//!     ├── Step: Extract    (ffmpeg → frame images)
//!     ├── Step: Recognize  (OCR + parse → readings)
//!     ├── Step: Resolve    (gap filling)
//!     ├── Step: Segment    (run-length grouping)
//!     └── Step: Export     (EDL / FCPXML)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use databurn_core::config::Settings;
//! use databurn_core::gather::CancelToken;
//! use databurn_core::orchestrator::{JobRunner, RunRequest};
//! use std::path::{Path, PathBuf};
//!
//! let runner = JobRunner::new(Settings::default(), PathBuf::from(".logs"), PathBuf::from(".temp"));
//! let outputs = RunRequest::default_outputs("reel_04", Path::new("out"), true);
//! let request = RunRequest::video("reel_04.mov", outputs);
//!
//! let report = runner.run(request, None, None, CancelToken::new()).unwrap();
//! println!("{} segments", report.segments.len());
//! ```

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use runner::{JobRunner, RunReport, RunRequest};
pub use step::PipelineStep;
pub use steps::{ExportStep, ExtractStep, RecognizeStep, ResolveStep, SegmentStep};
pub use types::{
    Context, ExportOutput, ExtractOutput, JobState, OutputTarget, ProgressCallback,
    RecognizeOutput, ResolveOutput, RunSource, SegmentOutput, StepOutcome,
};

/// Create a standard pipeline with all steps in the correct order.
///
/// 1. Extract - decode frames (skipped for text runs)
/// 2. Recognize - one reading per frame
/// 3. Resolve - fill missing timecodes and filenames
/// 4. Segment - group frames into clip segments
/// 5. Export - write the requested lists
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ExtractStep::new())
        .with_step(RecognizeStep::new())
        .with_step(ResolveStep::new())
        .with_step(SegmentStep::new())
        .with_step(ExportStep::new())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use super::types::{Context, RunSource};
    use crate::burnin::TimelineConfig;
    use crate::config::Settings;
    use crate::gather::testing::TableEngine;
    use crate::logging::{LogConfig, RunLogger};
    use crate::models::FrameText;
    use crate::ocr::OcrEngine;

    fn context(dir: &Path, source: RunSource, engine: Arc<dyn OcrEngine>) -> Context {
        let logger = RunLogger::new("test", dir.join("logs"), LogConfig::default(), None).unwrap();
        Context::new(
            source,
            Settings::default(),
            TimelineConfig::default(),
            "test",
            dir.join("work"),
            Vec::new(),
            engine,
            Arc::new(logger),
        )
    }

    /// Context for a run over the given texts, frame indices 0, 1, ...
    pub fn text_context(dir: &Path, texts: &[&str]) -> Context {
        let texts = texts
            .iter()
            .enumerate()
            .map(|(i, t)| FrameText::new(i as u64, *t))
            .collect();
        let (engine, _) = TableEngine::new(&[]);
        context(dir, RunSource::Texts(texts), Arc::new(engine))
    }

    pub fn video_context(dir: &Path, video: PathBuf, texts: &[&str]) -> Context {
        let (engine, _) = TableEngine::new(texts);
        context(dir, RunSource::Video(video), Arc::new(engine))
    }

    pub fn video_context_with_engine(dir: &Path, engine: Arc<dyn OcrEngine>) -> Context {
        context(dir, RunSource::Video(dir.join("input.mov")), engine)
    }
}
