//! Runs one video (or text file) through the standard pipeline.
//!
//! The runner owns everything around the pipeline: run naming, the per-run
//! logger, the work directory and its cleanup, and the JSON state snapshot
//! written next to the log.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::burnin::RepairSummary;
use crate::config::{ConfigManager, Settings};
use crate::frames::remove_work_dir;
use crate::gather::CancelToken;
use crate::logging::{sanitize_filename, RunLogger, UiLogCallback};
use crate::models::{ClipSegment, FrameText};
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::writers::ExportFormat;

use super::errors::{PipelineError, PipelineResult};
use super::types::{Context, JobState, OutputTarget, ProgressCallback, RunSource};
use super::{create_standard_pipeline, PipelineRunResult};

/// What to run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Used for the log file and run id.
    pub name: String,
    pub source: RunSource,
    pub outputs: Vec<OutputTarget>,
}

impl RunRequest {
    /// OCR a video. The run is named after the file stem.
    pub fn video(path: impl Into<PathBuf>, outputs: Vec<OutputTarget>) -> Self {
        let path = path.into();
        Self {
            name: stem_or(&path, "video"),
            source: RunSource::Video(path),
            outputs,
        }
    }

    /// Assemble already-recognized texts.
    pub fn texts(name: impl Into<String>, texts: Vec<FrameText>, outputs: Vec<OutputTarget>) -> Self {
        Self {
            name: name.into(),
            source: RunSource::Texts(texts),
            outputs,
        }
    }

    /// Default EDL (and optionally FCPXML) targets in `output_dir`, named
    /// after the run.
    pub fn default_outputs(name: &str, output_dir: &Path, fcpxml: bool) -> Vec<OutputTarget> {
        let mut formats = vec![ExportFormat::Edl];
        if fcpxml {
            formats.push(ExportFormat::Fcpxml);
        }
        formats
            .into_iter()
            .map(|format| {
                OutputTarget::new(
                    format,
                    output_dir.join(format!("{}.{}", name, format.extension())),
                )
            })
            .collect()
    }
}

fn stem_or(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub log_path: PathBuf,
    /// JSON state snapshot, if it could be written.
    pub state_path: Option<PathBuf>,
    pub outputs: Vec<OutputTarget>,
    pub segments: Vec<ClipSegment>,
    pub summary: Option<RepairSummary>,
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
}

/// Runs requests through the standard pipeline.
pub struct JobRunner {
    settings: Settings,
    log_dir: PathBuf,
    temp_root: PathBuf,
    engine: Option<Arc<dyn OcrEngine>>,
}

impl JobRunner {
    pub fn new(settings: Settings, log_dir: PathBuf, temp_root: PathBuf) -> Self {
        Self {
            settings,
            log_dir,
            temp_root,
            engine: None,
        }
    }

    /// Runner using the manager's settings and folders.
    pub fn from_config(config: &ConfigManager) -> Self {
        Self::new(
            config.settings().clone(),
            config.logs_folder(),
            config.temp_root(),
        )
    }

    /// Use `engine` instead of tesseract.
    pub fn with_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one request to completion.
    ///
    /// `cancel` is observed per frame while recognizing and between steps.
    pub fn run(
        &self,
        request: RunRequest,
        ui_callback: Option<UiLogCallback>,
        progress_callback: Option<ProgressCallback>,
        cancel: CancelToken,
    ) -> PipelineResult<RunReport> {
        let run_name = request.name.clone();

        let timeline = self
            .settings
            .timeline
            .to_timeline_config()
            .map_err(|e| PipelineError::validation_failed(&run_name, e.to_string()))?;

        let run_id = format!(
            "{}_{}",
            sanitize_filename(&run_name),
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let work_dir = self.temp_root.join(&run_id);

        let logger = RunLogger::new(
            &run_id,
            &self.log_dir,
            self.settings.logging.log_config(),
            ui_callback,
        )
        .map(Arc::new)
        .map_err(|e| {
            PipelineError::setup_failed(&run_name, format!("Failed to create logger: {}", e))
        })?;

        if matches!(request.source, RunSource::Video(_)) {
            fs::create_dir_all(&work_dir).map_err(|e| {
                PipelineError::setup_failed(
                    &run_name,
                    format!("Failed to create work directory: {}", e),
                )
            })?;
        }

        let engine: Arc<dyn OcrEngine> = match &self.engine {
            Some(engine) => Arc::clone(engine),
            None => Arc::new(TesseractEngine::new(self.settings.ocr.tesseract_options())),
        };

        let mut ctx = Context::new(
            request.source,
            self.settings.clone(),
            timeline,
            &run_name,
            work_dir.clone(),
            request.outputs,
            engine,
            Arc::clone(&logger),
        )
        .with_cancel_token(cancel);
        if let Some(callback) = progress_callback {
            ctx = ctx.with_progress_callback(callback);
        }

        logger.info(&format!("Starting run: {}", run_name));
        logger.section("Settings");
        if let Some(video) = ctx.video() {
            logger.info(&format!("Video: {}", video.display()));
        }
        logger.info(&format!(
            "Timeline: {} fps, base {}, {} outputs",
            ctx.timeline.fps,
            ctx.timeline.timeline_base,
            ctx.outputs.len()
        ));

        let mut state = JobState::new(&run_id);
        let pipeline = create_standard_pipeline();
        let result = pipeline.run(&ctx, &mut state);

        let state_path = self.write_snapshot(&logger, &state);
        self.cleanup(&ctx, &logger);

        match result {
            Ok(run_result) => {
                if !run_result.all_completed() {
                    logger.info(&format!(
                        "Skipped {} of {} steps: {}",
                        run_result.steps_skipped.len(),
                        run_result.total_steps(),
                        run_result.steps_skipped.join(", ")
                    ));
                }
                logger.success(&format!("Run completed: {}", run_name));
                logger.flush();
                Ok(self.report(run_id, &logger, state_path, state, run_result))
            }
            Err(e) => {
                if !e.is_cancelled() {
                    logger.show_tail("failure");
                }
                logger.error(&format!("Run failed: {}", e));
                logger.flush();
                Err(e)
            }
        }
    }

    fn report(
        &self,
        run_id: String,
        logger: &RunLogger,
        state_path: Option<PathBuf>,
        state: JobState,
        run_result: PipelineRunResult,
    ) -> RunReport {
        RunReport {
            run_id,
            log_path: logger.log_path().to_path_buf(),
            state_path,
            outputs: state.export.map(|e| e.written).unwrap_or_default(),
            segments: state.segment.map(|s| s.segments).unwrap_or_default(),
            summary: state.resolve.map(|r| r.summary),
            steps_completed: run_result.steps_completed,
            steps_skipped: run_result.steps_skipped,
        }
    }

    /// Write `<log>.json` next to the run log. Failures are only logged.
    fn write_snapshot(&self, logger: &RunLogger, state: &JobState) -> Option<PathBuf> {
        let path = logger.log_path().with_extension("json");
        let written = state
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));

        match written {
            Ok(()) => {
                logger.debug(&format!("State snapshot: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                logger.warn(&format!("Could not write state snapshot: {}", e));
                None
            }
        }
    }

    fn cleanup(&self, ctx: &Context, logger: &RunLogger) {
        if ctx.video().is_none() {
            return;
        }
        if self.settings.extraction.keep_frames {
            logger.info(&format!("Keeping frames in {}", ctx.work_dir.display()));
            return;
        }
        if let Err(e) = remove_work_dir(&ctx.work_dir) {
            logger.warn(&format!("Could not remove work directory: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn runner(root: &Path) -> JobRunner {
        JobRunner::new(Settings::default(), root.join("logs"), root.join("tmp"))
    }

    fn texts() -> Vec<FrameText> {
        vec![
            FrameText::new(0, "TC: 01:00:00:00 Filename: A.mov"),
            FrameText::new(1, "TC: 01:00:00:01 Filename: A.mov"),
            FrameText::new(2, "TC: 02:00:00:00 Filename: B.mov"),
        ]
    }

    #[test]
    fn text_run_writes_outputs_and_snapshot() {
        let dir = tempdir().unwrap();
        let outputs = RunRequest::default_outputs("reel", dir.path(), true);
        let request = RunRequest::texts("reel", texts(), outputs);

        let report = runner(dir.path())
            .run(request, None, None, CancelToken::new())
            .unwrap();

        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.outputs.len(), 2);
        assert!(dir.path().join("reel.edl").exists());
        assert!(dir.path().join("reel.fcpxml").exists());
        assert_eq!(report.steps_skipped, vec!["Extract"]);
        let log = fs::read_to_string(&report.log_path).unwrap();
        assert!(log.contains("--- Settings ---"));
        assert!(log.contains("Skipped 1 of 5 steps: Extract"));
        assert!(log.contains("Timeline: 25 fps, base 10:00:00:00, 2 outputs"));

        let snapshot = fs::read_to_string(report.state_path.unwrap()).unwrap();
        assert!(snapshot.contains("\"segments\""));
        // Text runs never create a work directory.
        assert!(!dir.path().join("tmp").exists());
    }

    #[test]
    fn invalid_timeline_base_is_rejected_up_front() {
        let dir = tempdir().unwrap();
        let mut runner = runner(dir.path());
        runner.settings.timeline.timeline_base = "10:00:00:99".to_string();

        let request = RunRequest::texts("reel", texts(), vec![]);
        let err = runner
            .run(request, None, None, CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, PipelineError::ValidationFailed { .. }));
    }

    #[test]
    fn pre_cancelled_run_reports_cancellation() {
        let dir = tempdir().unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();

        let outputs = RunRequest::default_outputs("reel", dir.path(), false);
        let err = runner(dir.path())
            .run(RunRequest::texts("reel", texts(), outputs), None, None, cancel)
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(!dir.path().join("reel.edl").exists());
    }

    #[test]
    fn video_request_is_named_after_stem() {
        let request = RunRequest::video("/media/reel_04.mov", vec![]);
        assert_eq!(request.name, "reel_04");
        assert!(matches!(request.source, RunSource::Video(_)));
    }

    #[test]
    fn missing_video_fails_and_cleans_work_dir() {
        let dir = tempdir().unwrap();
        let outputs = RunRequest::default_outputs("absent", dir.path(), false);
        let request = RunRequest::video(dir.path().join("absent.mov"), outputs);

        let err = runner(dir.path())
            .run(request, None, None, CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::StepFailed { ref step_name, .. } if step_name == "Extract"
        ));
        let leftovers = fs::read_dir(dir.path().join("tmp")).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
