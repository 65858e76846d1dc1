//! Recognize step - one reading per frame.
//!
//! Video runs OCR every extracted frame through the configured gatherer.
//! Text runs parse the supplied texts directly. Either way the readings
//! are ordered by frame index.

use crate::gather::{gatherer_for, GatherContext, GatherProgress};
use crate::models::FrameReading;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, RecognizeOutput, RunSource, StepOutcome};

pub struct RecognizeStep;

impl RecognizeStep {
    pub fn new() -> Self {
        Self
    }

    fn parse_texts(&self, ctx: &Context, state: &mut JobState) -> StepOutcome {
        let RunSource::Texts(texts) = &ctx.source else {
            return StepOutcome::Skipped("no frame texts".to_string());
        };

        let parser = ctx.text_parser();
        let mut readings: Vec<FrameReading> = texts
            .iter()
            .map(|t| parser.read(t.frame_index, t.raw_text.clone()))
            .collect();
        readings.sort_by_key(|r| r.frame_index);

        ctx.logger.info(&format!(
            "Parsed {} supplied frame texts ({:?} grammar)",
            readings.len(),
            parser.grammar()
        ));
        log_parse_counts(ctx, &readings);

        state.recognize = Some(RecognizeOutput {
            readings,
            strategy: None,
        });
        StepOutcome::Success
    }

    fn gather(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let frames = state
            .frames()
            .ok_or_else(|| StepError::precondition_failed("Extract step has not run"))?
            .to_vec();

        let ocr = &ctx.settings.ocr;
        let engine = ctx.engine.as_ref();
        let gatherer = gatherer_for(ocr.strategy, ocr.pool_threads(), engine);
        let parser = ctx.text_parser();

        ctx.logger.info(&format!(
            "Recognizing {} frames with {} ({})",
            frames.len(),
            engine.name(),
            gatherer.strategy()
        ));

        let on_progress = |p: GatherProgress| {
            let percent = p.percent();
            if ctx.logger.progress(percent) {
                ctx.report_progress(
                    self.name(),
                    percent,
                    &format!("{}/{} frames", p.completed, p.total),
                );
            }
        };
        let gather_ctx = GatherContext::new(engine, &parser, &ctx.cancel)
            .with_progress(&on_progress)
            .with_logger(&ctx.logger);

        let readings = gatherer.gather(&frames, &gather_ctx);

        if ctx.cancel.is_cancelled() {
            ctx.logger.warn(&format!(
                "Recognition cancelled after {} of {} frames",
                readings.len(),
                frames.len()
            ));
            return Ok(StepOutcome::Skipped("cancelled".to_string()));
        }

        log_parse_counts(ctx, &readings);

        state.recognize = Some(RecognizeOutput {
            readings,
            strategy: Some(gatherer.strategy()),
        });
        Ok(StepOutcome::Success)
    }
}

impl Default for RecognizeStep {
    fn default() -> Self {
        Self::new()
    }
}

fn log_parse_counts(ctx: &Context, readings: &[FrameReading]) {
    let timecodes = readings.iter().filter(|r| r.parsed_timecode.is_some()).count();
    let filenames = readings.iter().filter(|r| r.parsed_filename.is_some()).count();
    ctx.logger.info(&format!(
        "Readings: {} frames, {} with timecode, {} with filename",
        readings.len(),
        timecodes,
        filenames
    ));
}

impl PipelineStep for RecognizeStep {
    fn name(&self) -> &str {
        "Recognize"
    }

    fn description(&self) -> &str {
        "Read burned-in timecode and filename from every frame"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        match &ctx.source {
            // An empty text run is valid and exports header-only lists.
            RunSource::Texts(_) => Ok(()),
            RunSource::Video(_) => {
                ctx.engine.probe()?;
                Ok(())
            }
        }
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        match ctx.source {
            RunSource::Texts(_) => Ok(self.parse_texts(ctx, state)),
            RunSource::Video(_) => self.gather(ctx, state),
        }
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let readings = state
            .readings()
            .ok_or_else(|| StepError::invalid_output("Recognize results not recorded"))?;

        if readings.is_empty() && state.frames().is_some() {
            return Err(StepError::invalid_output("No readings were produced"));
        }

        if let Some(frames) = state.frames() {
            if frames.len() != readings.len() {
                return Err(StepError::invalid_output(format!(
                    "{} frames but {} readings",
                    frames.len(),
                    readings.len()
                )));
            }
        }

        if readings.windows(2).any(|w| w[0].frame_index >= w[1].frame_index) {
            return Err(StepError::invalid_output(
                "Readings repeat a frame index",
            ));
        }

        Ok(())
    }
}
