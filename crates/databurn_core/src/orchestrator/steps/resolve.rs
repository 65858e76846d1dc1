//! Resolve step - fills timecode and filename gaps frame by frame.

use crate::burnin::{resolve, RepairSummary};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, ResolveOutput, StepOutcome};

pub struct ResolveStep;

impl ResolveStep {
    pub fn new() -> Self {
        Self
    }

    fn log_summary(&self, ctx: &Context, summary: &RepairSummary) {
        ctx.logger.info(&format!(
            "Timecodes: {} read, {} from previous, {} from next, {} defaulted",
            summary.parsed, summary.from_previous, summary.from_next, summary.defaulted
        ));
        ctx.logger.info(&format!(
            "Filenames: {} carried forward, {} unknown",
            summary.filenames_carried, summary.filenames_unknown
        ));

        if summary.defaulted > 0 {
            ctx.logger.warn(&format!(
                "{} frames had no usable timecode nearby and were set to {}",
                summary.defaulted, ctx.timeline.default_timecode
            ));
        }
        if summary.frames > 0 && summary.parsed == 0 {
            ctx.logger
                .warn("No frame carried a readable timecode; check the crop region and grammar");
        }
    }
}

impl Default for ResolveStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ResolveStep {
    fn name(&self) -> &str {
        "Resolve"
    }

    fn description(&self) -> &str {
        "Interpolate missing timecodes and filenames"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let readings = state
            .readings()
            .ok_or_else(|| StepError::precondition_failed("Recognize step has not run"))?;

        let resolved = resolve(readings, &ctx.timeline);
        let summary = RepairSummary::from_frames(&resolved);
        self.log_summary(ctx, &summary);

        for frame in resolved.iter().filter(|f| f.was_repaired()) {
            ctx.logger.debug(&format!(
                "Frame {}: {} {} ({:?}, {:?})",
                frame.frame_index,
                frame.timecode,
                frame.filename,
                frame.timecode_origin,
                frame.filename_origin
            ));
        }

        state.resolve = Some(ResolveOutput { resolved, summary });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let resolved = state
            .resolved()
            .ok_or_else(|| StepError::invalid_output("Resolve results not recorded"))?;
        let readings = state.readings().unwrap_or_default();

        if resolved.len() != readings.len() {
            return Err(StepError::invalid_output(format!(
                "{} readings but {} resolved frames",
                readings.len(),
                resolved.len()
            )));
        }

        Ok(())
    }
}
