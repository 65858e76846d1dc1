//! Segment step - groups resolved frames into clip segments.
//!
//! Output validation re-checks what every list writer relies on: segments
//! cover exactly the resolved frames and butt up against each other on the
//! timeline.

use crate::burnin::segment;
use crate::models::total_frames;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, SegmentOutput, StepOutcome};

pub struct SegmentStep;

impl SegmentStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SegmentStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for SegmentStep {
    fn name(&self) -> &str {
        "Segment"
    }

    fn description(&self) -> &str {
        "Group frames into clip segments"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let resolved = state
            .resolved()
            .ok_or_else(|| StepError::precondition_failed("Resolve step has not run"))?;

        let segments = segment(resolved, &ctx.timeline);

        ctx.logger.info(&format!(
            "{} frames grouped into {} segments",
            resolved.len(),
            segments.len()
        ));
        for (i, seg) in segments.iter().enumerate() {
            ctx.logger.debug(&format!(
                "  {:03} {} {}-{} @ {} ({} frames)",
                i + 1,
                seg.filename,
                seg.source_start,
                seg.source_end,
                seg.timeline_start,
                seg.frame_count
            ));
        }
        let unknown = segments
            .iter()
            .filter(|s| s.filename == ctx.timeline.sentinel_filename)
            .count();
        if unknown > 0 {
            ctx.logger.warn(&format!(
                "{} segments use the placeholder name {}",
                unknown, ctx.timeline.sentinel_filename
            ));
        }

        state.segment = Some(SegmentOutput { segments });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        let segments = state
            .segments()
            .ok_or_else(|| StepError::invalid_output("Segment results not recorded"))?;
        let frames = state.resolved().map_or(0, |r| r.len()) as u64;

        if total_frames(segments) != frames {
            return Err(StepError::invalid_output(format!(
                "Segments cover {} frames, expected {}",
                total_frames(segments),
                frames
            )));
        }

        if let Some(first) = segments.first() {
            if first.timeline_start != ctx.timeline.timeline_base {
                return Err(StepError::invalid_output(format!(
                    "First segment starts at {}, expected {}",
                    first.timeline_start, ctx.timeline.timeline_base
                )));
            }
        }

        let fps = ctx.timeline.fps;
        if let Some(pair) = segments
            .windows(2)
            .find(|w| w[0].timeline_end != w[1].timeline_start)
        {
            return Err(StepError::invalid_output(format!(
                "Timeline gap of {} frames between {} and {}",
                pair[0].timeline_end.frames_until(&pair[1].timeline_start, fps),
                pair[0].timeline_end,
                pair[1].timeline_start
            )));
        }

        Ok(())
    }
}
