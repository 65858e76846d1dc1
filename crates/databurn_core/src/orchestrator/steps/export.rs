//! Export step - writes the segment list as EDL and/or FCPXML.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExportOutput, JobState, StepOutcome};
use crate::writers::{self, ExportOptions};

pub struct ExportStep;

impl ExportStep {
    pub fn new() -> Self {
        Self
    }

    fn options(&self, ctx: &Context) -> ExportOptions {
        let mut options = ExportOptions::for_timeline(&ctx.timeline)
            .with_title(ctx.settings.timeline.title.clone());
        let media_root = &ctx.settings.paths.media_root;
        if !media_root.is_empty() {
            options.fcpxml.media_root = Some(media_root.clone());
        }
        options
    }
}

impl Default for ExportStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExportStep {
    fn name(&self) -> &str {
        "Export"
    }

    fn description(&self) -> &str {
        "Write EDL and FCPXML timelines"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.outputs.is_empty() {
            return Err(StepError::invalid_input("No output files requested"));
        }

        for target in &ctx.outputs {
            if let Some(parent) = target.path.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(StepError::file_not_found(parent.display().to_string()));
                }
            }
        }

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let segments = state
            .segments()
            .ok_or_else(|| StepError::precondition_failed("Segment step has not run"))?;

        let options = self.options(ctx);
        let mut written = Vec::with_capacity(ctx.outputs.len());

        for target in &ctx.outputs {
            writers::write_file(segments, &target.path, target.format, &options)?;
            ctx.logger.info(&format!(
                "Wrote {} ({} segments): {}",
                target.format.extension().to_uppercase(),
                segments.len(),
                target.path.display()
            ));
            written.push(target.clone());
        }

        state.export = Some(ExportOutput { written });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let export = state
            .export
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Export results not recorded"))?;

        for target in &export.written {
            if !target.path.exists() {
                return Err(StepError::invalid_output(format!(
                    "Output file not created: {}",
                    target.path.display()
                )));
            }
        }

        Ok(())
    }
}
