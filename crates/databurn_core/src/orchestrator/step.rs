//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{Context, JobState, StepOutcome};

/// One stage of a run.
///
/// The pipeline calls, in order:
///
/// 1. `validate_input` - preconditions (files, tools)
/// 2. `execute` - the work; results go into `JobState`
/// 3. `validate_output` - only after `StepOutcome::Success`
pub trait PipelineStep: Send + Sync {
    /// Step name for logging and error context.
    fn name(&self) -> &str;

    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Perform the step and record its output in `state`.
    ///
    /// `StepOutcome::Skipped` is not an error.
    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome>;

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
