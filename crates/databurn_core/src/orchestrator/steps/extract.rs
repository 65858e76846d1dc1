//! Extract step - decodes the video into per-frame images with ffmpeg.
//!
//! Frames land in `<work_dir>/frames` as `frame_000001.png`, ... with the
//! burn-in band already cropped and cleaned up for OCR. Runs that start
//! from recognized texts skip this step.

use crate::frames::ffmpeg;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExtractOutput, JobState, RunSource, StepOutcome};

pub struct ExtractStep;

impl ExtractStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtractStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExtractStep {
    fn name(&self) -> &str {
        "Extract"
    }

    fn description(&self) -> &str {
        "Decode video frames and crop the burn-in band"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let Some(video) = ctx.video() else {
            return Ok(());
        };

        if !video.exists() {
            return Err(StepError::file_not_found(video.display().to_string()));
        }

        if !ffmpeg::is_available() {
            return Err(StepError::precondition_failed(
                "ffmpeg not found in PATH; it is required to decode frames",
            ));
        }

        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let video = match &ctx.source {
            RunSource::Video(path) => path,
            RunSource::Texts(_) => {
                return Ok(StepOutcome::Skipped(
                    "frame texts supplied directly".to_string(),
                ));
            }
        };

        let options = ctx.settings.extraction.extract_options(ctx.timeline.fps);
        let frames_dir = ctx.frames_dir();

        ctx.logger.info(&format!("Source: {}", video.display()));
        match options.crop {
            Some(crop) => ctx.logger.info(&format!(
                "Region: {}x{} at ({}, {}), scale x{}",
                crop.width, crop.height, crop.x, crop.y, options.scale
            )),
            None => ctx.logger.info("Region: full frame"),
        }
        ctx.logger.command(&format!(
            "ffmpeg {}",
            ffmpeg::extract_args(video, &frames_dir, &options).join(" ")
        ));

        let frames = ffmpeg::extract_frames(video, &frames_dir, &options, &|line, is_stderr| {
            ctx.logger.output_line(line, is_stderr)
        })?;

        ctx.logger.info(&format!(
            "Extracted {} frames into {}",
            frames.len(),
            frames_dir.display()
        ));

        state.extract = Some(ExtractOutput { frames_dir, frames });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let frames = state
            .frames()
            .ok_or_else(|| StepError::invalid_output("Extract results not recorded"))?;

        if frames.is_empty() {
            return Err(StepError::invalid_output("No frames were extracted"));
        }

        // Frame files are numbered without gaps.
        if let Some(gap) = frames
            .iter()
            .enumerate()
            .find(|(i, f)| f.index != *i as u64)
        {
            return Err(StepError::invalid_output(format!(
                "Frame sequence has a gap before {}",
                gap.1.path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameFile;
    use crate::orchestrator::testing::{text_context, video_context};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn skipped_for_text_runs() {
        let dir = tempdir().unwrap();
        let ctx = text_context(dir.path(), &["TC: 01:00:00:00 Filename: A.mov"]);
        let step = ExtractStep::new();

        step.validate_input(&ctx).unwrap();
        let mut state = JobState::new("t");
        let outcome = step.execute(&ctx, &mut state).unwrap();
        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.extract.is_none());
    }

    #[test]
    fn missing_video_fails_validation() {
        let dir = tempdir().unwrap();
        let ctx = video_context(dir.path(), dir.path().join("absent.mov"), &[]);

        let err = ExtractStep::new().validate_input(&ctx).unwrap_err();
        assert!(matches!(err, StepError::FileNotFound { .. }));
    }

    #[test]
    fn output_must_be_gap_free() {
        let dir = tempdir().unwrap();
        let ctx = text_context(dir.path(), &[]);
        let frame = |index| FrameFile {
            index,
            path: PathBuf::from(format!("frame_{:06}.png", index + 1)),
        };

        let mut state = JobState::new("t");
        state.extract = Some(ExtractOutput {
            frames_dir: dir.path().to_path_buf(),
            frames: vec![frame(0), frame(2)],
        });
        assert!(ExtractStep::new().validate_output(&ctx, &state).is_err());

        state.extract = Some(ExtractOutput {
            frames_dir: dir.path().to_path_buf(),
            frames: vec![frame(0), frame(1)],
        });
        assert!(ExtractStep::new().validate_output(&ctx, &state).is_ok());
    }
}
