//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Run → Step → Operation → Detail

use thiserror::Error;

use crate::frames::FrameError;
use crate::ocr::OcrError;
use crate::writers::ExportError;

/// Top-level pipeline error with run context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during validation or execution.
    #[error("Run '{run_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        run_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Run inputs were rejected before any step ran.
    #[error("Run '{run_name}' failed validation: {message}")]
    ValidationFailed { run_name: String, message: String },

    /// Cancellation was requested.
    #[error("Run '{run_name}' was cancelled")]
    Cancelled { run_name: String },

    /// Work directory or logger could not be set up.
    #[error("Run '{run_name}' setup failed: {message}")]
    SetupFailed { run_name: String, message: String },
}

impl PipelineError {
    pub fn step_failed(
        run_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            run_name: run_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    pub fn validation_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }

    pub fn setup_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(run_name: impl Into<String>) -> Self {
        Self::Cancelled {
            run_name: run_name.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Error from a pipeline step.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    #[error("Required file not found: {path}")]
    FileNotFound { path: String },

    /// An external tool or earlier step is missing.
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),

    #[error(transparent)]
    Frames(#[from] FrameError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl StepError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn step_error_wraps_collaborator_errors() {
        let err: StepError = FrameError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 1,
            message: "Invalid data found".to_string(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn pipeline_error_chains_context() {
        let step_err = StepError::from(ExportError::write(
            PathBuf::from("/missing/out.edl"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
        let err = PipelineError::step_failed("reel_04", "Export", step_err);

        let msg = err.to_string();
        assert!(msg.contains("reel_04"));
        assert!(msg.contains("Export"));
        assert!(msg.contains("/missing/out.edl"));
        assert!(!err.is_cancelled());
    }
}
