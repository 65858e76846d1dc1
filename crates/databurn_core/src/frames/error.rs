//! Frame extraction error types.

use std::path::PathBuf;

/// Errors raised while turning a video into frame images.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Input video does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// ffmpeg could not be started.
    #[error("Failed to run {tool}: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// ffmpeg exited with an error.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Extraction succeeded but produced no images.
    #[error("No frames were extracted into {}", .0.display())]
    NoFrames(PathBuf),

    /// Work directory could not be created, listed or removed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FrameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;
