//! Timecode error types.

/// Errors that can occur when building or parsing timecodes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimecodeError {
    /// Text is not a canonical `HH:MM:SS:FF` timecode at the given rate.
    #[error("Invalid timecode '{value}': {reason}")]
    Format { value: String, reason: String },

    /// Frame rate outside the representable range.
    #[error("Invalid frame rate {0}: must be between 1 and 100")]
    InvalidFrameRate(u32),
}

impl TimecodeError {
    /// Create a format error.
    pub fn format(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for timecode operations.
pub type TimecodeResult<T> = Result<T, TimecodeError>;
