//! Configuration types for reading burned-in data.

use serde::{Deserialize, Serialize};

use crate::timecode::{FrameRate, Timecode};

/// Filename the interpolator assigns when none could be read.
pub const SENTINEL_FILENAME: &str = "unknown.mov";

/// Label grammar expected in the burned-in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// `TC:` (also matches `SRC TC:`) and `Filename:` or `File name:`.
    #[default]
    Labeled,
    /// Strict `SRC TC:` and `File name:` labels.
    SourceLabeled,
}

/// What to do with a frame whose filename could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenamePolicy {
    /// Use the sentinel filename; the frame becomes part of an "unknown" clip.
    #[default]
    Sentinel,
    /// Reuse the previous frame's resolved filename.
    CarryForward,
}

/// Conventions injected into the interpolator and segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineConfig {
    /// Frame rate for all timecode arithmetic.
    pub fps: FrameRate,
    /// Timeline position of the first segment.
    pub timeline_base: Timecode,
    /// Filename used when none was read.
    pub sentinel_filename: String,
    /// Timecode used when no frame offers any information.
    pub default_timecode: Timecode,
    /// Missing-filename handling.
    pub filename_policy: FilenamePolicy,
}

impl TimelineConfig {
    /// Conventional defaults at the given frame rate: timeline starts at
    /// `10:00:00:00`, default timecode `00:00:00:00`.
    pub fn with_fps(fps: FrameRate) -> Self {
        Self {
            fps,
            timeline_base: Timecode::from_frames(10 * 3600 * u64::from(fps.get()), fps),
            sentinel_filename: SENTINEL_FILENAME.to_string(),
            default_timecode: Timecode::ZERO,
            filename_policy: FilenamePolicy::default(),
        }
    }

    pub fn with_timeline_base(mut self, base: Timecode) -> Self {
        self.timeline_base = base;
        self
    }

    pub fn with_filename_policy(mut self, policy: FilenamePolicy) -> Self {
        self.filename_policy = policy;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel_filename = sentinel.into();
        self
    }

    pub fn with_default_timecode(mut self, tc: Timecode) -> Self {
        self.default_timecode = tc;
        self
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self::with_fps(FrameRate::default())
    }
}
