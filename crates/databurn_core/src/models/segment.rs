//! Clip segments: the editorial unit produced per run of frames.

use serde::Serialize;

use crate::timecode::{FrameRate, Timecode};

/// A maximal run of consecutive frames sharing one filename.
///
/// `source_end` and `timeline_end` are exclusive: each equals its start plus
/// `frame_count` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipSegment {
    pub filename: String,
    pub source_start: Timecode,
    pub source_end: Timecode,
    pub timeline_start: Timecode,
    pub timeline_end: Timecode,
    pub frame_count: u64,
}

impl ClipSegment {
    /// Build a segment from its starting points and length.
    pub fn from_run(
        filename: impl Into<String>,
        source_start: Timecode,
        timeline_start: Timecode,
        frame_count: u64,
        fps: FrameRate,
    ) -> Self {
        let length = frame_count as i64;
        Self {
            filename: filename.into(),
            source_start,
            source_end: source_start.add_frames(length, fps),
            timeline_start,
            timeline_end: timeline_start.add_frames(length, fps),
            frame_count,
        }
    }

    /// Timeline position in frames from `00:00:00:00`.
    pub fn timeline_offset_frames(&self, fps: FrameRate) -> u64 {
        self.timeline_start.to_frames(fps)
    }

    /// Source start in frames from `00:00:00:00`.
    pub fn source_start_frames(&self, fps: FrameRate) -> u64 {
        self.source_start.to_frames(fps)
    }
}

/// Total frames covered by a segment list.
pub fn total_frames(segments: &[ClipSegment]) -> u64 {
    segments.iter().map(|s| s.frame_count).sum()
}
