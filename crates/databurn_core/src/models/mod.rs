//! Data models shared across the pipeline.

mod reading;
mod segment;

pub use reading::{FilenameOrigin, FrameReading, FrameText, ResolvedFrame, TimecodeOrigin};
pub use segment::{total_frames, ClipSegment};
