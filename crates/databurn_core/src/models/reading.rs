//! Per-frame OCR readings and their resolved form.

use serde::{Deserialize, Serialize};

use crate::timecode::Timecode;

/// Raw OCR text for one frame, before parsing.
///
/// This is the input contract of the core: `(frame_index, raw_text)` pairs
/// in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameText {
    pub frame_index: u64,
    pub raw_text: String,
}

impl FrameText {
    pub fn new(frame_index: u64, raw_text: impl Into<String>) -> Self {
        Self {
            frame_index,
            raw_text: raw_text.into(),
        }
    }
}

/// One frame's OCR result, as produced by the recognition stage.
///
/// Never mutated after creation; the interpolator produces a `ResolvedFrame`
/// and keeps the reading alongside it for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReading {
    /// Position in the frame sequence (0-based, authoritative ordering).
    pub frame_index: u64,
    /// Raw OCR text.
    pub raw_text: String,
    /// Timecode found in the text, if any.
    pub parsed_timecode: Option<Timecode>,
    /// Source filename found in the text, if any.
    pub parsed_filename: Option<String>,
}

impl FrameReading {
    pub fn new(
        frame_index: u64,
        raw_text: impl Into<String>,
        parsed_timecode: Option<Timecode>,
        parsed_filename: Option<String>,
    ) -> Self {
        Self {
            frame_index,
            raw_text: raw_text.into(),
            parsed_timecode,
            parsed_filename,
        }
    }

    /// A reading with nothing recognized (empty or failed OCR).
    pub fn blank(frame_index: u64) -> Self {
        Self::new(frame_index, String::new(), None, None)
    }

    /// Whether both fields were recognized.
    pub fn is_complete(&self) -> bool {
        self.parsed_timecode.is_some() && self.parsed_filename.is_some()
    }
}

/// How a resolved timecode was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimecodeOrigin {
    /// Read directly from the frame.
    Parsed,
    /// Previous known timecode plus one frame.
    FromPrevious,
    /// Next parsed timecode minus one frame.
    FromNext,
    /// No information anywhere; configured default.
    Default,
}

/// How a resolved filename was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameOrigin {
    Parsed,
    CarriedForward,
    Sentinel,
}

/// A frame with timecode and filename guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFrame {
    pub frame_index: u64,
    pub timecode: Timecode,
    pub filename: String,
    pub timecode_origin: TimecodeOrigin,
    pub filename_origin: FilenameOrigin,
    /// The reading this frame was resolved from.
    pub reading: FrameReading,
}

impl ResolvedFrame {
    /// Whether either field had to be filled in.
    pub fn was_repaired(&self) -> bool {
        self.timecode_origin != TimecodeOrigin::Parsed
            || self.filename_origin != FilenameOrigin::Parsed
    }
}
