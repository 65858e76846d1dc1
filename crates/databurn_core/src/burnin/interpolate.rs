//! Fills in missing timecodes and filenames.
//!
//! Resolution runs in frame order. For the timecode:
//! 1. A parsed value is used as-is and becomes the last known timecode.
//! 2. Otherwise, if the last known timecode came from a frame with the same
//!    resolved filename, it is advanced by one frame.
//! 3. Otherwise the next parsed timecode in the sequence, minus one frame.
//! 4. Otherwise the configured default.
//!
//! Values from steps 2 and 3 also become the last known timecode, so a gap of
//! several unreadable frames keeps counting up. Defaults do not.

use serde::Serialize;

use super::types::{FilenamePolicy, TimelineConfig};
use crate::models::{FilenameOrigin, FrameReading, ResolvedFrame, TimecodeOrigin};
use crate::timecode::Timecode;

/// Resolve every reading, one output per input in the same order.
pub fn resolve(readings: &[FrameReading], config: &TimelineConfig) -> Vec<ResolvedFrame> {
    let fps = config.fps;
    let next_parsed = next_parsed_timecodes(readings);

    let mut resolved = Vec::with_capacity(readings.len());
    let mut last_known: Option<(Timecode, String)> = None;
    let mut previous_filename: Option<String> = None;

    for (reading, next) in readings.iter().zip(next_parsed) {
        let (filename, filename_origin) =
            resolve_filename(reading, previous_filename.as_deref(), config);

        let (timecode, timecode_origin) = match reading.parsed_timecode {
            Some(tc) => (tc, TimecodeOrigin::Parsed),
            None => match (&last_known, next) {
                (Some((tc, from_file)), _) if *from_file == filename => {
                    (tc.add_frames(1, fps), TimecodeOrigin::FromPrevious)
                }
                (_, Some(next_tc)) => (next_tc.add_frames(-1, fps), TimecodeOrigin::FromNext),
                _ => (config.default_timecode, TimecodeOrigin::Default),
            },
        };

        if timecode_origin != TimecodeOrigin::Default {
            last_known = Some((timecode, filename.clone()));
        }
        previous_filename = Some(filename.clone());

        resolved.push(ResolvedFrame {
            frame_index: reading.frame_index,
            timecode,
            filename,
            timecode_origin,
            filename_origin,
            reading: reading.clone(),
        });
    }

    resolved
}

fn resolve_filename(
    reading: &FrameReading,
    previous: Option<&str>,
    config: &TimelineConfig,
) -> (String, FilenameOrigin) {
    match (&reading.parsed_filename, config.filename_policy, previous) {
        (Some(name), _, _) => (name.clone(), FilenameOrigin::Parsed),
        (None, FilenamePolicy::CarryForward, Some(prev)) => {
            (prev.to_string(), FilenameOrigin::CarriedForward)
        }
        (None, _, _) => (config.sentinel_filename.clone(), FilenameOrigin::Sentinel),
    }
}

/// For each position, the first parsed timecode strictly after it.
fn next_parsed_timecodes(readings: &[FrameReading]) -> Vec<Option<Timecode>> {
    let mut next = vec![None; readings.len()];
    let mut upcoming = None;
    for (i, reading) in readings.iter().enumerate().rev() {
        next[i] = upcoming;
        if reading.parsed_timecode.is_some() {
            upcoming = reading.parsed_timecode;
        }
    }
    next
}

/// Counts of how frames were resolved, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub frames: usize,
    pub parsed: usize,
    pub from_previous: usize,
    pub from_next: usize,
    pub defaulted: usize,
    pub filenames_carried: usize,
    pub filenames_unknown: usize,
}

impl RepairSummary {
    pub fn from_frames(frames: &[ResolvedFrame]) -> Self {
        let mut summary = Self {
            frames: frames.len(),
            ..Self::default()
        };
        for frame in frames {
            match frame.timecode_origin {
                TimecodeOrigin::Parsed => summary.parsed += 1,
                TimecodeOrigin::FromPrevious => summary.from_previous += 1,
                TimecodeOrigin::FromNext => summary.from_next += 1,
                TimecodeOrigin::Default => summary.defaulted += 1,
            }
            match frame.filename_origin {
                FilenameOrigin::Parsed => {}
                FilenameOrigin::CarriedForward => summary.filenames_carried += 1,
                FilenameOrigin::Sentinel => summary.filenames_unknown += 1,
            }
        }
        summary
    }

    /// Frames whose timecode had to be filled in.
    pub fn interpolated(&self) -> usize {
        self.from_previous + self.from_next + self.defaulted
    }
}
