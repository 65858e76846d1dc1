//! Run-length grouping of resolved frames into clip segments.
//!
//! A run is a maximal stretch of consecutive frames whose resolved filename
//! is identical (exact, case-sensitive). Each run becomes one `ClipSegment`:
//! its source span starts at the first frame's timecode, its timeline span
//! starts where the previous segment ended (or at the configured base).
//! OCR-garbled filenames are not merged; they become their own short segments.

use crate::models::{ClipSegment, ResolvedFrame};
use crate::timecode::{FrameRate, Timecode};

use super::types::TimelineConfig;

/// Group resolved frames into segments in a single forward pass.
pub fn segment(frames: &[ResolvedFrame], config: &TimelineConfig) -> Vec<ClipSegment> {
    let mut segmenter = Segmenter::new(config.fps, config.timeline_base);
    let mut segments: Vec<ClipSegment> = frames
        .iter()
        .filter_map(|frame| segmenter.push(&frame.filename, frame.timecode))
        .collect();
    segments.extend(segmenter.finish());
    segments
}

/// The run currently being accumulated.
#[derive(Debug, Clone)]
struct OpenRun {
    filename: String,
    source_start: Timecode,
    length: u64,
}

/// Incremental segmenter: feed frames in order, collect closed segments.
#[derive(Debug, Clone)]
pub struct Segmenter {
    fps: FrameRate,
    timeline_cursor: Timecode,
    open: Option<OpenRun>,
}

impl Segmenter {
    pub fn new(fps: FrameRate, timeline_base: Timecode) -> Self {
        Self {
            fps,
            timeline_cursor: timeline_base,
            open: None,
        }
    }

    /// Add the next frame. Returns the previous run's segment when this frame
    /// starts a new run.
    pub fn push(&mut self, filename: &str, timecode: Timecode) -> Option<ClipSegment> {
        if let Some(run) = self.open.as_mut() {
            if run.filename == filename {
                run.length += 1;
                return None;
            }
        }

        let closed = self.close_open_run();
        self.open = Some(OpenRun {
            filename: filename.to_string(),
            source_start: timecode,
            length: 1,
        });
        closed
    }

    /// Close the last run, if any.
    pub fn finish(mut self) -> Option<ClipSegment> {
        self.close_open_run()
    }

    /// Where the next segment will start on the timeline.
    pub fn timeline_cursor(&self) -> Timecode {
        self.timeline_cursor
    }

    fn close_open_run(&mut self) -> Option<ClipSegment> {
        let run = self.open.take()?;
        let segment = ClipSegment::from_run(
            run.filename,
            run.source_start,
            self.timeline_cursor,
            run.length,
            self.fps,
        );
        self.timeline_cursor = segment.timeline_end;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilenameOrigin, FrameReading, TimecodeOrigin};

    fn frame(index: u64, filename: &str, timecode: &str) -> ResolvedFrame {
        ResolvedFrame {
            frame_index: index,
            timecode: Timecode::parse(timecode, FrameRate::PAL).unwrap(),
            filename: filename.to_string(),
            timecode_origin: TimecodeOrigin::Parsed,
            filename_origin: FilenameOrigin::Parsed,
            reading: FrameReading::blank(index),
        }
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(segment(&[], &TimelineConfig::default()).is_empty());
    }

    #[test]
    fn single_frame_run() {
        let segments = segment(&[frame(0, "A.mov", "01:00:00:00")], &TimelineConfig::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].frame_count, 1);
        assert_eq!(segments[0].source_end.to_string(), "01:00:00:01");
        assert_eq!(segments[0].timeline_start.to_string(), "10:00:00:00");
        assert_eq!(segments[0].timeline_end.to_string(), "10:00:00:01");
    }

    #[test]
    fn groups_consecutive_filenames() {
        let segments = segment(
            &[
                frame(0, "A.mov", "01:00:00:00"),
                frame(1, "B.mov", "02:00:00:00"),
                frame(2, "B.mov", "02:00:00:01"),
            ],
            &TimelineConfig::default(),
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].filename, "A.mov");
        assert_eq!(segments[0].frame_count, 1);
        assert_eq!(segments[1].filename, "B.mov");
        assert_eq!(segments[1].frame_count, 2);
        assert_eq!(segments[1].source_start.to_string(), "02:00:00:00");
        assert_eq!(segments[1].source_end.to_string(), "02:00:00:02");
        assert_eq!(segments[1].timeline_start.to_string(), "10:00:00:01");
        assert_eq!(segments[1].timeline_end.to_string(), "10:00:00:03");
    }

    #[test]
    fn returning_file_starts_a_new_segment() {
        let segments = segment(
            &[
                frame(0, "A.mov", "01:00:00:00"),
                frame(1, "B.mov", "02:00:00:00"),
                frame(2, "A.mov", "01:00:00:02"),
            ],
            &TimelineConfig::default(),
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].source_start.to_string(), "01:00:00:02");
    }

    #[test]
    fn filename_comparison_is_case_sensitive() {
        let segments = segment(
            &[frame(0, "A.mov", "01:00:00:00"), frame(1, "a.mov", "01:00:00:01")],
            &TimelineConfig::default(),
        );
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn source_end_uses_run_start_not_last_frame() {
        // Timecodes inside a run are not consulted after the first frame.
        let segments = segment(
            &[
                frame(0, "A.mov", "01:00:00:00"),
                frame(1, "A.mov", "05:00:00:00"),
                frame(2, "A.mov", "00:00:00:00"),
            ],
            &TimelineConfig::default(),
        );
        assert_eq!(segments[0].source_end.to_string(), "01:00:00:03");
    }

    #[test]
    fn incremental_push_reports_closed_runs() {
        let fps = FrameRate::PAL;
        let base = Timecode::parse("01:00:00:00", fps).unwrap();
        let start = Timecode::parse("00:00:10:00", fps).unwrap();
        let mut segmenter = Segmenter::new(fps, base);

        assert!(segmenter.push("A.mov", start).is_none());
        assert!(segmenter.push("A.mov", start).is_none());
        let closed = segmenter.push("B.mov", start).unwrap();
        assert_eq!(closed.frame_count, 2);
        assert_eq!(segmenter.timeline_cursor().to_string(), "01:00:00:02");

        let last = segmenter.finish().unwrap();
        assert_eq!(last.filename, "B.mov");
        assert_eq!(last.timeline_end.to_string(), "01:00:00:03");
    }
}
