//! Burned-in text to clip segments.
//!
//! This is the pure part of the system. It never touches the filesystem,
//! never blocks and never fails: OCR noise is resolved by defaulting policy.
//!
//! # Components
//!
//! - **parser**: raw OCR text → optional timecode + optional filename
//! - **interpolate**: readings → resolved frames (gap filling)
//! - **segmenter**: resolved frames → clip segments (run-length grouping)
//!
//! # Usage
//!
//! ```
//! use databurn_core::burnin::{assemble_texts, TextParser, TimelineConfig};
//!
//! let config = TimelineConfig::default();
//! let parser = TextParser::default();
//! let texts = vec![
//!     (0, "TC: 01:00:00:00 Filename: A.mov".to_string()),
//!     (1, "TC: 01:00:00:01 Filename: A.mov".to_string()),
//! ];
//!
//! let assembly = assemble_texts(texts, &parser, &config);
//! assert_eq!(assembly.segments.len(), 1);
//! assert_eq!(assembly.segments[0].timeline_end.to_string(), "10:00:00:02");
//! ```

mod interpolate;
mod parser;
mod segmenter;
mod types;

pub use interpolate::{resolve, RepairSummary};
pub use parser::{FoundFields, ParsedText, TextParser};
pub use segmenter::{segment, Segmenter};
pub use types::{FilenamePolicy, Grammar, TimelineConfig, SENTINEL_FILENAME};

use crate::models::{ClipSegment, FrameReading, ResolvedFrame};

/// Everything the core derives from one ordered reading sequence.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub resolved: Vec<ResolvedFrame>,
    pub segments: Vec<ClipSegment>,
    pub summary: RepairSummary,
}

/// Resolve and segment an ordered reading sequence.
pub fn assemble(readings: &[FrameReading], config: &TimelineConfig) -> Assembly {
    let resolved = resolve(readings, config);
    let segments = segment(&resolved, config);
    let summary = RepairSummary::from_frames(&resolved);
    Assembly {
        resolved,
        segments,
        summary,
    }
}

/// Parse `(frame_index, raw_text)` pairs, then resolve and segment them.
///
/// Pairs are ordered by `frame_index` first; callers gathering text
/// concurrently do not need to sort.
pub fn assemble_texts<I>(texts: I, parser: &TextParser, config: &TimelineConfig) -> Assembly
where
    I: IntoIterator<Item = (u64, String)>,
{
    let mut readings: Vec<FrameReading> = texts
        .into_iter()
        .map(|(index, text)| parser.read(index, text))
        .collect();
    readings.sort_by_key(|r| r.frame_index);
    assemble(&readings, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_texts_orders_by_frame_index() {
        let parser = TextParser::default();
        let texts = vec![
            (2, "TC: 02:00:00:01 Filename: B.mov".to_string()),
            (0, "TC: 01:00:00:00 Filename: A.mov".to_string()),
            (1, "TC: 02:00:00:00 Filename: B.mov".to_string()),
        ];
        let assembly = assemble_texts(texts, &parser, &TimelineConfig::default());

        let names: Vec<&str> = assembly.segments.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, ["A.mov", "B.mov"]);
        assert_eq!(assembly.summary.parsed, 3);
    }

    #[test]
    fn empty_sequence() {
        let assembly = assemble(&[], &TimelineConfig::default());
        assert!(assembly.resolved.is_empty());
        assert!(assembly.segments.is_empty());
        assert_eq!(assembly.summary, RepairSummary::default());
    }
}
