//! CMX-style EDL writer.
//!
//! # Layout
//!
//! ```text
//! TITLE: Generated Timeline
//! FCM: NON-DROP FRAME
//!
//! 001  AX       V     C        01:00:00:00 01:00:00:02 10:00:00:00 10:00:00:02
//! * FROM CLIP NAME: A.mov
//!
//! ```
//!
//! Column spacing is fixed; downstream conform tools match on it.

use crate::models::ClipSegment;

/// Options for EDL output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdlOptions {
    /// Value of the `TITLE:` header.
    pub title: String,
}

impl Default for EdlOptions {
    fn default() -> Self {
        Self {
            title: "Generated Timeline".to_string(),
        }
    }
}

/// Render segments as an EDL string.
pub fn write_edl(segments: &[ClipSegment], options: &EdlOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("TITLE: {}\n", options.title));
    output.push_str("FCM: NON-DROP FRAME\n\n");

    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format_event(i + 1, segment));
    }

    output
}

/// One event record plus its trailing blank line.
fn format_event(number: usize, segment: &ClipSegment) -> String {
    format!(
        "{:03}  AX       V     C        {} {} {} {}\n* FROM CLIP NAME: {}\n\n",
        number,
        segment.source_start,
        segment.source_end,
        segment.timeline_start,
        segment.timeline_end,
        segment.filename
    )
}
