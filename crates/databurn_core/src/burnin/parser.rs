//! Extracts timecode and filename from one frame's OCR text.
//!
//! The burned-in overlay carries labeled fields, for example:
//! ```text
//! SRC TC: 01:00:00:12   Filename: A001C003_220314.MOV
//! ```
//! The first labeled match of each field wins. Nothing is corrected and
//! nothing fails: a field that cannot be found is simply absent.

use std::sync::LazyLock;

use regex::Regex;

use super::types::Grammar;
use crate::models::FrameReading;
use crate::timecode::{FrameRate, Timecode};

static LABELED_TC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TC:\s*(\d{2}:\d{2}:\d{2}:\d{2})").expect("timecode pattern"));

static SOURCE_TC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SRC TC:\s*(\d{2}:\d{2}:\d{2}:\d{2})").expect("source timecode pattern")
});

static LABELED_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Filename|File name):\s*([\w.\-]+\.(?i:mp4|mov))").expect("filename pattern")
});

static SOURCE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"File name:\s*([\w.\-]+\.(?i:mp4|mov))").expect("source filename pattern")
});

/// Which fields a parse found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoundFields {
    pub timecode: bool,
    pub filename: bool,
}

impl FoundFields {
    pub fn any(&self) -> bool {
        self.timecode || self.filename
    }

    pub fn all(&self) -> bool {
        self.timecode && self.filename
    }
}

/// Result of parsing one OCR string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedText {
    pub timecode: Option<Timecode>,
    pub filename: Option<String>,
}

impl ParsedText {
    pub fn found(&self) -> FoundFields {
        FoundFields {
            timecode: self.timecode.is_some(),
            filename: self.filename.is_some(),
        }
    }
}

/// Parser for one label grammar at one frame rate.
#[derive(Debug, Clone, Copy)]
pub struct TextParser {
    grammar: Grammar,
    fps: FrameRate,
}

impl TextParser {
    pub fn new(grammar: Grammar, fps: FrameRate) -> Self {
        Self { grammar, fps }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Parse one OCR string.
    pub fn parse(&self, raw_text: &str) -> ParsedText {
        ParsedText {
            timecode: self.find_timecode(raw_text),
            filename: self.find_filename(raw_text),
        }
    }

    /// Parse one OCR string into a `FrameReading`.
    pub fn read(&self, frame_index: u64, raw_text: impl Into<String>) -> FrameReading {
        let raw_text = raw_text.into();
        let parsed = self.parse(&raw_text);
        FrameReading::new(frame_index, raw_text, parsed.timecode, parsed.filename)
    }

    fn find_timecode(&self, text: &str) -> Option<Timecode> {
        let pattern = match self.grammar {
            Grammar::Labeled => &*LABELED_TC,
            Grammar::SourceLabeled => &*SOURCE_TC,
        };
        let digits = pattern.captures(text)?.get(1)?.as_str();
        Timecode::parse(digits, self.fps).ok()
    }

    fn find_filename(&self, text: &str) -> Option<String> {
        let pattern = match self.grammar {
            Grammar::Labeled => &*LABELED_FILENAME,
            Grammar::SourceLabeled => &*SOURCE_FILENAME,
        };
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new(Grammar::default(), FrameRate::default())
    }
}
