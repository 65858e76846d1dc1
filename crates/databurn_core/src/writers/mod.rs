//! Editorial list writers.
//!
//! Each writer is a pure function from a segment list to a string; only
//! [`write_file`] touches the filesystem.

mod edl;
mod error;
mod fcpxml;

pub use edl::{write_edl, EdlOptions};
pub use error::{ExportError, ExportResult};
pub use fcpxml::{write_fcpxml, FcpxmlOptions, VideoFormat};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::burnin::TimelineConfig;
use crate::models::ClipSegment;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Edl,
    Fcpxml,
}

impl ExportFormat {
    /// Detect format from file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "edl" => Some(Self::Edl),
            "fcpxml" | "xml" => Some(Self::Fcpxml),
            _ => None,
        }
    }

    /// Typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Edl => "edl",
            Self::Fcpxml => "fcpxml",
        }
    }
}

/// Options for every writer.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub edl: EdlOptions,
    pub fcpxml: FcpxmlOptions,
}

impl ExportOptions {
    /// Options whose frame rate and sequence start follow the timeline.
    pub fn for_timeline(config: &TimelineConfig) -> Self {
        Self {
            edl: EdlOptions::default(),
            fcpxml: FcpxmlOptions {
                fps: config.fps,
                timeline_base: config.timeline_base,
                ..FcpxmlOptions::default()
            },
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.fcpxml.project_name = title.clone();
        self.edl.title = title;
        self
    }
}

/// Render segments in the given format.
pub fn write_content(segments: &[ClipSegment], format: ExportFormat, options: &ExportOptions) -> String {
    match format {
        ExportFormat::Edl => write_edl(segments, &options.edl),
        ExportFormat::Fcpxml => write_fcpxml(segments, &options.fcpxml),
    }
}

/// Render segments and write them to `path`.
///
/// The parent directory must already exist.
pub fn write_file(
    segments: &[ClipSegment],
    path: impl AsRef<Path>,
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<()> {
    let path = path.as_ref();
    let content = write_content(segments, format, options);
    fs::write(path, content).map_err(|e| ExportError::write(path, e))?;
    tracing::debug!("Wrote {} segments to {}", segments.len(), path.display());
    Ok(())
}
