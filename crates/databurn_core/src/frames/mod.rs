//! Video to frame images.
//!
//! Decoding is delegated to `ffmpeg`. This module owns the naming scheme of
//! the work directory (`frame_000001.png`, ...) and maps image files back to
//! 0-based frame indices.

mod error;
pub mod ffmpeg;

pub use error::{FrameError, FrameResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::timecode::FrameRate;

/// ffmpeg output pattern; numbering starts at 1.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

const FRAME_PREFIX: &str = "frame_";
const FRAME_EXTENSION: &str = "png";

/// Pixel rectangle cut from each frame before OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Extraction rate and region-of-interest preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub fps: FrameRate,
    pub crop: Option<CropRect>,
    /// Integer upscale factor; 1 leaves the size unchanged.
    pub scale: u32,
    pub invert: bool,
    /// Gaussian blur sigma; 0 disables.
    pub blur_sigma: f64,
}

impl ExtractOptions {
    /// Full frames at `fps`, no preprocessing.
    pub fn unprocessed(fps: FrameRate) -> Self {
        Self {
            fps,
            crop: None,
            scale: 1,
            invert: false,
            blur_sigma: 0.0,
        }
    }
}

impl Default for ExtractOptions {
    /// Lower-third burn-in band of a 1080p frame, doubled, inverted and
    /// lightly blurred.
    fn default() -> Self {
        Self {
            fps: FrameRate::default(),
            crop: Some(CropRect {
                x: 10,
                y: 1000,
                width: 1400,
                height: 150,
            }),
            scale: 2,
            invert: true,
            blur_sigma: 0.8,
        }
    }
}

/// One extracted image.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FrameFile {
    /// 0-based position in the video.
    pub index: u64,
    pub path: PathBuf,
}

/// 0-based frame index encoded in an extracted image's filename.
pub fn frame_index_from_path(path: &Path) -> Option<u64> {
    if path.extension()?.to_str()? != FRAME_EXTENSION {
        return None;
    }
    let number: u64 = path
        .file_stem()?
        .to_str()?
        .strip_prefix(FRAME_PREFIX)?
        .parse()
        .ok()?;
    number.checked_sub(1)
}

/// Extracted images in `dir`, ordered by frame index.
///
/// Files that do not follow the naming scheme are ignored.
pub fn list_frames(dir: &Path) -> FrameResult<Vec<FrameFile>> {
    let entries = fs::read_dir(dir).map_err(|e| FrameError::io(dir, e))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FrameError::io(dir, e))?.path();
        if let Some(index) = frame_index_from_path(&path) {
            frames.push(FrameFile { index, path });
        }
    }
    frames.sort();
    Ok(frames)
}

/// Remove a run's work directory. A directory that is already gone is fine.
pub fn remove_work_dir(dir: &Path) -> FrameResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::debug!("Removed work directory {}", dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FrameError::io(dir, e)),
    }
}
