//! OCR engines.
//!
//! The core never does OCR itself; it asks an [`OcrEngine`] for the text of
//! one image at a time. [`TesseractEngine`] runs the `tesseract` executable.

mod tesseract;

pub use tesseract::{TesseractEngine, TesseractOptions};

use std::path::{Path, PathBuf};

/// Errors from an OCR engine.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// Engine binary could not be started at all.
    #[error("OCR engine '{engine}' is unavailable: {message}")]
    Unavailable { engine: String, message: String },

    /// Engine ran but failed on one image.
    #[error("OCR failed on '{}': {message}", path.display())]
    RecognitionFailed { path: PathBuf, message: String },
}

impl OcrError {
    pub fn recognition(path: &Path, message: impl Into<String>) -> Self {
        Self::RecognitionFailed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Result type for OCR operations.
pub type OcrResult<T> = Result<T, OcrError>;

/// Turns one image into raw text.
///
/// Implementations are shared across gatherer threads.
pub trait OcrEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Recognize the text in one image.
    fn recognize(&self, image: &Path) -> OcrResult<String>;

    /// Whether `recognize` may be called from several threads at once.
    fn supports_concurrency(&self) -> bool {
        true
    }

    /// Check the engine can run at all. Called once before any frame.
    fn probe(&self) -> OcrResult<()> {
        Ok(())
    }
}
