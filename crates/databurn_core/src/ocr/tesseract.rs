//! `tesseract` subprocess engine.

use std::path::Path;
use std::process::{Command, Stdio};

use super::{OcrEngine, OcrError, OcrResult};

/// Command-line settings for tesseract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractOptions {
    /// Executable name or path.
    pub binary: String,
    /// Page segmentation mode (`--psm`).
    pub psm: u32,
    /// Value for `tessedit_char_whitelist`.
    pub whitelist: Option<String>,
}

impl Default for TesseractOptions {
    /// A single uniform block of text restricted to timecode and filename
    /// characters.
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            psm: 6,
            whitelist: Some(
                "0123456789:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz._".to_string(),
            ),
        }
    }
}

/// Runs one `tesseract <image> stdout` process per image.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    options: TesseractOptions,
}

impl TesseractEngine {
    pub fn new(options: TesseractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TesseractOptions {
        &self.options
    }

    /// Arguments for one image, without the program name.
    pub fn args(&self, image: &Path) -> Vec<String> {
        let mut args = vec![
            image.display().to_string(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.options.psm.to_string(),
        ];
        if let Some(whitelist) = &self.options.whitelist {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", whitelist));
        }
        args
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &Path) -> OcrResult<String> {
        let mut cmd = Command::new(&self.options.binary);
        cmd.args(self.args(image))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::trace!("Running tesseract: {:?}", cmd);

        let output = cmd.output().map_err(|e| OcrError::Unavailable {
            engine: self.options.binary.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::recognition(
                image,
                format!(
                    "exit code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn probe(&self) -> OcrResult<()> {
        let output = Command::new(&self.options.binary)
            .arg("--version")
            .output()
            .map_err(|e| OcrError::Unavailable {
                engine: self.options.binary.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(OcrError::Unavailable {
                engine: self.options.binary.clone(),
                message: format!("--version exited with {}", output.status),
            });
        }
        Ok(())
    }
}
