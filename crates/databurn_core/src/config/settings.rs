//! Settings struct with TOML-based sections.
//!
//! Each section maps to one TOML table and can be rewritten on its own.

use serde::{Deserialize, Serialize};

use crate::burnin::{FilenamePolicy, Grammar, TimelineConfig, SENTINEL_FILENAME};
use crate::frames::{CropRect, ExtractOptions};
use crate::gather::GatherStrategy;
use crate::logging::{LogConfig, LogLevel};
use crate::ocr::TesseractOptions;
use crate::timecode::{FrameRate, Timecode, TimecodeResult};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timeline: TimelineSettings,

    #[serde(default)]
    pub ocr: OcrSettings,

    #[serde(default)]
    pub extraction: ExtractionSettings,

    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Timecode conventions and output naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// Integer frame rate of the burned-in timecode.
    #[serde(default)]
    pub fps: FrameRate,

    /// Timeline position of the first event.
    #[serde(default = "default_timeline_base")]
    pub timeline_base: String,

    /// Timecode for frames with no usable neighbour.
    #[serde(default = "default_timecode")]
    pub default_timecode: String,

    /// Filename for frames whose name could not be read.
    #[serde(default = "default_sentinel")]
    pub sentinel_filename: String,

    #[serde(default)]
    pub filename_policy: FilenamePolicy,

    /// Label grammar of the burned-in text.
    #[serde(default)]
    pub grammar: Grammar,

    /// EDL `TITLE:` and FCPXML project name.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_timeline_base() -> String {
    "10:00:00:00".to_string()
}

fn default_timecode() -> String {
    "00:00:00:00".to_string()
}

fn default_sentinel() -> String {
    SENTINEL_FILENAME.to_string()
}

fn default_title() -> String {
    "Generated Timeline".to_string()
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            fps: FrameRate::default(),
            timeline_base: default_timeline_base(),
            default_timecode: default_timecode(),
            sentinel_filename: default_sentinel(),
            filename_policy: FilenamePolicy::default(),
            grammar: Grammar::default(),
            title: default_title(),
        }
    }
}

impl TimelineSettings {
    /// Validate the timecode strings and build the core configuration.
    pub fn to_timeline_config(&self) -> TimecodeResult<TimelineConfig> {
        let base = Timecode::parse(&self.timeline_base, self.fps)?;
        let default_tc = Timecode::parse(&self.default_timecode, self.fps)?;

        Ok(TimelineConfig::with_fps(self.fps)
            .with_timeline_base(base)
            .with_default_timecode(default_tc)
            .with_sentinel(self.sentinel_filename.clone())
            .with_filename_policy(self.filename_policy))
    }
}

/// OCR engine and gathering strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    #[serde(default)]
    pub strategy: GatherStrategy,

    /// Worker threads for pooled gathering; 0 uses one per core.
    #[serde(default)]
    pub threads: usize,

    /// Tesseract executable name or path.
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,

    /// Page segmentation mode.
    #[serde(default = "default_psm")]
    pub psm: u32,

    /// Characters tesseract may emit; empty disables the whitelist.
    #[serde(default = "default_whitelist")]
    pub whitelist: String,
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_psm() -> u32 {
    6
}

fn default_whitelist() -> String {
    "0123456789:ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz._".to_string()
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            strategy: GatherStrategy::default(),
            threads: 0,
            tesseract_path: default_tesseract_path(),
            psm: default_psm(),
            whitelist: default_whitelist(),
        }
    }
}

impl OcrSettings {
    pub fn tesseract_options(&self) -> TesseractOptions {
        TesseractOptions {
            binary: self.tesseract_path.clone(),
            psm: self.psm,
            whitelist: (!self.whitelist.is_empty()).then(|| self.whitelist.clone()),
        }
    }

    /// Thread count for the pool, `None` for the rayon default.
    pub fn pool_threads(&self) -> Option<usize> {
        (self.threads > 0).then_some(self.threads)
    }
}

/// Frame extraction and region-of-interest preprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Crop to the burn-in band before OCR.
    ///
    /// The default rectangle is the lower band of a 1080p frame. On smaller
    /// sources it is clamped to the picture instead of failing.
    #[serde(default = "default_true")]
    pub crop_enabled: bool,

    #[serde(default = "default_crop_x")]
    pub crop_x: u32,

    #[serde(default = "default_crop_y")]
    pub crop_y: u32,

    #[serde(default = "default_crop_width")]
    pub crop_width: u32,

    #[serde(default = "default_crop_height")]
    pub crop_height: u32,

    /// Upscale factor applied after cropping; 1 disables scaling.
    #[serde(default = "default_scale")]
    pub scale: u32,

    /// Invert colours (light text on dark bars reads better inverted).
    #[serde(default = "default_true")]
    pub invert: bool,

    /// Gaussian blur sigma; 0 disables.
    #[serde(default = "default_blur")]
    pub blur_sigma: f64,

    /// Leave extracted frames on disk after the run.
    #[serde(default)]
    pub keep_frames: bool,
}

fn default_true() -> bool {
    true
}

fn default_crop_x() -> u32 {
    10
}

fn default_crop_y() -> u32 {
    1000
}

fn default_crop_width() -> u32 {
    1400
}

fn default_crop_height() -> u32 {
    150
}

fn default_scale() -> u32 {
    2
}

fn default_blur() -> f64 {
    0.8
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            crop_enabled: true,
            crop_x: default_crop_x(),
            crop_y: default_crop_y(),
            crop_width: default_crop_width(),
            crop_height: default_crop_height(),
            scale: default_scale(),
            invert: true,
            blur_sigma: default_blur(),
            keep_frames: false,
        }
    }
}

impl ExtractionSettings {
    pub fn extract_options(&self, fps: FrameRate) -> ExtractOptions {
        ExtractOptions {
            fps,
            crop: self.crop_enabled.then_some(CropRect {
                x: self.crop_x,
                y: self.crop_y,
                width: self.crop_width,
                height: self.crop_height,
            }),
            scale: self.scale,
            invert: self.invert,
            blur_sigma: self.blur_sigma,
        }
    }
}

/// Working, output and log directories.
///
/// Relative paths are resolved against the directory of the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Default folder for exported lists.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Root for per-run frame directories.
    #[serde(default = "default_temp_root")]
    pub temp_root: String,

    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Prefix for FCPXML asset URLs; empty writes bare filenames.
    #[serde(default)]
    pub media_root: String,
}

fn default_output_folder() -> String {
    "databurn_output".to_string()
}

fn default_temp_root() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_root: default_temp_root(),
            logs_folder: default_logs_folder(),
            media_root: String::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,

    /// Keep per-frame OCR text out of the console.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Lines of OCR text / tool output shown when a step fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Progress update step percentage.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> u32 {
    20
}

fn default_progress_step() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            progress_step: default_progress_step(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            progress_step: self.progress_step,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Timeline,
    Ocr,
    Extraction,
    Paths,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Timeline,
        ConfigSection::Ocr,
        ConfigSection::Extraction,
        ConfigSection::Paths,
        ConfigSection::Logging,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Timeline => "timeline",
            ConfigSection::Ocr => "ocr",
            ConfigSection::Extraction => "extraction",
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Timeline => "Timecode conventions and output naming",
            ConfigSection::Ocr => "OCR engine and parallelism",
            ConfigSection::Extraction => "Frame extraction and region of interest",
            ConfigSection::Paths => "Output and working directories",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::TimecodeError;

    #[test]
    fn default_settings_serializes() {
        let toml = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(toml.contains("[timeline]"));
        assert!(toml.contains("[ocr]"));
        assert!(toml.contains("timeline_base = \"10:00:00:00\""));
        assert!(toml.contains("strategy = \"pooled\""));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[timeline]\nfps = 24\n[ocr]\nstrategy = \"sequential\"\n";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.timeline.fps, FrameRate::FILM);
        assert_eq!(parsed.timeline.timeline_base, "10:00:00:00");
        assert_eq!(parsed.ocr.strategy, GatherStrategy::Sequential);
        assert_eq!(parsed.ocr.psm, 6);
        assert_eq!(parsed.extraction.crop_y, 1000);
        assert!(parsed.logging.compact);
    }

    #[test]
    fn invalid_fps_is_rejected() {
        assert!(toml::from_str::<Settings>("[timeline]\nfps = 0\n").is_err());
    }

    #[test]
    fn timeline_config_from_settings() {
        let settings = TimelineSettings {
            fps: FrameRate::FILM,
            timeline_base: "01:00:00:00".to_string(),
            filename_policy: FilenamePolicy::CarryForward,
            ..TimelineSettings::default()
        };
        let config = settings.to_timeline_config().unwrap();
        assert_eq!(config.fps, FrameRate::FILM);
        assert_eq!(config.timeline_base.to_string(), "01:00:00:00");
        assert_eq!(config.filename_policy, FilenamePolicy::CarryForward);
    }

    #[test]
    fn malformed_base_surfaces_format_error() {
        let settings = TimelineSettings {
            timeline_base: "10:00:00:30".to_string(),
            ..TimelineSettings::default()
        };
        assert!(matches!(
            settings.to_timeline_config(),
            Err(TimecodeError::Format { .. })
        ));
    }

    #[test]
    fn empty_whitelist_disables_it() {
        let ocr = OcrSettings {
            whitelist: String::new(),
            ..OcrSettings::default()
        };
        assert!(ocr.tesseract_options().whitelist.is_none());
        assert_eq!(ocr.pool_threads(), None);
    }

    #[test]
    fn crop_can_be_disabled() {
        let extraction = ExtractionSettings {
            crop_enabled: false,
            ..ExtractionSettings::default()
        };
        assert!(extraction.extract_options(FrameRate::PAL).crop.is_none());
    }
}
