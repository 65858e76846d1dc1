//! Configuration management.
//!
//! - TOML settings grouped into `[timeline]`, `[ocr]`, `[extraction]`,
//!   `[paths]` and `[logging]`
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed table is rewritten)
//! - Defaults filled in for any missing key
//!
//! # Example
//!
//! ```no_run
//! use databurn_core::config::{ConfigManager, ConfigSection};
//! use databurn_core::gather::GatherStrategy;
//!
//! let mut config = ConfigManager::new(".config/databurn.toml");
//! config.load_or_create().unwrap();
//!
//! let timeline = config.settings().timeline.to_timeline_config().unwrap();
//! println!("Timeline starts at {}", timeline.timeline_base);
//!
//! config.settings_mut().ocr.strategy = GatherStrategy::Sequential;
//! config.update_section(ConfigSection::Ocr).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, ExtractionSettings, LoggingSettings, OcrSettings, PathSettings, Settings,
    TimelineSettings,
};
