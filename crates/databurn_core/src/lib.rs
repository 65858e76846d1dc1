//! Databurn Core - burned-in timecode to editorial timelines
//!
//! Reads the source timecode and filename burned into each frame of a
//! screener, repairs what OCR could not read, and writes the cut back out as
//! an EDL or FCPXML timeline. There are no UI dependencies; the CLI and any
//! other front-end drive it through [`orchestrator::JobRunner`].

pub mod burnin;
pub mod config;
pub mod frames;
pub mod gather;
pub mod logging;
pub mod models;
pub mod ocr;
pub mod orchestrator;
pub mod timecode;
pub mod writers;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
