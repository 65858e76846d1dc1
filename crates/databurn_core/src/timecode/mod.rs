//! Non-drop-frame timecode arithmetic.
//!
//! Burned-in timecodes are read as `HH:MM:SS:FF` strings at a fixed integer
//! frame rate. This module provides:
//! - `FrameRate`: validated integer frames-per-second
//! - `Timecode`: immutable value with parse/format and frame arithmetic
//!
//! Arithmetic goes through the total-frame representation
//! (`hours*3600*fps + minutes*60*fps + seconds*fps + frames`). Totals wrap at
//! the 100-hour capacity of the two-digit hours field, so adding and then
//! subtracting the same count always returns the original value.
//!
//! # Example
//!
//! ```
//! use databurn_core::timecode::{FrameRate, Timecode};
//!
//! let fps = FrameRate::default(); // 25
//! let tc = Timecode::parse("00:00:00:24", fps).unwrap();
//! assert_eq!(tc.add_frames(1, fps).to_string(), "00:00:01:00");
//! ```

mod error;
mod types;

pub use error::{TimecodeError, TimecodeResult};
pub use types::{FrameRate, Timecode};
