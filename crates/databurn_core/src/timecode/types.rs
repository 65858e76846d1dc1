//! Frame rate and timecode value types.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::error::{TimecodeError, TimecodeResult};

/// Hours the `HH` field can hold; totals wrap at this boundary.
const HOURS_CAPACITY: u64 = 100;

/// Integer frame rate used for timecode arithmetic.
///
/// Frames are written as two digits, so the rate is limited to 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FrameRate(u32);

impl FrameRate {
    /// 24 fps (film).
    pub const FILM: FrameRate = FrameRate(24);
    /// 25 fps (PAL), the default for burned-in dailies.
    pub const PAL: FrameRate = FrameRate(25);
    /// 30 fps (non-drop).
    pub const NTSC_NDF: FrameRate = FrameRate(30);

    /// Create a frame rate, rejecting 0 and values above 100.
    pub fn new(fps: u32) -> TimecodeResult<Self> {
        if fps == 0 || fps > 100 {
            return Err(TimecodeError::InvalidFrameRate(fps));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }

    fn per_second(self) -> u64 {
        u64::from(self.0)
    }

    fn per_minute(self) -> u64 {
        self.per_second() * 60
    }

    fn per_hour(self) -> u64 {
        self.per_minute() * 60
    }

    fn capacity(self) -> u64 {
        self.per_hour() * HOURS_CAPACITY
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::PAL
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = TimecodeError;

    fn try_from(fps: u32) -> TimecodeResult<Self> {
        Self::new(fps)
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> u32 {
        rate.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An `HH:MM:SS:FF` timecode.
///
/// Values are always normalized (`minutes < 60`, `seconds < 60`,
/// `hours < 100`), so the derived ordering matches the total-frame ordering.
/// The frame rate is not stored: two timecodes only compare meaningfully when
/// they were built under the same rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode {
    hours: u32,
    minutes: u32,
    seconds: u32,
    frames: u32,
}

impl Timecode {
    /// `00:00:00:00`.
    pub const ZERO: Timecode = Timecode {
        hours: 0,
        minutes: 0,
        seconds: 0,
        frames: 0,
    };

    /// Build a timecode from its fields, validating each against `fps`.
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32, fps: FrameRate) -> TimecodeResult<Self> {
        let tc = Self {
            hours,
            minutes,
            seconds,
            frames,
        };
        tc.validate(fps).map_err(|reason| TimecodeError::format(tc.to_string(), reason))?;
        Ok(tc)
    }

    /// Parse a canonical `HH:MM:SS:FF` string.
    ///
    /// Every field must be exactly two ASCII digits and the frames field must
    /// be below `fps`.
    pub fn parse(text: &str, fps: FrameRate) -> TimecodeResult<Self> {
        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() != 4 {
            return Err(TimecodeError::format(text, "expected four colon-separated fields"));
        }

        let mut fields = [0u32; 4];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TimecodeError::format(
                    text,
                    format!("field '{}' is not two digits", part),
                ));
            }
            // Two ASCII digits always fit.
            *slot = part.parse().unwrap_or_default();
        }

        let tc = Self {
            hours: fields[0],
            minutes: fields[1],
            seconds: fields[2],
            frames: fields[3],
        };
        tc.validate(fps).map_err(|reason| TimecodeError::format(text, reason))?;
        Ok(tc)
    }

    /// Rebuild a timecode from a total frame count.
    ///
    /// Counts beyond the 100-hour capacity wrap around.
    pub fn from_frames(total: u64, fps: FrameRate) -> Self {
        let total = total % fps.capacity();
        Self {
            hours: (total / fps.per_hour()) as u32,
            minutes: ((total % fps.per_hour()) / fps.per_minute()) as u32,
            seconds: ((total % fps.per_minute()) / fps.per_second()) as u32,
            frames: (total % fps.per_second()) as u32,
        }
    }

    /// Total frame count from `00:00:00:00`.
    pub fn to_frames(&self, fps: FrameRate) -> u64 {
        u64::from(self.hours) * fps.per_hour()
            + u64::from(self.minutes) * fps.per_minute()
            + u64::from(self.seconds) * fps.per_second()
            + u64::from(self.frames)
    }

    /// Add `n` frames (negative to subtract), carrying and borrowing across
    /// fields.
    pub fn add_frames(&self, n: i64, fps: FrameRate) -> Self {
        let capacity = fps.capacity() as i128;
        let total = (self.to_frames(fps) as i128 + i128::from(n)).rem_euclid(capacity);
        Self::from_frames(total as u64, fps)
    }

    /// Signed frame distance from `self` to `later`.
    pub fn frames_until(&self, later: &Timecode, fps: FrameRate) -> i64 {
        later.to_frames(fps) as i64 - self.to_frames(fps) as i64
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    fn validate(&self, fps: FrameRate) -> Result<(), String> {
        if u64::from(self.hours) >= HOURS_CAPACITY {
            return Err(format!("hours {} out of range", self.hours));
        }
        if self.minutes >= 60 {
            return Err(format!("minutes {} out of range", self.minutes));
        }
        if self.seconds >= 60 {
            return Err(format!("seconds {} out of range", self.seconds));
        }
        if self.frames >= fps.get() {
            return Err(format!("frames {} not below {} fps", self.frames, fps));
        }
        Ok(())
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
