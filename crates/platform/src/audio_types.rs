//! Audio domain newtypes for compile-time safety.
//!
//! - `SampleRateHz`: validates the PDM output-rate range
//! - `ChannelMode`: mono / stereo frame layout

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside {}..={}",
            self.value, self.min, self.max
        )
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Audio sample rate in Hz after decimation.
///
/// Valid range: 1–192000 Hz. The lower bound only excludes zero; whether a
/// given rate is reachable depends on the clock source and is decided by
/// the divider calculation, not here. The upper bound is the fastest rate
/// whose 64× PDM clock still fits the I2S serial-clock ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum representable rate.
    pub const MIN_HZ: u32 = 1;

    /// Maximum representable rate.
    pub const MAX_HZ: u32 = 192_000;

    /// 16 kHz, the usual rate for voice capture.
    pub const VOICE: Self = Self(16_000);

    /// Create a `SampleRateHz`, returning an error if out of 1–192000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz == 0` or `hz > 192000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if hz < Self::MIN_HZ || hz > Self::MAX_HZ {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SampleRateHz {
    type Error = OutOfRangeError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl From<SampleRateHz> for u32 {
    fn from(rate: SampleRateHz) -> Self {
        rate.0
    }
}

// ── ChannelMode ──────────────────────────────────────────────────────────────

/// Number of PDM microphones sharing the data line.
///
/// In stereo the two microphones drive the line on opposite clock edges
/// (L/R select pin tied high on one, low on the other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMode {
    /// One microphone
    #[default]
    Mono,
    /// Two microphones, one per clock edge
    Stereo,
}

impl ChannelMode {
    /// Map the `stereo` flag of the classic API.
    pub const fn from_stereo(stereo: bool) -> Self {
        if stereo {
            Self::Stereo
        } else {
            Self::Mono
        }
    }

    /// Number of logical channels (1 or 2).
    pub const fn channels(self) -> u8 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_flag_maps_to_mode() {
        assert_eq!(ChannelMode::from_stereo(false), ChannelMode::Mono);
        assert_eq!(ChannelMode::from_stereo(true), ChannelMode::Stereo);
        assert_eq!(ChannelMode::Stereo.channels(), 2);
    }

    #[test]
    fn out_of_range_display() {
        let e = OutOfRangeError {
            value: 0,
            min: 1,
            max: 192_000,
        };
        assert_eq!(e.to_string(), "value 0 outside 1..=192000");
    }
}
