//! Capture settings: sample rate and channel mode.

use platform::{ChannelMode, OutOfRangeError, SampleRateHz};

/// Settings applied by [`PdmMic::configure_with`](crate::PdmMic::configure_with).
///
/// Holding a `PdmConfig` only proves the rate is in range; whether the clock
/// tree can reach it exactly is decided when it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdmConfig {
    /// Decimated output rate
    pub sample_rate: SampleRateHz,
    /// One or two microphones on the data line
    pub mode: ChannelMode,
}

impl PdmConfig {
    /// Build a config from a raw rate.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz` is outside
    /// [`SampleRateHz::MIN_HZ`]..=[`SampleRateHz::MAX_HZ`].
    pub fn new(hz: u32, mode: ChannelMode) -> Result<Self, OutOfRangeError> {
        Ok(Self {
            sample_rate: SampleRateHz::new(hz)?,
            mode,
        })
    }

    /// `true` for two-microphone capture.
    pub fn is_stereo(&self) -> bool {
        self.mode == ChannelMode::Stereo
    }
}

impl Default for PdmConfig {
    fn default() -> Self {
        Self {
            sample_rate: SampleRateHz::VOICE,
            mode: ChannelMode::Mono,
        }
    }
}
