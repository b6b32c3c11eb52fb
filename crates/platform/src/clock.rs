//! Generic clock (GCLK) vocabulary and the clock-control seam.
//!
//! The I2S clock units are fed by a generic clock generator, which divides a
//! source oscillator down to the master clock the unit then divides further
//! into SCK:
//!
//! ```text
//! source (DFLL48M / FDPLL96M / OSC8M)
//!   -> GCLK generator n (GENDIV.DIV)
//!     -> GCLK_I2S_0 / GCLK_I2S_1 channel
//!       -> I2S clock unit MCK -> MCKDIV -> SCK (PDM clock pin)
//! ```
//!
//! # Sources
//! - SAMD21 datasheet, GCLK chapter (generator divider widths, channel IDs)
//! - SAMD21 datasheet, PM chapter (APBCMASK.I2S bus clock gate)

use crate::audio_types::OutOfRangeError;
use crate::peripheral::ClockUnit;

/// Frequency the FDPLL96M is locked to for audio use: 1024 × 48 kHz.
///
/// Divides exactly into 64× oversampled PDM clocks for 8, 16, 32 and 48 kHz.
pub const AUDIO_PLL_HZ: u32 = 49_152_000;

/// Reference oscillator feeding a GCLK generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Digital frequency-locked loop, 48 MHz (the CPU clock on most boards).
    Dfll48m,
    /// Internal 8 MHz RC oscillator.
    Osc8m,
    /// Fractional digital PLL, locked by board code to the given frequency.
    ///
    /// The PLL itself is configured outside this driver; the value here is
    /// what it was locked to.
    Fdpll96m(u32),
}

impl ClockSource {
    /// Output frequency of the source in Hz (the divider reference F_ref).
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Self::Dfll48m => 48_000_000,
            Self::Osc8m => 8_000_000,
            Self::Fdpll96m(hz) => hz,
        }
    }

    /// `GENCTRL.SRC` field value.
    pub const fn genctrl_src(self) -> u8 {
        match self {
            Self::Osc8m => 0x06,
            Self::Dfll48m => 0x07,
            Self::Fdpll96m(_) => 0x08,
        }
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::Fdpll96m(AUDIO_PLL_HZ)
    }
}

/// Generic clock generator index, validated to 0–8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct GclkId(u8);

impl GclkId {
    /// Highest generator index on the SAMD21.
    pub const MAX: u8 = 8;

    /// Create a generator id.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `id > 8`.
    pub fn new(id: u8) -> Result<Self, OutOfRangeError> {
        if id > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(id),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(id))
        }
    }

    /// Generator 3, not used by the Arduino core, free for peripherals.
    pub const fn gclk3() -> Self {
        Self(3)
    }

    /// Return the generator index.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Largest value `GENDIV.DIV` can hold for this generator.
    ///
    /// Generator 1 has a 16-bit divider, generator 2 a 5-bit one and every
    /// other generator an 8-bit one.
    pub const fn max_divisor(self) -> u16 {
        match self.0 {
            1 => u16::MAX,
            2 => 31,
            _ => 255,
        }
    }
}

/// Peripheral clock channel a generator can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralChannel {
    /// `GCLK_I2S_0` or `GCLK_I2S_1`, feeding the matching clock unit.
    I2s(ClockUnit),
}

impl PeripheralChannel {
    /// `CLKCTRL.ID` value for this channel.
    pub const fn id(self) -> u8 {
        match self {
            Self::I2s(ClockUnit::Zero) => 0x23,
            Self::I2s(ClockUnit::One) => 0x24,
        }
    }
}

/// Clock-tree operations the driver needs from the board layer.
///
/// On target this wraps the GCLK and PM register blocks; on the host it is
/// implemented by `pdm_mic::mock::MockI2s`.
pub trait ClockControl {
    /// Error type
    type Error: core::fmt::Debug;

    /// Gate the I2S APB bus clock (`PM->APBCMASK.I2S`).
    fn set_i2s_bus_clock(&mut self, enabled: bool);

    /// Program and enable a generator: source and divider.
    ///
    /// Must not return until the generator has synchronized.
    fn configure_generator(
        &mut self,
        id: GclkId,
        source: ClockSource,
        divisor: u16,
    ) -> Result<(), Self::Error>;

    /// Route a generator to a peripheral channel and enable the channel.
    fn connect(&mut self, channel: PeripheralChannel, id: GclkId) -> Result<(), Self::Error>;

    /// Disable a peripheral channel.
    fn disconnect(&mut self, channel: PeripheralChannel) -> Result<(), Self::Error>;
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn audio_pll_is_1024_fs_at_48khz() {
        assert_eq!(AUDIO_PLL_HZ, 48_000 * 1024);
        assert_eq!(ClockSource::default().frequency_hz(), AUDIO_PLL_HZ);
    }

    #[test]
    fn gclk_id_rejects_nine() {
        assert!(GclkId::new(8).is_ok());
        let err = GclkId::new(9).unwrap_err();
        assert_eq!(err.value, 9);
        assert_eq!(err.max, 8);
    }

    /// Generator divider widths differ per generator; using the 8-bit limit
    /// on GCLK1 would reject valid low sample rates.
    #[test]
    fn generator_divider_widths() {
        assert_eq!(GclkId::new(1).unwrap().max_divisor(), 65_535);
        assert_eq!(GclkId::new(2).unwrap().max_divisor(), 31);
        assert_eq!(GclkId::gclk3().max_divisor(), 255);
        assert_eq!(GclkId::new(8).unwrap().max_divisor(), 255);
    }

    #[test]
    fn i2s_channel_ids() {
        assert_eq!(PeripheralChannel::I2s(ClockUnit::Zero).id(), 0x23);
        assert_eq!(PeripheralChannel::I2s(ClockUnit::One).id(), 0x24);
    }

    #[test]
    fn dfll_is_48mhz() {
        assert_eq!(ClockSource::Dfll48m.frequency_hz(), 48_000_000);
    }
}
