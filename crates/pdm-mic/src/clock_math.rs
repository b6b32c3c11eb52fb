//! PDM bit-clock divider calculation for the I2S clock unit.
//!
//! A PDM microphone is clocked by the I2S SCK pin and delivers one bit per
//! clock edge. Recovering one audio sample takes `OVERSAMPLING_RATIO` raw
//! bits, so the bit clock must run at exactly:
//!
//!   SCK = sample_rate × OVERSAMPLING_RATIO
//!
//! # Clock Tree
//!
//! ```text
//!   F_ref (GCLK source)
//!     -> GENDIV.DIV        (generator stage, 8/16/5-bit depending on generator)
//!       -> MCK
//!         -> MCKDIV + 1    (serial stage, 1..=32)
//!           -> SCK = PDM clock pin
//! ```
//!
//! # Divider Selection
//!
//! The product of both stages must equal `F_ref / SCK` exactly; a rate that
//! would need a fractional divider is rejected instead of being rounded to a
//! nearby (mismatched) rate. Among valid pairs the generator stage takes as
//! much of the division as it can hold, leaving the 5-bit serial stage as
//! small as possible.
//!
//! # Worked Example (16 kHz, FDPLL96M at 49.152 MHz, GCLK3)
//!
//!   SCK   = 16 000 × 64           = 1 024 000 Hz
//!   total = 49 152 000 / 1 024 000 = 48   (exact)
//!   gclk  = 48 (≤ 255), serial = 1
//!
//! With the 48 MHz DFLL the same rate needs 46.875 and is rejected.

use platform::{ClockSource, GclkId};
use thiserror_no_std::Error;

use crate::registers::{CLKCTRL_MCKDIV_MASK, CLKCTRL_MCKDIV_SHIFT};

/// Raw PDM bits consumed per decimated audio sample.
///
/// Fixed by the capture format: a 64× decimation filter in software turns
/// every 64 bits (two 32-bit words in mono) into one PCM sample.
pub const OVERSAMPLING_RATIO: u32 = 64;

/// Highest SCK the I2S block is rated for, in Hz.
///
/// Equals 192 kHz × 64, the fastest PDM capture the driver supports.
pub const MAX_SERIAL_CLOCK_HZ: u32 = 12_288_000;

/// Largest serial-stage divisor: MCKDIV is a 5-bit field holding divisor − 1.
pub const MAX_SERIAL_DIVISOR: u32 = 32;

/// Why no divisor pair exists for a requested rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Sample rate of zero.
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
    /// Required bit clock exceeds [`MAX_SERIAL_CLOCK_HZ`].
    #[error("bit clock {required_hz} Hz exceeds the {} Hz ceiling", MAX_SERIAL_CLOCK_HZ)]
    AboveMaximum {
        /// Bit clock the rate would need (saturated on overflow).
        required_hz: u32,
    },
    /// Reference is not an integer multiple of the required bit clock.
    #[error("{reference_hz} Hz reference does not divide into {required_hz} Hz")]
    NotExact {
        /// Bit clock the rate would need.
        required_hz: u32,
        /// Reference clock frequency.
        reference_hz: u32,
    },
    /// The total division does not fit the two divider stages.
    #[error("division by {total} does not fit the divider stages")]
    DivisorOutOfRange {
        /// `F_ref / SCK`
        total: u32,
    },
}

/// Resolved divider settings for one sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Reference clock (F_ref) the generator divides, in Hz.
    pub reference_hz: u32,
    /// Generator stage divisor (`GENDIV.DIV`).
    pub gclk_divisor: u16,
    /// Serial stage divisor (`MCKDIV + 1`).
    pub serial_divisor: u8,
    /// Resulting SCK in Hz.
    pub bit_clock_hz: u32,
}

impl ClockConfig {
    /// Decimated sample rate this configuration yields.
    pub fn sample_rate_hz(&self) -> u32 {
        self.bit_clock_hz
            .checked_div(OVERSAMPLING_RATIO)
            .unwrap_or(0)
    }

    /// Master clock leaving the generator, in Hz.
    pub fn master_clock_hz(&self) -> u32 {
        self.reference_hz
            .checked_div(u32::from(self.gclk_divisor))
            .unwrap_or(0)
    }

    /// `CLKCTRL.MCKDIV` field, already shifted into place.
    // Masked to 5 bits before a constant 16-bit shift; cannot overflow.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn mckdiv_field(&self) -> u32 {
        let field = u32::from(self.serial_divisor.saturating_sub(1)) & CLKCTRL_MCKDIV_MASK;
        field << CLKCTRL_MCKDIV_SHIFT
    }
}

/// Derive both divider stages for `sample_rate_hz`.
///
/// Pure computation; touches no hardware.
///
/// # Errors
///
/// Returns [`ClockError`] if the rate is zero, needs a bit clock above
/// [`MAX_SERIAL_CLOCK_HZ`], or cannot be reached exactly from `source` with
/// the divider widths of `gclk`.
pub fn compute(
    sample_rate_hz: u32,
    source: ClockSource,
    gclk: GclkId,
) -> Result<ClockConfig, ClockError> {
    if sample_rate_hz == 0 {
        return Err(ClockError::ZeroSampleRate);
    }

    let required_hz = sample_rate_hz
        .checked_mul(OVERSAMPLING_RATIO)
        .ok_or(ClockError::AboveMaximum {
            required_hz: u32::MAX,
        })?;
    if required_hz > MAX_SERIAL_CLOCK_HZ {
        return Err(ClockError::AboveMaximum { required_hz });
    }

    let reference_hz = source.frequency_hz();
    let not_exact = ClockError::NotExact {
        required_hz,
        reference_hz,
    };
    let total = reference_hz.checked_div(required_hz).ok_or(not_exact)?;
    if total == 0 || reference_hz.checked_rem(required_hz) != Some(0) {
        return Err(not_exact);
    }

    let (gclk_divisor, serial_divisor) = split(total, u32::from(gclk.max_divisor()))
        .ok_or(ClockError::DivisorOutOfRange { total })?;

    Ok(ClockConfig {
        reference_hz,
        gclk_divisor,
        serial_divisor,
        bit_clock_hz: required_hz,
    })
}

/// Split `total` into `gclk × serial` with the largest `gclk ≤ gclk_max`
/// whose cofactor fits the serial stage.
fn split(total: u32, gclk_max: u32) -> Option<(u16, u8)> {
    let start = total.min(gclk_max);
    (1..=start).rev().find_map(|g| {
        let serial = total.checked_div(g)?;
        if total.checked_rem(g)? != 0 || serial > MAX_SERIAL_DIVISOR {
            return None;
        }
        Some((u16::try_from(g).ok()?, u8::try_from(serial).ok()?))
    })
}
