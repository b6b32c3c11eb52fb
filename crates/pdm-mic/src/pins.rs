//! Pin binding: which physical pins carry the PDM clock and data lines.
//!
//! The clock pin decides the clock unit and the data pin decides the
//! serializer; both are fixed by the SAMD21 pin multiplexer (function G).
//!
//! | Pin  | Signal | Unit              |
//! |------|--------|-------------------|
//! | PA10 | SCK0   | clock unit 0      |
//! | PA20 | SCK0   | clock unit 0      |
//! | PB11 | SCK1   | clock unit 1      |
//! | PA07 | SD0    | serializer 0      |
//! | PA19 | SD0    | serializer 0      |
//! | PA08 | SD1    | serializer 1      |

use platform::{ClockSource, ClockUnit, GclkId, PinId, Serializer};

use crate::error::{BindingFailure, PdmError};

/// Pins that can drive SCK, with the clock unit they belong to.
pub const CLOCK_PINS: &[(PinId, ClockUnit)] = &[
    (PinId::pa(10), ClockUnit::Zero),
    (PinId::pa(20), ClockUnit::Zero),
    (PinId::pb(11), ClockUnit::One),
];

/// Pins that can receive SDn, with the serializer they belong to.
pub const DATA_PINS: &[(PinId, Serializer)] = &[
    (PinId::pa(7), Serializer::Zero),
    (PinId::pa(19), Serializer::Zero),
    (PinId::pa(8), Serializer::One),
];

/// Clock pin, data pin and generic clock for one microphone.
///
/// Immutable once built; the clock unit and serializer are resolved in
/// [`PinBinding::new`] and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    clock_pin: PinId,
    data_pin: PinId,
    clock_unit: ClockUnit,
    serializer: Serializer,
    gclk: GclkId,
    source: ClockSource,
}

impl PinBinding {
    /// Generic clock generator used unless overridden.
    pub const DEFAULT_GCLK: u8 = 3;

    /// Resolve the clock and data pins to their I2S units.
    ///
    /// Uses generator 3 and the audio PLL as reference; see
    /// [`with_gclk`](Self::with_gclk) and [`with_source`](Self::with_source).
    ///
    /// # Errors
    ///
    /// Returns [`PdmError::ResourceBinding`] if either pin has no I2S
    /// function.
    pub fn new(clock_pin: PinId, data_pin: PinId) -> Result<Self, PdmError> {
        let clock_unit = CLOCK_PINS
            .iter()
            .find(|(pin, _)| *pin == clock_pin)
            .map(|(_, unit)| *unit)
            .ok_or(PdmError::ResourceBinding(BindingFailure::InvalidClockPin))?;
        let serializer = DATA_PINS
            .iter()
            .find(|(pin, _)| *pin == data_pin)
            .map(|(_, ser)| *ser)
            .ok_or(PdmError::ResourceBinding(BindingFailure::InvalidDataPin))?;

        Ok(Self {
            clock_pin,
            data_pin,
            clock_unit,
            serializer,
            gclk: GclkId::gclk3(),
            source: ClockSource::default(),
        })
    }

    /// Use a different generic clock generator.
    #[must_use]
    pub fn with_gclk(mut self, gclk: GclkId) -> Self {
        self.gclk = gclk;
        self
    }

    /// Use a different reference for the generator.
    #[must_use]
    pub fn with_source(mut self, source: ClockSource) -> Self {
        self.source = source;
        self
    }

    /// SCK pin
    pub fn clock_pin(&self) -> PinId {
        self.clock_pin
    }

    /// SD pin
    pub fn data_pin(&self) -> PinId {
        self.data_pin
    }

    /// Clock unit driven by the clock pin
    pub fn clock_unit(&self) -> ClockUnit {
        self.clock_unit
    }

    /// Serializer fed by the data pin
    pub fn serializer(&self) -> Serializer {
        self.serializer
    }

    /// Generic clock generator
    pub fn gclk(&self) -> GclkId {
        self.gclk
    }

    /// Generator reference
    pub fn source(&self) -> ClockSource {
        self.source
    }
}
