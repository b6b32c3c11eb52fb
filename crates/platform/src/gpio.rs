//! Pin identifiers and the pin-multiplexing seam
//!
//! The driver only needs to hand two pins to the I2S block and take them
//! back. Electrical configuration (pulls, drive strength) stays with the
//! board layer behind [`PinMux`].

/// GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Port A
    A,
    /// Port B
    B,
}

/// Physical pin: port plus pin number within the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    /// Port the pin belongs to
    pub port: Port,
    /// Pin number within the port (0–31)
    pub pin: u8,
}

impl PinId {
    /// Pin on port A.
    pub const fn pa(pin: u8) -> Self {
        Self { port: Port::A, pin }
    }

    /// Pin on port B.
    pub const fn pb(pin: u8) -> Self {
        Self { port: Port::B, pin }
    }
}

impl core::fmt::Display for PinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let port = match self.port {
            Port::A => 'A',
            Port::B => 'B',
        };
        write!(f, "P{port}{:02}", self.pin)
    }
}

/// Peripheral multiplexer function (`PMUXn.PMUXE/PMUXO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// EIC
    A,
    /// ADC / AC / DAC / PTC
    B,
    /// SERCOM
    C,
    /// SERCOM-ALT
    D,
    /// TC / TCC
    E,
    /// TCC
    F,
    /// COM / AC / I2S
    G,
    /// GCLK output
    H,
}

impl PinFunction {
    /// Function letter the I2S signals live on.
    pub const I2S: Self = Self::G;

    /// `PMUX` field value (A = 0 … H = 7).
    pub const fn pmux(self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
            Self::E => 4,
            Self::F => 5,
            Self::G => 6,
            Self::H => 7,
        }
    }
}

/// Pin-function assignment primitives.
pub trait PinMux {
    /// Error type
    type Error: core::fmt::Debug;

    /// Hand `pin` to a peripheral function (sets `PINCFG.PMUXEN`).
    fn assign(&mut self, pin: PinId, function: PinFunction) -> Result<(), Self::Error>;

    /// Return `pin` to GPIO control (clears `PINCFG.PMUXEN`).
    fn release(&mut self, pin: PinId) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i2s_is_function_g() {
        assert_eq!(PinFunction::I2S, PinFunction::G);
        assert_eq!(PinFunction::I2S.pmux(), 6);
    }

    #[test]
    fn pin_display() {
        assert_eq!(PinId::pa(7).to_string(), "PA07");
        assert_eq!(PinId::pb(11).to_string(), "PB11");
    }
}
