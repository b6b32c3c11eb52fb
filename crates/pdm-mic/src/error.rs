//! Driver error type

use thiserror_no_std::Error;

use crate::clock_math::ClockError;
use crate::driver::DriverState;

/// Which part of resource acquisition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingFailure {
    /// Clock pin has no I2S SCK function.
    InvalidClockPin,
    /// Data pin has no I2S SD function.
    InvalidDataPin,
    /// Pin mux refused the clock pin.
    ClockPinMux,
    /// Pin mux refused the data pin.
    DataPinMux,
    /// The I2S block is already enabled by other code.
    PeripheralBusy,
}

/// Synchronization point whose bounded wait expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPoint {
    /// CTRLA.SWRST
    Reset,
    /// CTRLA.ENABLE
    Enable,
    /// CTRLA.CKENn
    ClockUnit,
    /// CTRLA.SERENn
    Serializer,
    /// DATAn
    Data,
}

/// PDM driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdmError {
    /// No divisor pair reproduces the requested sample rate.
    #[error("clock configuration failed: {0}")]
    Configuration(ClockError),
    /// Pin or peripheral could not be bound.
    #[error("resource binding failed: {0:?}")]
    ResourceBinding(BindingFailure),
    /// The clock collaborator refused to program or route the generator.
    #[error("generic clock generator could not be configured")]
    ClockGenerator,
    /// A synchronization wait did not finish within the poll budget.
    #[error("I2S synchronization timed out at {0:?}")]
    SyncTimeout(SyncPoint),
    /// Operation not valid in the current driver state.
    #[error("operation requires {expected:?}, driver is {actual:?}")]
    InvalidState {
        /// State the operation needs
        expected: DriverState,
        /// State the driver is in
        actual: DriverState,
    },
    /// Buffered read given an empty buffer.
    #[error("read buffer is empty")]
    EmptyBuffer,
    /// Timeout-bounded read expired before a word arrived.
    #[error("no sample arrived before the timeout")]
    Timeout,
}

impl From<ClockError> for PdmError {
    fn from(e: ClockError) -> Self {
        Self::Configuration(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PdmError::Configuration(ClockError::ZeroSampleRate).to_string(),
            "clock configuration failed: sample rate must be non-zero"
        );
        assert_eq!(
            PdmError::SyncTimeout(SyncPoint::Enable).to_string(),
            "I2S synchronization timed out at Enable"
        );
        assert_eq!(
            PdmError::InvalidState {
                expected: DriverState::Running,
                actual: DriverState::Idle,
            }
            .to_string(),
            "operation requires Running, driver is Idle"
        );
    }
}
