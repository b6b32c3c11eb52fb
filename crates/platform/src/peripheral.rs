//! I2S peripheral handle and register-access seam
//!
//! The SAMD21 has exactly one I2S block at a fixed address. The driver must
//! hold it exclusively, so the block is represented by a move-only token
//! ([`I2s`]) that can be taken once per program. Register access goes through
//! the [`I2sRegisters`] trait so the same driver runs against the PAC on
//! target and against `pdm_mic::mock::MockI2s` on the host.
//!
//! # Register layout (SAMD21 datasheet, I2S chapter)
//!
//! | Offset        | Register   | Width |
//! |---------------|------------|-------|
//! | `0x00`        | CTRLA      | 8     |
//! | `0x04 + 4·n`  | CLKCTRLn   | 32    |
//! | `0x0C`        | INTENCLR   | 16    |
//! | `0x10`        | INTENSET   | 16    |
//! | `0x14`        | INTFLAG    | 16    |
//! | `0x18`        | SYNCBUSY   | 16    |
//! | `0x20 + 4·n`  | SERCTRLn   | 32    |
//! | `0x30 + 4·n`  | DATAn      | 32    |

use core::cell::Cell;

use critical_section::Mutex;

/// Set once [`I2s::take`] has handed out the handle.
static I2S_TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// Exclusive handle to the I2S peripheral.
///
/// Not `Clone`/`Copy`: owning an `I2s` value is the proof that no other code
/// is programming the block. Pass it by value into the driver and get it
/// back when the driver is freed.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2s {
    _private: (),
}

impl I2s {
    /// Take the I2S handle.
    ///
    /// Returns `Some` exactly once per program run; every later call returns
    /// `None`.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = I2S_TAKEN.borrow(cs);
            if taken.get() {
                None
            } else {
                taken.set(true);
                Some(Self { _private: () })
            }
        })
    }

    /// Create the handle without checking whether it was already taken.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other live `I2s` value is used to program
    /// the peripheral at the same time. Intended for host tests and for
    /// recovery code that has just reclaimed the block.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

/// Clock unit (0 or 1): drives SCK/FS for the serializers bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockUnit {
    /// Clock unit 0 (SCK0/FS0/MCK0)
    Zero,
    /// Clock unit 1 (SCK1/FS1/MCK1)
    One,
}

impl ClockUnit {
    /// Index used in register names (`CLKCTRLn`, `CKENn`).
    pub const fn index(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Serializer (0 or 1): shifts one SDn line into `DATAn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Serializer {
    /// Serializer 0 (SD0)
    Zero,
    /// Serializer 1 (SD1)
    One,
}

impl Serializer {
    /// Index used in register names (`SERCTRLn`, `DATAn`, `RXRDYn`).
    pub const fn index(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// I2S register selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sRegister {
    /// Control A: reset, module/clock-unit/serializer enables
    CtrlA,
    /// Clock unit control
    ClkCtrl(ClockUnit),
    /// Interrupt enable clear
    IntEnClr,
    /// Interrupt enable set
    IntEnSet,
    /// Interrupt flags (write 1 to clear)
    IntFlag,
    /// Synchronization busy status (read-only)
    SyncBusy,
    /// Serializer control
    SerCtrl(Serializer),
    /// Serializer data
    Data(Serializer),
}

impl I2sRegister {
    /// Byte offset of the register from the I2S base address.
    pub const fn offset(self) -> u32 {
        match self {
            Self::CtrlA => 0x00,
            Self::ClkCtrl(ClockUnit::Zero) => 0x04,
            Self::ClkCtrl(ClockUnit::One) => 0x08,
            Self::IntEnClr => 0x0C,
            Self::IntEnSet => 0x10,
            Self::IntFlag => 0x14,
            Self::SyncBusy => 0x18,
            Self::SerCtrl(Serializer::Zero) => 0x20,
            Self::SerCtrl(Serializer::One) => 0x24,
            Self::Data(Serializer::Zero) => 0x30,
            Self::Data(Serializer::One) => 0x34,
        }
    }
}

/// Raw register access to the I2S block.
///
/// Implementations are synchronous and infallible, like volatile MMIO.
/// Narrow registers (CTRLA, INTFLAG, SYNCBUSY) are zero-extended to `u32`.
pub trait I2sRegisters {
    /// Read a register.
    ///
    /// Takes `&mut self` because reading `DATAn` has side effects on
    /// hardware (it pops the receive holding register).
    fn read(&mut self, reg: I2sRegister) -> u32;

    /// Write a register.
    fn write(&mut self, reg: I2sRegister, value: u32);

    /// Read-modify-write a register.
    fn modify<F>(&mut self, reg: I2sRegister, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_offsets_match_datasheet_layout() {
        assert_eq!(I2sRegister::CtrlA.offset(), 0x00);
        assert_eq!(I2sRegister::ClkCtrl(ClockUnit::One).offset(), 0x08);
        assert_eq!(I2sRegister::SyncBusy.offset(), 0x18);
        assert_eq!(I2sRegister::SerCtrl(Serializer::One).offset(), 0x24);
        assert_eq!(I2sRegister::Data(Serializer::Zero).offset(), 0x30);
    }

    #[test]
    fn unit_indices() {
        assert_eq!(ClockUnit::Zero.index(), 0);
        assert_eq!(ClockUnit::One.index(), 1);
        assert_eq!(Serializer::Zero.index(), 0);
        assert_eq!(Serializer::One.index(), 1);
    }

    /// The handle is handed out once; this is the only test in the crate
    /// that calls `take()`.
    #[test]
    fn take_returns_handle_once() {
        assert!(I2s::take().is_some());
        assert!(I2s::take().is_none());
    }
}
