//! SAMD21 I2S register bit map
//!
//! Source: Microchip SAM D21/DA1 Family Data Sheet, chapter "I2S - Inter-IC
//! Sound Controller", register summary and register descriptions.
//!
//! # Key Constraints
//!
//! ## Write-synchronized bits
//! CTRLA.SWRST, CTRLA.ENABLE, CTRLA.CKENn, CTRLA.SERENn and DATAn are
//! synchronized to the generic clock domain. After writing any of them the
//! matching SYNCBUSY bit stays set until the write has taken effect; the
//! next write to the same bit must wait for it to clear.
//!
//! ## Enable-protected registers
//! CLKCTRLn and SERCTRLn are enable-protected: they can only be written
//! while CTRLA.ENABLE is zero. Reconfiguration therefore always disables
//! the module first.
//!
//! ## RXRDY clearing
//! INTFLAG bits are cleared by writing a one. Reading DATAn also clears
//! RXRDYn on silicon, but the driver clears it explicitly so behaviour does
//! not depend on the read-side effect.

use platform::{ClockUnit, Serializer};

// ---------------------------------------------------------------------------
// CTRLA
// ---------------------------------------------------------------------------

/// Software reset (self-clearing)
pub const CTRLA_SWRST: u32 = 1 << 0;

/// Module enable
pub const CTRLA_ENABLE: u32 = 1 << 1;

/// Clock unit 0 enable
pub const CTRLA_CKEN0: u32 = 1 << 2;

/// Clock unit 1 enable
pub const CTRLA_CKEN1: u32 = 1 << 3;

/// Serializer 0 enable
pub const CTRLA_SEREN0: u32 = 1 << 4;

/// Serializer 1 enable
pub const CTRLA_SEREN1: u32 = 1 << 5;

/// Any clock unit or serializer enable bit
pub const CTRLA_UNITS: u32 = CTRLA_CKEN0 | CTRLA_CKEN1 | CTRLA_SEREN0 | CTRLA_SEREN1;

/// `CKENn` bit for a clock unit.
pub const fn ctrla_cken(unit: ClockUnit) -> u32 {
    match unit {
        ClockUnit::Zero => CTRLA_CKEN0,
        ClockUnit::One => CTRLA_CKEN1,
    }
}

/// `SERENn` bit for a serializer.
pub const fn ctrla_seren(ser: Serializer) -> u32 {
    match ser {
        Serializer::Zero => CTRLA_SEREN0,
        Serializer::One => CTRLA_SEREN1,
    }
}

// ---------------------------------------------------------------------------
// SYNCBUSY (bit positions mirror CTRLA, plus DATAn)
// ---------------------------------------------------------------------------

/// Software reset synchronization busy
pub const SYNCBUSY_SWRST: u32 = 1 << 0;

/// Enable synchronization busy
pub const SYNCBUSY_ENABLE: u32 = 1 << 1;

/// Data 0 synchronization busy
pub const SYNCBUSY_DATA0: u32 = 1 << 8;

/// Data 1 synchronization busy
pub const SYNCBUSY_DATA1: u32 = 1 << 9;

/// SYNCBUSY bit for a clock unit enable.
pub const fn syncbusy_cken(unit: ClockUnit) -> u32 {
    ctrla_cken(unit)
}

/// SYNCBUSY bit for a serializer enable.
pub const fn syncbusy_seren(ser: Serializer) -> u32 {
    ctrla_seren(ser)
}

/// SYNCBUSY bit for a serializer data register.
pub const fn syncbusy_data(ser: Serializer) -> u32 {
    match ser {
        Serializer::Zero => SYNCBUSY_DATA0,
        Serializer::One => SYNCBUSY_DATA1,
    }
}

// ---------------------------------------------------------------------------
// INTFLAG / INTENSET / INTENCLR
// ---------------------------------------------------------------------------

/// Receive ready 0
pub const INTFLAG_RXRDY0: u32 = 1 << 0;

/// Receive ready 1
pub const INTFLAG_RXRDY1: u32 = 1 << 1;

/// Receive overrun 0
pub const INTFLAG_RXOR0: u32 = 1 << 4;

/// Receive overrun 1
pub const INTFLAG_RXOR1: u32 = 1 << 5;

/// Every receive/transmit flag (ready, overrun, underrun)
pub const INTFLAG_ALL: u32 = 0x3333;

/// `RXRDYn` bit for a serializer.
pub const fn intflag_rxrdy(ser: Serializer) -> u32 {
    match ser {
        Serializer::Zero => INTFLAG_RXRDY0,
        Serializer::One => INTFLAG_RXRDY1,
    }
}

/// `RXORn` bit for a serializer.
pub const fn intflag_rxor(ser: Serializer) -> u32 {
    match ser {
        Serializer::Zero => INTFLAG_RXOR0,
        Serializer::One => INTFLAG_RXOR1,
    }
}

// ---------------------------------------------------------------------------
// CLKCTRLn fields
// ---------------------------------------------------------------------------

/// SLOTSIZE = 32 bits (bits 1:0 = 3)
pub const CLKCTRL_SLOTSIZE_32: u32 = 0x3;

/// NBSLOTS field shift (bits 4:2, value = slots - 1)
pub const CLKCTRL_NBSLOTS_SHIFT: u32 = 2;

/// NBSLOTS = 1 slot per frame (mono)
pub const CLKCTRL_NBSLOTS_1: u32 = 0 << CLKCTRL_NBSLOTS_SHIFT;

/// NBSLOTS = 2 slots per frame (stereo)
pub const CLKCTRL_NBSLOTS_2: u32 = 1 << CLKCTRL_NBSLOTS_SHIFT;

/// FSWIDTH = SLOT (bits 6:5 = 0): FS pulse one slot wide
pub const CLKCTRL_FSWIDTH_SLOT: u32 = 0 << 5;

/// BITDELAY = LJ (bit 7 = 0): no delay after FS
pub const CLKCTRL_BITDELAY_LJ: u32 = 0 << 7;

/// FSSEL = SCKDIV (bit 8 = 0): FS divided from SCK
pub const CLKCTRL_FSSEL_SCKDIV: u32 = 0 << 8;

/// SCKSEL = MCKDIV (bit 10 = 0): SCK divided from MCK
pub const CLKCTRL_SCKSEL_MCKDIV: u32 = 0 << 10;

/// MCKSEL = GCLK (bit 12 = 0): MCK from the generic clock
pub const CLKCTRL_MCKSEL_GCLK: u32 = 0 << 12;

/// MCKDIV field shift (bits 20:16, SCK = MCK / (MCKDIV + 1))
pub const CLKCTRL_MCKDIV_SHIFT: u32 = 16;

/// MCKDIV field mask (5 bits, before shifting)
pub const CLKCTRL_MCKDIV_MASK: u32 = 0x1F;

// ---------------------------------------------------------------------------
// SERCTRLn fields
// ---------------------------------------------------------------------------

/// SERMODE = PDM2 (bits 1:0 = 2): receive, sample on both SCK edges
pub const SERCTRL_SERMODE_PDM2: u32 = 0x2;

/// SERMODE field mask
pub const SERCTRL_SERMODE_MASK: u32 = 0x3;

/// CLKSEL (bit 5): 0 = clock unit 0, 1 = clock unit 1
pub const SERCTRL_CLKSEL_CLK1: u32 = 1 << 5;

/// DATASIZE = 32 bits (bits 10:8 = 0)
pub const SERCTRL_DATASIZE_32: u32 = 0 << 8;

/// WORDADJ = RIGHT (bit 12 = 0)
pub const SERCTRL_WORDADJ_RIGHT: u32 = 0 << 12;

/// EXTEND = ZERO (bits 14:13 = 0)
pub const SERCTRL_EXTEND_ZERO: u32 = 0 << 13;

/// BITREV = MSBIT (bit 15 = 0): first received bit lands in the MSB
pub const SERCTRL_BITREV_MSBIT: u32 = 0 << 15;

/// BITREV = LSBIT (bit 15 = 1)
pub const SERCTRL_BITREV_LSBIT: u32 = 1 << 15;

/// MONO (bit 24): only the first slot of each frame is stored
pub const SERCTRL_MONO: u32 = 1 << 24;

/// DMA = SINGLE (bit 25 = 0)
pub const SERCTRL_DMA_SINGLE: u32 = 0 << 25;

/// `CLKSEL` bits selecting a clock unit.
pub const fn serctrl_clksel(unit: ClockUnit) -> u32 {
    match unit {
        ClockUnit::Zero => 0,
        ClockUnit::One => SERCTRL_CLKSEL_CLK1,
    }
}
