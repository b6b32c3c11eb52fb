//! PDM microphone capture on the SAMD21 I2S peripheral
//!
//! Drives one I2S clock unit as the PDM bit clock and one serializer in
//! PDM2 mode, and hands the caller raw 32-bit words of oversampled PDM
//! bits. Decimation to PCM is left to the application.
//!
//! # Architecture
//!
//! ```text
//! Application (decimation filter)
//!         ↓  read() / read_into()
//! PdmMic (driver: lifecycle, register sequences)
//!         ↓  clock_math::compute()      pins::PinBinding
//! platform seams: I2sRegisters + ClockControl + PinMux
//!         ↓
//! PAC (target)   |   mock::MockI2s (host)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let binding = PinBinding::new(PinId::pa(10), PinId::pa(8))?;
//! let mut mic = PdmMic::new(I2s::take().unwrap(), board_hal, binding);
//! mic.begin()?;
//! mic.configure(16_000, false)?;
//! let mut block = [0u32; 64];
//! mic.read_into(&mut block)?;
//! ```
//!
//! # Features
//!
//! - `defmt`: target logging and `defmt::Format` derives
//! - `tracing`: host logging through the `tracing` facade
//! - `std`: `std::error::Error` for [`PdmError`]
//! - `serde`: Serialize/Deserialize for [`PdmConfig`]

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // register names in doc comments

// Must come first so the logging macros are visible to later modules.
mod fmt;

pub mod clock_math;
pub mod config;
pub mod driver;
pub mod error;
pub mod mock;
pub mod overrun;
pub mod pins;
pub mod registers;

pub use clock_math::{ClockConfig, ClockError, MAX_SERIAL_CLOCK_HZ, OVERSAMPLING_RATIO};
pub use config::PdmConfig;
pub use driver::{DriverState, PdmMic, SYNC_POLL_LIMIT};
pub use error::{BindingFailure, PdmError, SyncPoint};
pub use overrun::OverrunMonitor;
pub use pins::PinBinding;
