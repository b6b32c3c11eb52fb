//! Peripheral-access layer for the SAMD21 I2S block
//!
//! This crate provides the trait seams a PDM microphone driver calls into,
//! so the driver can be developed and tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (decimation / audio pipeline)
//!         ↓
//! Driver (pdm-mic crate)
//!         ↓
//! Peripheral-access layer (this crate - trait seams)
//!         ↓
//! Hardware Layer (PAC: I2S, GCLK, PM, PORT register blocks)
//! ```
//!
//! # Seams
//!
//! - [`I2sRegisters`] - raw I2S register read/write
//! - [`ClockControl`] - generic clock generators, channels and bus gating
//! - [`PinMux`] - pin-function assignment
//!
//! The I2S block itself is represented by the move-only [`I2s`] handle.
//!
//! # Features
//!
//! - `defmt`: Enable defmt::Format derives
//! - `serde`: Serialize/Deserialize for the audio newtypes

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
// Pedantic lints suppressed for this hardware access crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod audio_types;
pub mod clock;
pub mod gpio;
pub mod peripheral;

pub use audio_types::{ChannelMode, OutOfRangeError, SampleRateHz};
pub use clock::{ClockControl, ClockSource, GclkId, PeripheralChannel, AUDIO_PLL_HZ};
pub use gpio::{PinFunction, PinId, PinMux, Port};
pub use peripheral::{ClockUnit, I2s, I2sRegister, I2sRegisters, Serializer};
