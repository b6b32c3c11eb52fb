//! Blocking PDM capture on one I2S clock unit and serializer.
//!
//! # Lifecycle
//!
//! ```text
//!              begin()            configure()
//! Uninitialized ──────> Idle ─────────────────> Running ──┐
//!       ^                │                        │  ^     │ configure()
//!       │     end()      │                        │  └─────┘
//!       ├────────────────┘            end()       │
//!       ├─────────────────────────────────────────┘
//!       │     end()
//!       └──────────── Faulted <── sync timeout in configure()/read()
//! ```
//!
//! # Register sequences
//!
//! `begin`: mux both pins to function G, ungate the APB clock, refuse a
//! block that is already enabled, `CTRLA.SWRST` and wait for it.
//!
//! `configure`: clear `SERENn`, `CKENn`, `ENABLE` (each synchronized),
//! program the GCLK generator and route it to `GCLK_I2S_n`, write
//! `CLKCTRLn` and `SERCTRLn` (enable-protected), then set `ENABLE`,
//! `CKENn`, `SERENn` in that order and drop stale receive flags.
//!
//! `read`: spin on `INTFLAG.RXRDYn`, note `RXORn`, wait for `SYNCBUSY.DATAn`,
//! read `DATAn`, clear the flags that were seen.

use embedded_hal::delay::DelayNs;
use platform::{
    ChannelMode, ClockControl, ClockUnit, I2s, I2sRegister, I2sRegisters, PeripheralChannel,
    PinFunction, PinId, PinMux,
};

use crate::clock_math::{self, ClockConfig};
use crate::config::PdmConfig;
use crate::error::{BindingFailure, PdmError, SyncPoint};
use crate::overrun::OverrunMonitor;
use crate::pins::PinBinding;
use crate::registers::{
    ctrla_cken, ctrla_seren, intflag_rxor, intflag_rxrdy, serctrl_clksel, syncbusy_cken,
    syncbusy_data, syncbusy_seren, CLKCTRL_BITDELAY_LJ, CLKCTRL_FSSEL_SCKDIV,
    CLKCTRL_FSWIDTH_SLOT, CLKCTRL_MCKSEL_GCLK, CLKCTRL_NBSLOTS_1, CLKCTRL_NBSLOTS_2,
    CLKCTRL_SCKSEL_MCKDIV, CLKCTRL_SLOTSIZE_32, CTRLA_ENABLE, CTRLA_SWRST, SERCTRL_BITREV_MSBIT,
    SERCTRL_DATASIZE_32, SERCTRL_DMA_SINGLE, SERCTRL_EXTEND_ZERO, SERCTRL_MONO,
    SERCTRL_SERMODE_PDM2, SERCTRL_WORDADJ_RIGHT, SYNCBUSY_ENABLE, SYNCBUSY_SWRST,
};

/// `SYNCBUSY` polls before a synchronization wait gives up.
///
/// A write-synchronized bit settles within a few GCLK_I2S cycles; even at
/// the slowest divider this is far below 100 000 register reads at 48 MHz.
pub const SYNC_POLL_LIMIT: u32 = 100_000;

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Pins and bus clock not held.
    Uninitialized,
    /// Resources held, block reset or disabled.
    Idle,
    /// Serializer shifting in PDM words.
    Running,
    /// A synchronization wait expired mid-sequence; only `end` recovers.
    Faulted,
}

/// PDM microphone on the SAMD21 I2S block.
///
/// `H` provides register access, the clock tree and pin muxing; on target
/// it wraps the PAC, on the host it is [`MockI2s`](crate::mock::MockI2s).
#[derive(Debug)]
pub struct PdmMic<H> {
    i2s: I2s,
    hal: H,
    binding: PinBinding,
    state: DriverState,
    clock: Option<ClockConfig>,
    mode: ChannelMode,
    overrun: OverrunMonitor,
}

impl<H> PdmMic<H>
where
    H: I2sRegisters + ClockControl + PinMux,
{
    /// Bind the driver to the I2S block. Touches no hardware.
    pub fn new(i2s: I2s, hal: H, binding: PinBinding) -> Self {
        Self {
            i2s,
            hal,
            binding,
            state: DriverState::Uninitialized,
            clock: None,
            mode: ChannelMode::Mono,
            overrun: OverrunMonitor::new(),
        }
    }

    /// Acquire the pins and bus clock and reset the block.
    ///
    /// On failure everything acquired so far is handed back and the driver
    /// stays [`DriverState::Uninitialized`].
    pub fn begin(&mut self) -> Result<(), PdmError> {
        self.require(DriverState::Uninitialized)?;
        let clock_pin = self.binding.clock_pin();
        let data_pin = self.binding.data_pin();

        if self.hal.assign(clock_pin, PinFunction::I2S).is_err() {
            warn!("pin {} refused I2S function", clock_pin);
            return Err(PdmError::ResourceBinding(BindingFailure::ClockPinMux));
        }
        if self.hal.assign(data_pin, PinFunction::I2S).is_err() {
            warn!("pin {} refused I2S function", data_pin);
            self.release_pin(clock_pin);
            return Err(PdmError::ResourceBinding(BindingFailure::DataPinMux));
        }

        self.hal.set_i2s_bus_clock(true);
        if self.hal.read(I2sRegister::CtrlA) & CTRLA_ENABLE != 0 {
            // Bus clock belongs to whoever enabled the block; leave it on.
            warn!("I2S already enabled by other code");
            self.release_pins();
            return Err(PdmError::ResourceBinding(BindingFailure::PeripheralBusy));
        }

        self.hal.write(I2sRegister::CtrlA, CTRLA_SWRST);
        if let Err(e) = self.wait_sync(SYNCBUSY_SWRST, SyncPoint::Reset) {
            self.release_pins();
            self.hal.set_i2s_bus_clock(false);
            return Err(e);
        }

        self.state = DriverState::Idle;
        info!("PDM bound: SCK {} SD {}", clock_pin, data_pin);
        Ok(())
    }

    /// Stop capture and hand back every resource.
    ///
    /// No-op when uninitialized. The driver ends up
    /// [`DriverState::Uninitialized`] even if a synchronization wait expires;
    /// that error is still returned.
    pub fn end(&mut self) -> Result<(), PdmError> {
        if self.state == DriverState::Uninitialized {
            return Ok(());
        }

        let disabled = self.disable();
        // A refused reconfigure drops `clock` but may leave the old routing.
        let disconnected = self
            .hal
            .disconnect(PeripheralChannel::I2s(self.binding.clock_unit()))
            .map_err(|_| PdmError::ClockGenerator);
        self.release_pins();
        self.hal.set_i2s_bus_clock(false);

        self.state = DriverState::Uninitialized;
        self.clock = None;
        self.mode = ChannelMode::Mono;
        self.overrun.clear();
        info!("PDM released");
        disabled.and(disconnected)
    }

    /// Program the clock tree and frame format, then start capture.
    ///
    /// `stereo` selects two microphones sharing the data line. The divisors
    /// are computed before any register is touched, so an unreachable rate
    /// leaves the driver exactly as it was.
    pub fn configure(&mut self, sample_rate_hz: u32, stereo: bool) -> Result<(), PdmError> {
        self.apply(sample_rate_hz, ChannelMode::from_stereo(stereo))
    }

    /// [`configure`](Self::configure) from a [`PdmConfig`].
    pub fn configure_with(&mut self, config: PdmConfig) -> Result<(), PdmError> {
        self.apply(config.sample_rate.get(), config.mode)
    }

    /// Block until the serializer delivers one 32-bit PDM word.
    ///
    /// Waits for data without a timeout; see
    /// [`read_timeout`](Self::read_timeout) for a bounded wait.
    pub fn read(&mut self) -> Result<u32, PdmError> {
        self.require(DriverState::Running)?;
        loop {
            if let Some(word) = self.poll()? {
                return Ok(word);
            }
            core::hint::spin_loop();
        }
    }

    /// Fill `buf` with consecutive words.
    ///
    /// An empty buffer is rejected without touching hardware.
    pub fn read_into(&mut self, buf: &mut [u32]) -> Result<(), PdmError> {
        if buf.is_empty() {
            return Err(PdmError::EmptyBuffer);
        }
        self.require(DriverState::Running)?;
        for slot in buf.iter_mut() {
            *slot = self.read()?;
        }
        Ok(())
    }

    /// Take a word if one is ready, without waiting.
    pub fn try_read(&mut self) -> Result<Option<u32>, PdmError> {
        self.require(DriverState::Running)?;
        self.poll()
    }

    /// Wait up to `timeout_us` microseconds for one word.
    pub fn read_timeout<D: DelayNs>(
        &mut self,
        delay: &mut D,
        timeout_us: u32,
    ) -> Result<u32, PdmError> {
        self.require(DriverState::Running)?;
        let mut waited: u32 = 0;
        loop {
            if let Some(word) = self.poll()? {
                return Ok(word);
            }
            if waited >= timeout_us {
                return Err(PdmError::Timeout);
            }
            delay.delay_us(1);
            waited = waited.saturating_add(1);
        }
    }

    /// Overruns seen since the last clear, `None` if none.
    pub fn overruns(&self) -> Option<u16> {
        self.overrun.count()
    }

    /// Forget recorded overruns.
    pub fn clear_overruns(&mut self) {
        self.overrun.clear();
    }

    /// Serializer index (0 or 1) the data pin resolved to.
    pub fn serializer_index(&self) -> u8 {
        self.binding.serializer().index()
    }

    /// Clock unit index (0 or 1) the clock pin resolved to.
    pub fn clock_unit_index(&self) -> u8 {
        self.binding.clock_unit().index()
    }

    /// Divisors currently programmed, if configured.
    pub fn clock_config(&self) -> Option<ClockConfig> {
        self.clock
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Channel mode currently programmed, mono when unconfigured.
    pub fn channel_mode(&self) -> ChannelMode {
        self.mode
    }

    /// Pin binding
    pub fn binding(&self) -> &PinBinding {
        &self.binding
    }

    /// Borrow the hardware collaborator.
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Mutably borrow the hardware collaborator.
    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Shut down and return the peripheral handle and collaborator.
    pub fn free(mut self) -> (I2s, H) {
        if self.end().is_err() {
            warn!("PDM shutdown incomplete");
        }
        (self.i2s, self.hal)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn require(&self, expected: DriverState) -> Result<(), PdmError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PdmError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn release_pin(&mut self, pin: PinId) {
        if self.hal.release(pin).is_err() {
            warn!("pin {} could not be released", pin);
        }
    }

    fn release_pins(&mut self) {
        self.release_pin(self.binding.clock_pin());
        self.release_pin(self.binding.data_pin());
    }

    fn apply(&mut self, sample_rate_hz: u32, mode: ChannelMode) -> Result<(), PdmError> {
        if !matches!(self.state, DriverState::Idle | DriverState::Running) {
            return Err(PdmError::InvalidState {
                expected: DriverState::Idle,
                actual: self.state,
            });
        }

        let clock = clock_math::compute(sample_rate_hz, self.binding.source(), self.binding.gclk())
            .map_err(|e| {
                warn!("no divisors for {} Hz: {:?}", sample_rate_hz, e);
                PdmError::from(e)
            })?;
        debug!(
            "PDM {} Hz: GCLK{} /{} MCKDIV /{} SCK {} Hz",
            sample_rate_hz,
            self.binding.gclk().get(),
            clock.gclk_divisor,
            clock.serial_divisor,
            clock.bit_clock_hz
        );

        let result = self.program(clock, mode);
        if let Err(PdmError::SyncTimeout(_)) = result {
            self.state = DriverState::Faulted;
        }
        result
    }

    fn program(&mut self, clock: ClockConfig, mode: ChannelMode) -> Result<(), PdmError> {
        let unit = self.binding.clock_unit();
        let ser = self.binding.serializer();
        let gclk = self.binding.gclk();

        self.disable()?;
        self.state = DriverState::Idle;
        self.clock = None;
        self.mode = ChannelMode::Mono;

        if self
            .hal
            .configure_generator(gclk, self.binding.source(), clock.gclk_divisor)
            .is_err()
        {
            error!("GCLK{} rejected divisor {}", gclk.get(), clock.gclk_divisor);
            return Err(PdmError::ClockGenerator);
        }
        if self
            .hal
            .connect(PeripheralChannel::I2s(unit), gclk)
            .is_err()
        {
            error!("GCLK{} could not be routed to I2S", gclk.get());
            return Err(PdmError::ClockGenerator);
        }

        self.hal
            .write(I2sRegister::ClkCtrl(unit), clkctrl_value(&clock, mode));
        self.hal
            .write(I2sRegister::SerCtrl(ser), serctrl_value(unit, mode));
        self.clock = Some(clock);
        self.mode = mode;

        self.set_ctrla(CTRLA_ENABLE, SYNCBUSY_ENABLE, SyncPoint::Enable)?;
        self.set_ctrla(ctrla_cken(unit), syncbusy_cken(unit), SyncPoint::ClockUnit)?;
        self.set_ctrla(ctrla_seren(ser), syncbusy_seren(ser), SyncPoint::Serializer)?;

        self.hal
            .write(I2sRegister::IntFlag, intflag_rxrdy(ser) | intflag_rxor(ser));
        self.overrun.clear();
        self.state = DriverState::Running;
        Ok(())
    }

    /// Stop the serializer, clock unit and module, in that order.
    ///
    /// Every bit is cleared even if an earlier sync wait expires; the first
    /// timeout is returned.
    fn disable(&mut self) -> Result<(), PdmError> {
        let unit = self.binding.clock_unit();
        let ser = self.binding.serializer();
        let serializer =
            self.clear_ctrla(ctrla_seren(ser), syncbusy_seren(ser), SyncPoint::Serializer);
        let clock_unit =
            self.clear_ctrla(ctrla_cken(unit), syncbusy_cken(unit), SyncPoint::ClockUnit);
        let module = self.clear_ctrla(CTRLA_ENABLE, SYNCBUSY_ENABLE, SyncPoint::Enable);
        serializer.and(clock_unit).and(module)
    }

    fn set_ctrla(&mut self, bit: u32, sync: u32, point: SyncPoint) -> Result<(), PdmError> {
        self.hal.modify(I2sRegister::CtrlA, |v| v | bit);
        self.wait_sync(sync, point)
    }

    fn clear_ctrla(&mut self, bit: u32, sync: u32, point: SyncPoint) -> Result<(), PdmError> {
        self.hal.modify(I2sRegister::CtrlA, |v| v & !bit);
        self.wait_sync(sync, point)
    }

    fn wait_sync(&mut self, mask: u32, point: SyncPoint) -> Result<(), PdmError> {
        for _ in 0..SYNC_POLL_LIMIT {
            if self.hal.read(I2sRegister::SyncBusy) & mask == 0 {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        error!("I2S sync timeout at {:?}", point);
        Err(PdmError::SyncTimeout(point))
    }

    /// One look at `RXRDYn`; takes the word if it is there.
    fn poll(&mut self) -> Result<Option<u32>, PdmError> {
        let ser = self.binding.serializer();
        let flags = self.hal.read(I2sRegister::IntFlag);
        if flags & intflag_rxrdy(ser) == 0 {
            return Ok(None);
        }

        let overrun = flags & intflag_rxor(ser) != 0;
        if overrun {
            warn!("PDM overrun on serializer {}", ser.index());
        }
        self.overrun.on_read(overrun);

        if let Err(e) = self.wait_sync(syncbusy_data(ser), SyncPoint::Data) {
            self.state = DriverState::Faulted;
            return Err(e);
        }
        let word = self.hal.read(I2sRegister::Data(ser));

        let mut clear = intflag_rxrdy(ser);
        if overrun {
            clear |= intflag_rxor(ser);
        }
        self.hal.write(I2sRegister::IntFlag, clear);
        Ok(Some(word))
    }
}

/// `CLKCTRLn` for PDM capture.
///
/// Both microphones of a stereo pair share SCK, so only the slot count
/// depends on `mode`; the divider comes from `clock`.
pub fn clkctrl_value(clock: &ClockConfig, mode: ChannelMode) -> u32 {
    let slots = match mode {
        ChannelMode::Mono => CLKCTRL_NBSLOTS_1,
        ChannelMode::Stereo => CLKCTRL_NBSLOTS_2,
    };
    CLKCTRL_SLOTSIZE_32
        | slots
        | CLKCTRL_FSWIDTH_SLOT
        | CLKCTRL_BITDELAY_LJ
        | CLKCTRL_FSSEL_SCKDIV
        | CLKCTRL_SCKSEL_MCKDIV
        | CLKCTRL_MCKSEL_GCLK
        | clock.mckdiv_field()
}

/// `SERCTRLn` for PDM2 receive from `unit`.
pub fn serctrl_value(unit: ClockUnit, mode: ChannelMode) -> u32 {
    let mono = match mode {
        ChannelMode::Mono => SERCTRL_MONO,
        ChannelMode::Stereo => 0,
    };
    SERCTRL_SERMODE_PDM2
        | serctrl_clksel(unit)
        | SERCTRL_DATASIZE_32
        | SERCTRL_WORDADJ_RIGHT
        | SERCTRL_EXTEND_ZERO
        | SERCTRL_BITREV_MSBIT
        | mono
        | SERCTRL_DMA_SINGLE
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::registers::{CLKCTRL_MCKDIV_SHIFT, SERCTRL_CLKSEL_CLK1};
    use platform::AUDIO_PLL_HZ;

    fn clock(serial_divisor: u8) -> ClockConfig {
        ClockConfig {
            reference_hz: AUDIO_PLL_HZ,
            gclk_divisor: 48,
            serial_divisor,
            bit_clock_hz: 1_024_000,
        }
    }

    #[test]
    fn clkctrl_mono_single_slot() {
        let v = clkctrl_value(&clock(1), ChannelMode::Mono);
        assert_eq!(v, CLKCTRL_SLOTSIZE_32);
    }

    #[test]
    fn clkctrl_stereo_two_slots_and_divider() {
        let v = clkctrl_value(&clock(4), ChannelMode::Stereo);
        assert_eq!(v & CLKCTRL_NBSLOTS_2, CLKCTRL_NBSLOTS_2);
        assert_eq!(v >> CLKCTRL_MCKDIV_SHIFT, 3);
    }

    #[test]
    fn serctrl_mono_flag_and_clock_select() {
        let mono = serctrl_value(ClockUnit::One, ChannelMode::Mono);
        assert_ne!(mono & SERCTRL_MONO, 0);
        assert_ne!(mono & SERCTRL_CLKSEL_CLK1, 0);
        assert_eq!(mono & 0x3, SERCTRL_SERMODE_PDM2);

        let stereo = serctrl_value(ClockUnit::Zero, ChannelMode::Stereo);
        assert_eq!(stereo & SERCTRL_MONO, 0);
        assert_eq!(stereo & SERCTRL_CLKSEL_CLK1, 0);
    }
}
