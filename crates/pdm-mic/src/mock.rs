//! In-process model of the I2S block and its board-level collaborators.
//!
//! [`MockI2s`] implements [`I2sRegisters`], [`ClockControl`] and [`PinMux`]
//! so a [`PdmMic`](crate::PdmMic) can run on the host. It models the parts
//! of the peripheral the driver depends on:
//!
//! - `CTRLA.SWRST` resets every register and self-clears
//! - writes to synchronized `CTRLA` bits stay busy in `SYNCBUSY` for a
//!   configurable number of polls; bits marked stuck never clear
//! - `INTFLAG.RXRDYn` is raised while serializer *n*, its clock unit and the
//!   module are enabled and a word is available
//! - `DATAn` returns queued words first, then the idle word
//! - `INTFLAG` is write-one-to-clear
//!
//! Failure injection covers pin-mux refusal, generator refusal, a
//! peripheral left enabled by other code, stuck synchronization and
//! receive overruns. Fixed-capacity `heapless` collections keep the mock
//! usable without `std`.

use heapless::{Deque, Vec};
use platform::{
    ClockControl, ClockSource, ClockUnit, GclkId, I2sRegister, I2sRegisters, PeripheralChannel,
    PinFunction, PinId, PinMux, Serializer,
};

use crate::registers::{
    ctrla_cken, ctrla_seren, intflag_rxrdy, intflag_rxor, CTRLA_ENABLE, CTRLA_SWRST, CTRLA_UNITS,
    INTFLAG_ALL, SERCTRL_CLKSEL_CLK1, SYNCBUSY_SWRST,
};

/// Queued words per serializer.
pub const SAMPLE_CAPACITY: usize = 64;

/// Entries kept in each call log.
pub const LOG_CAPACITY: usize = 64;

/// Word returned by `DATAn` when the queue is empty: PDM silence is an
/// alternating bit pattern.
pub const PDM_SILENCE: u32 = 0x5555_5555;

/// Injected collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockFault {
    /// Pin mux refused the pin.
    PinRejected(PinId),
    /// Clock generator refused the configuration.
    GeneratorRejected,
    /// Peripheral channel could not be routed.
    ChannelRejected,
}

/// Generator programming recorded by [`ClockControl::configure_generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSetup {
    /// Generator index
    pub id: GclkId,
    /// Reference
    pub source: ClockSource,
    /// `GENDIV.DIV`
    pub divisor: u16,
}

/// Host model of the I2S peripheral, GCLK/PM and PORT.
#[derive(Debug)]
pub struct MockI2s {
    ctrla: u32,
    clkctrl: [u32; 2],
    serctrl: [u32; 2],
    intenset: u32,
    intflag: u32,
    syncbusy: u32,
    sync_latency: u8,
    sync_countdown: u8,
    stuck_sync: u32,
    samples: [Deque<u32, SAMPLE_CAPACITY>; 2],
    idle_word: Option<u32>,
    words_read: [u32; 2],
    bus_clock: bool,
    generator: Option<GeneratorSetup>,
    connection: Option<(PeripheralChannel, GclkId)>,
    pins: Vec<(PinId, PinFunction), 4>,
    released: Vec<PinId, LOG_CAPACITY>,
    ctrla_writes: Vec<u32, LOG_CAPACITY>,
    reject_pin: Option<PinId>,
    reject_generator: bool,
    reject_connect: bool,
}

impl Default for MockI2s {
    fn default() -> Self {
        Self::new()
    }
}

impl MockI2s {
    /// Reset-state peripheral producing silence once running.
    pub fn new() -> Self {
        Self {
            ctrla: 0,
            clkctrl: [0; 2],
            serctrl: [0; 2],
            intenset: 0,
            intflag: 0,
            syncbusy: 0,
            sync_latency: 0,
            sync_countdown: 0,
            stuck_sync: 0,
            samples: [Deque::new(), Deque::new()],
            idle_word: Some(PDM_SILENCE),
            words_read: [0; 2],
            bus_clock: false,
            generator: None,
            connection: None,
            pins: Vec::new(),
            released: Vec::new(),
            ctrla_writes: Vec::new(),
            reject_pin: None,
            reject_generator: false,
            reject_connect: false,
        }
    }

    // ── Behaviour knobs ─────────────────────────────────────────────────────

    /// Keep synchronized writes busy for `polls` reads of `SYNCBUSY`.
    #[must_use]
    pub fn with_sync_latency(mut self, polls: u8) -> Self {
        self.sync_latency = polls;
        self
    }

    /// Report `mask` busy in `SYNCBUSY` forever.
    pub fn stick_sync(&mut self, mask: u32) {
        self.stuck_sync |= mask;
    }

    /// Stop reporting stuck bits.
    pub fn release_sync(&mut self) {
        self.stuck_sync = 0;
    }

    /// Word returned when the queue is empty; `None` leaves `RXRDY` clear.
    pub fn set_idle_word(&mut self, word: Option<u32>) {
        self.idle_word = word;
    }

    /// Queue a word for `DATAn`.
    ///
    /// # Errors
    ///
    /// Returns the word back if the queue is full.
    pub fn push_sample(&mut self, ser: Serializer, word: u32) -> Result<(), u32> {
        self.queue_mut(ser).push_back(word)
    }

    /// Raise `RXORn` as if a word had been overwritten.
    pub fn inject_overrun(&mut self, ser: Serializer) {
        self.intflag |= intflag_rxor(ser);
    }

    /// Leave the module enabled, as another driver would.
    pub fn preset_enabled(&mut self) {
        self.ctrla |= CTRLA_ENABLE;
    }

    /// Refuse to mux `pin`.
    pub fn reject_pin(&mut self, pin: PinId) {
        self.reject_pin = Some(pin);
    }

    /// Refuse every generator configuration.
    pub fn reject_generator(&mut self) {
        self.reject_generator = true;
    }

    /// Refuse every channel connection.
    pub fn reject_connect(&mut self) {
        self.reject_connect = true;
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    /// Register contents without read side effects.
    pub fn register(&self, reg: I2sRegister) -> u32 {
        match reg {
            I2sRegister::CtrlA => self.ctrla,
            I2sRegister::ClkCtrl(unit) => *pick(&self.clkctrl, unit.index()),
            I2sRegister::IntEnClr | I2sRegister::IntEnSet => self.intenset,
            I2sRegister::IntFlag => self.intflag | self.ready_flags(),
            I2sRegister::SyncBusy => self.syncbusy | self.stuck_sync,
            I2sRegister::SerCtrl(ser) => *pick(&self.serctrl, ser.index()),
            I2sRegister::Data(_) => 0,
        }
    }

    /// `PM->APBCMASK.I2S` state.
    pub fn bus_clock_enabled(&self) -> bool {
        self.bus_clock
    }

    /// Last generator programming.
    pub fn generator(&self) -> Option<GeneratorSetup> {
        self.generator
    }

    /// Currently routed channel.
    pub fn connection(&self) -> Option<(PeripheralChannel, GclkId)> {
        self.connection
    }

    /// Pins currently muxed to a peripheral.
    pub fn assigned_pins(&self) -> &[(PinId, PinFunction)] {
        &self.pins
    }

    /// Pins handed back, oldest first.
    pub fn released_pins(&self) -> &[PinId] {
        &self.released
    }

    /// Every value written to `CTRLA`, oldest first.
    pub fn ctrla_writes(&self) -> &[u32] {
        &self.ctrla_writes
    }

    /// Number of `DATAn` reads.
    pub fn words_read(&self, ser: Serializer) -> u32 {
        *pick(&self.words_read, ser.index())
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn queue_mut(&mut self, ser: Serializer) -> &mut Deque<u32, SAMPLE_CAPACITY> {
        let [q0, q1] = &mut self.samples;
        match ser {
            Serializer::Zero => q0,
            Serializer::One => q1,
        }
    }

    fn queue(&self, ser: Serializer) -> &Deque<u32, SAMPLE_CAPACITY> {
        let [q0, q1] = &self.samples;
        match ser {
            Serializer::Zero => q0,
            Serializer::One => q1,
        }
    }

    fn clock_unit_of(&self, ser: Serializer) -> ClockUnit {
        if *pick(&self.serctrl, ser.index()) & SERCTRL_CLKSEL_CLK1 == 0 {
            ClockUnit::Zero
        } else {
            ClockUnit::One
        }
    }

    fn receiving(&self, ser: Serializer) -> bool {
        let unit = self.clock_unit_of(ser);
        let needed = CTRLA_ENABLE | ctrla_cken(unit) | ctrla_seren(ser);
        self.ctrla & needed == needed
    }

    fn ready_flags(&self) -> u32 {
        [Serializer::Zero, Serializer::One]
            .into_iter()
            .filter(|&ser| {
                self.receiving(ser) && (!self.queue(ser).is_empty() || self.idle_word.is_some())
            })
            .fold(0, |flags, ser| flags | intflag_rxrdy(ser))
    }

    fn mark_busy(&mut self, bits: u32) {
        if self.sync_latency > 0 && bits != 0 {
            self.syncbusy |= bits;
            self.sync_countdown = self.sync_latency;
        }
    }

    fn poll_syncbusy(&mut self) -> u32 {
        let value = self.syncbusy | self.stuck_sync;
        self.sync_countdown = self.sync_countdown.saturating_sub(1);
        if self.sync_countdown == 0 {
            self.syncbusy = 0;
        }
        value
    }

    fn write_ctrla(&mut self, value: u32) {
        let _ = self.ctrla_writes.push(value);
        if value & CTRLA_SWRST != 0 {
            self.ctrla = 0;
            self.clkctrl = [0; 2];
            self.serctrl = [0; 2];
            self.intenset = 0;
            self.intflag = 0;
            self.mark_busy(SYNCBUSY_SWRST);
            return;
        }
        let changed = (self.ctrla ^ value) & (CTRLA_ENABLE | CTRLA_UNITS);
        self.ctrla = value & (CTRLA_ENABLE | CTRLA_UNITS);
        self.mark_busy(changed);
    }

    fn read_data(&mut self, ser: Serializer) -> u32 {
        let idle = self.idle_word.unwrap_or(0);
        let word = self.queue_mut(ser).pop_front().unwrap_or(idle);
        let count = pick_mut(&mut self.words_read, ser.index());
        *count = count.saturating_add(1);
        word
    }
}

/// Two-element lookup without indexing.
fn pick<T>(pair: &[T; 2], index: u8) -> &T {
    let [first, second] = pair;
    if index == 0 {
        first
    } else {
        second
    }
}

fn pick_mut<T>(pair: &mut [T; 2], index: u8) -> &mut T {
    let [first, second] = pair;
    if index == 0 {
        first
    } else {
        second
    }
}

impl I2sRegisters for MockI2s {
    fn read(&mut self, reg: I2sRegister) -> u32 {
        match reg {
            I2sRegister::SyncBusy => self.poll_syncbusy(),
            I2sRegister::Data(ser) => self.read_data(ser),
            other => self.register(other),
        }
    }

    fn write(&mut self, reg: I2sRegister, value: u32) {
        match reg {
            I2sRegister::CtrlA => self.write_ctrla(value),
            I2sRegister::ClkCtrl(unit) => *pick_mut(&mut self.clkctrl, unit.index()) = value,
            I2sRegister::SerCtrl(ser) => *pick_mut(&mut self.serctrl, ser.index()) = value,
            I2sRegister::IntEnSet => self.intenset |= value,
            I2sRegister::IntEnClr => self.intenset &= !value,
            I2sRegister::IntFlag => self.intflag &= !(value & INTFLAG_ALL),
            I2sRegister::SyncBusy | I2sRegister::Data(_) => {}
        }
    }
}

impl ClockControl for MockI2s {
    type Error = MockFault;

    fn set_i2s_bus_clock(&mut self, enabled: bool) {
        self.bus_clock = enabled;
    }

    fn configure_generator(
        &mut self,
        id: GclkId,
        source: ClockSource,
        divisor: u16,
    ) -> Result<(), Self::Error> {
        if self.reject_generator {
            return Err(MockFault::GeneratorRejected);
        }
        self.generator = Some(GeneratorSetup {
            id,
            source,
            divisor,
        });
        Ok(())
    }

    fn connect(&mut self, channel: PeripheralChannel, id: GclkId) -> Result<(), Self::Error> {
        if self.reject_connect {
            return Err(MockFault::ChannelRejected);
        }
        self.connection = Some((channel, id));
        Ok(())
    }

    fn disconnect(&mut self, channel: PeripheralChannel) -> Result<(), Self::Error> {
        if matches!(self.connection, Some((c, _)) if c == channel) {
            self.connection = None;
        }
        Ok(())
    }
}

impl PinMux for MockI2s {
    type Error = MockFault;

    fn assign(&mut self, pin: PinId, function: PinFunction) -> Result<(), Self::Error> {
        if self.reject_pin == Some(pin) {
            return Err(MockFault::PinRejected(pin));
        }
        self.pins.retain(|(p, _)| *p != pin);
        self.pins
            .push((pin, function))
            .map_err(|_| MockFault::PinRejected(pin))
    }

    fn release(&mut self, pin: PinId) -> Result<(), Self::Error> {
        self.pins.retain(|(p, _)| *p != pin);
        let _ = self.released.push(pin);
        Ok(())
    }
}
