//! Byte-level panel protocol on top of [`PanelBus`] and the panel pins

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use eink_specs::ReadyLevel;
use platform::{PanelBus, PanelPins, SpiConfig};

use crate::error::Error;

/// How long to wait for the busy line before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusyTimeout {
    /// Delay between two samples of the busy line.
    pub poll_ms: u32,
    /// Samples taken before reporting [`Error::PanelNotResponding`]. The
    /// line is always sampled at least once.
    pub max_polls: u32,
}

impl Default for BusyTimeout {
    /// 32 ms × 1000 polls: a bit over 30 s, well above the slowest global
    /// update at low temperature.
    fn default() -> Self {
        Self {
            poll_ms: 32,
            max_polls: 1000,
        }
    }
}

/// Bus, pins and delay of one panel.
pub(crate) struct PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY> {
    bus: BUS,
    pins: PanelPins<DC, CS, BUSY, RST, PWR>,
    delay: DELAY,
    timeout: BusyTimeout,
}

impl<BUS, DC, CS, BUSY, RST, PWR, DELAY> PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    pub(crate) fn new(bus: BUS, pins: PanelPins<DC, CS, BUSY, RST, PWR>, delay: DELAY) -> Self {
        Self {
            bus,
            pins,
            delay,
            timeout: BusyTimeout::default(),
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: BusyTimeout) {
        self.timeout = timeout;
    }

    pub(crate) fn has_power_pin(&self) -> bool {
        self.pins.power.is_some()
    }

    pub(crate) fn has_secondary_cs(&self) -> bool {
        self.pins.cs_secondary.is_some()
    }

    pub(crate) fn release(self) -> (BUS, PanelPins<DC, CS, BUSY, RST, PWR>, DELAY) {
        (self.bus, self.pins, self.delay)
    }

    // -----------------------------------------------------------------------
    // Pins
    // -----------------------------------------------------------------------

    fn dc(&mut self, high: bool) -> Result<(), Error> {
        self.pins.dc.set_state(high.into()).map_err(|_| Error::Gpio)
    }

    fn cs(&mut self, high: bool) -> Result<(), Error> {
        self.pins.cs.set_state(high.into()).map_err(|_| Error::Gpio)
    }

    pub(crate) fn power(&mut self, on: bool) -> Result<(), Error> {
        match self.pins.power.as_mut() {
            Some(pin) => pin.set_state(on.into()).map_err(|_| Error::Gpio),
            None => Ok(()),
        }
    }

    pub(crate) fn busy_is_high(&mut self) -> Result<bool, Error> {
        self.pins.busy.is_high().map_err(|_| Error::Gpio)
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    // -----------------------------------------------------------------------
    // Bus
    // -----------------------------------------------------------------------

    pub(crate) fn bus_begin(&mut self, config: SpiConfig) -> Result<(), Error> {
        self.bus.begin(config).map_err(|_| Error::Bus)
    }

    pub(crate) fn bus_begin_three_wire(&mut self) -> Result<(), Error> {
        self.bus.begin_three_wire().map_err(|_| Error::Bus)
    }

    pub(crate) fn bus_end(&mut self) -> Result<(), Error> {
        self.bus.end().map_err(|_| Error::Bus)
    }

    pub(crate) fn wire_begin(&mut self) -> Result<(), Error> {
        self.bus.begin_wire().map_err(|_| Error::Bus)
    }

    fn write(&mut self, byte: u8) -> Result<(), Error> {
        self.bus.write(byte).map_err(|_| Error::Bus)
    }

    // -----------------------------------------------------------------------
    // Protocol helpers
    // -----------------------------------------------------------------------

    /// Staged reset: RST high, low, high, then CS released.
    pub(crate) fn reset(&mut self) -> Result<(), Error> {
        self.delay.delay_ms(5);
        self.pins.reset.set_high().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(5);
        self.pins.reset.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(10);
        self.pins.reset.set_high().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(5);
        self.cs(true)?;
        self.delay.delay_ms(5);
        Ok(())
    }

    /// Command byte in its own CS frame.
    pub(crate) fn send_command8(&mut self, command: u8) -> Result<(), Error> {
        self.dc(false)?;
        self.cs(false)?;
        self.write(command)?;
        self.cs(true)
    }

    /// Command and one data byte in a single CS frame.
    pub(crate) fn send_command_data8(&mut self, command: u8, data: u8) -> Result<(), Error> {
        self.dc(false)?;
        self.cs(false)?;
        self.write(command)?;
        self.dc(true)?;
        self.write(data)?;
        self.cs(true)
    }

    /// Index byte, then the data block in a second CS frame.
    pub(crate) fn send_index_data(&mut self, index: u8, data: &[u8]) -> Result<(), Error> {
        self.dc(false)?;
        self.cs(false)?;
        self.write(index)?;
        self.cs(true)?;
        self.dc(true)?;
        self.cs(false)?;
        self.bus.write_all(data).map_err(|_| Error::Bus)?;
        self.cs(true)
    }

    /// Drive DC low without a transfer, as the J controller expects after
    /// its soft reset.
    pub(crate) fn command_mode(&mut self) -> Result<(), Error> {
        self.dc(false)
    }

    /// Release CS after a command.
    pub(crate) fn deselect(&mut self) -> Result<(), Error> {
        self.cs(true)
    }

    /// Block until the busy line reads `ready`.
    pub(crate) fn wait_busy(&mut self, ready: ReadyLevel) -> Result<(), Error> {
        for _ in 0..self.timeout.max_polls.max(1) {
            if ready.is_ready(self.busy_is_high()?) {
                return Ok(());
            }
            self.delay.delay_ms(self.timeout.poll_ms);
        }
        error!("busy timeout after {} polls", self.timeout.max_polls);
        Err(Error::PanelNotResponding)
    }

    // -----------------------------------------------------------------------
    // OTP access
    // -----------------------------------------------------------------------

    /// Switch to 3-wire mode, reset and send the OTP read command.
    pub(crate) fn enter_otp(&mut self, command: u8) -> Result<(), Error> {
        self.bus_end()?;
        self.bus_begin_three_wire()?;
        self.reset()?;
        self.dc(false)?;
        self.cs(false)?;
        self.write(command)?;
        self.cs(true)?;
        self.delay.delay_ms(10);
        self.dc(true)
    }

    /// One OTP byte in its own CS frame.
    pub(crate) fn read_otp_byte(&mut self) -> Result<u8, Error> {
        self.cs(false)?;
        let byte = self.bus.read().map_err(|_| Error::Bus)?;
        self.cs(true)?;
        Ok(byte)
    }
}
