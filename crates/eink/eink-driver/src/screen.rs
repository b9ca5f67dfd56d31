//! EXT4 panel driver
//!
//! [`ScreenEpdExt4`] owns one panel: its bus and pins, the caller-provided
//! frame buffer, the cached OTP calibration and the power state.
//!
//! ```text
//! begin ──▶ resume ──▶ ON ──flush──▶ ON ──suspend──▶ SLEEP
//!                      ▲                               │
//!                      └──────────── resume ◀──────────┘
//! ```
//!
//! `flush` resumes on its own when needed. The calibration read during the
//! first resume survives suspend and is only dropped by `begin`.
//!
//! A fatal error sticks: every later `resume`/`flush` returns it without
//! touching the hardware until `begin` is called again.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use eink_specs::{
    check_temperature_mode, PanelProfile, ReadyLevel, ScreenModel, UpdateMode,
    DEFAULT_TEMPERATURE,
};
use platform::{
    PanelBus, PanelPins, PinRole, PowerMode, PowerProfile, PowerScope, PowerState, SpiConfig,
};

use crate::error::Error;
use crate::frame_buffer::{Colour, FrameBuffer, Geometry, Orientation};
use crate::interface::{BusyTimeout, PanelInterface};
use crate::otp::{self, Calibration};
use crate::sequencer;

/// Pause between the two flushes of [`ScreenEpdExt4::regenerate`].
const REGENERATE_PAUSE_MS: u32 = 100;

/// Driver for one Pervasive Displays small-family panel.
///
/// Generic over:
/// - `BUS` - a [`PanelBus`] (4-wire SPI plus 3-wire OTP mode).
/// - `DC`, `CS`, `RST`, `PWR` - [`OutputPin`]s.
/// - `BUSY` - [`InputPin`].
/// - `DELAY` - blocking [`DelayNs`].
/// - `B` - frame-buffer storage of at least
///   [`ScreenModel::frame_buffer_len`] bytes.
///
/// In host tests supply `platform::mocks` and
/// `embedded_hal_mock::eh1::delay::NoopDelay`.
pub struct ScreenEpdExt4<BUS, DC, CS, BUSY, RST, PWR, DELAY, B> {
    model: ScreenModel,
    interface: PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    frame: FrameBuffer<B>,
    profile: Option<&'static PanelProfile>,
    calibration: Option<Calibration>,
    failure: Option<Error>,
    state: PowerState,
    power_profile: PowerProfile,
    temperature: i8,
}

impl<BUS, DC, CS, BUSY, RST, PWR, DELAY, B> ScreenEpdExt4<BUS, DC, CS, BUSY, RST, PWR, DELAY, B>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    /// Bind a model to its hardware. Nothing is touched until
    /// [`begin`](Self::begin).
    pub fn new(
        model: ScreenModel,
        bus: BUS,
        pins: PanelPins<DC, CS, BUSY, RST, PWR>,
        delay: DELAY,
        buffer: B,
    ) -> Self {
        Self {
            model,
            interface: PanelInterface::new(bus, pins, delay),
            frame: FrameBuffer::new(buffer),
            profile: None,
            calibration: None,
            failure: None,
            state: PowerState::OFF,
            power_profile: PowerProfile::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the busy-wait timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: BusyTimeout) -> Self {
        self.interface.set_timeout(timeout);
        self
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Check the configuration, prepare the frame buffer and power the
    /// panel up.
    ///
    /// Configuration problems are returned as fatal errors (see
    /// [`Error::is_fatal`]).
    pub fn begin(&mut self) -> Result<(), Error> {
        self.failure = None;
        self.profile = None;
        let profile = self.validate().map_err(|e| {
            error!("begin failed: {}", e);
            self.latch(e)
        })?;

        self.frame
            .configure(Geometry::from_profile(profile))
            .map_err(|e| self.latch(e))?;
        self.profile = Some(profile);
        self.calibration = None;
        self.state = PowerState::OFF;
        self.power_profile = PowerProfile::default();
        self.temperature = DEFAULT_TEMPERATURE;
        info!(
            "screen {} {}x{} at {} Hz",
            self.model,
            profile.rows,
            profile.columns,
            profile.spi_hz
        );

        self.resume()?;
        self.frame.set_orientation(Orientation::Rotate0);
        self.frame.set_invert(false);
        Ok(())
    }

    fn validate(&self) -> Result<&'static PanelProfile, Error> {
        if !self.interface.has_power_pin() {
            return Err(Error::MissingPin(PinRole::PanelPower));
        }
        if !self.model.film().has_fast_update() {
            return Err(Error::UnsupportedModel(self.model));
        }
        if self.model.needs_secondary_cs() && !self.interface.has_secondary_cs() {
            return Err(Error::MissingPin(PinRole::PanelCss));
        }
        let profile = self
            .model
            .profile()
            .ok_or(Error::UnsupportedModel(self.model))?;
        let required = profile.frame_buffer_len();
        let provided = self.frame.as_bytes().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        Ok(profile)
    }

    fn started_profile(&self) -> Result<&'static PanelProfile, Error> {
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        self.profile.ok_or(Error::NotStarted)
    }

    /// Keep a fatal error until the next `begin`.
    fn latch(&mut self, error: Error) -> Error {
        if error.is_fatal() {
            self.failure = Some(error);
        }
        error
    }

    /// Reset, then check the busy line matches the controller.
    fn reset(&mut self, profile: &PanelProfile) -> Result<(), Error> {
        self.interface.reset()?;
        // The J controller idles low; high here means another panel.
        if profile.ready == ReadyLevel::Low && self.interface.busy_is_high()? {
            error!("busy high after reset, not a {}", self.model);
            return Err(Error::WrongPanel(self.model));
        }
        Ok(())
    }

    /// Power the panel up and start SPI. No-op when already on.
    ///
    /// Reads OTP the first time after `begin`. Returns the fatal error of a
    /// failed `begin` without touching the hardware.
    pub fn resume(&mut self) -> Result<(), Error> {
        let profile = self.started_profile()?;
        if self.state == PowerState::ON {
            return Ok(());
        }
        self.power_up(profile).map_err(|e| self.latch(e))
    }

    fn power_up(&mut self, profile: &'static PanelProfile) -> Result<(), Error> {
        if !self.state.contains(PowerState::GPIO_MASK) {
            self.interface.power(true)?;
            self.reset(profile)?;
            self.state = PowerState::GPIO;
            debug!("power {}", self.state.name());
        }

        if self.calibration.is_none() {
            let calibration = otp::read_otp(&mut self.interface, self.model, profile)?;
            self.calibration = Some(calibration);
            self.reset(profile)?;
        }

        self.interface.bus_begin(SpiConfig::panel(profile.spi_hz))?;
        self.interface.wire_begin()?;
        self.state = PowerState::ON;
        debug!("power {}", self.state.name());
        Ok(())
    }

    /// Release SPI and cut panel power.
    ///
    /// Does nothing unless `scope` covers GPIO, a power pin is wired and the
    /// panel is powered.
    pub fn suspend(&mut self, scope: PowerScope) -> Result<(), Error> {
        if !scope.includes_gpio()
            || !self.interface.has_power_pin()
            || !self.state.contains(PowerState::GPIO_MASK)
        {
            return Ok(());
        }
        self.interface.bus_end()?;
        self.interface.power(false)?;
        self.state = PowerState::SLEEP;
        debug!("power {}", self.state.name());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Fast update, downgraded by temperature when needed.
    pub fn flush(&mut self) -> Result<UpdateMode, Error> {
        self.flush_mode(UpdateMode::Fast)
    }

    /// Send the frame buffer and refresh the panel.
    ///
    /// `mode` is first clamped to what the film supports at the current
    /// temperature; the mode actually used is returned. With
    /// [`UpdateMode::None`] nothing is sent.
    pub fn flush_mode(&mut self, mode: UpdateMode) -> Result<UpdateMode, Error> {
        let profile = self.started_profile()?;
        let resolved = check_temperature_mode(self.model.film(), self.temperature, mode);
        debug!("flush {} as {}", mode.name(), resolved.name());

        if resolved == UpdateMode::None {
            warn!("UPDATE_NONE invoked");
            return Ok(resolved);
        }

        self.resume()?;
        let calibration = self.calibration.unwrap_or(Calibration::EMBEDDED);
        sequencer::initial(
            &mut self.interface,
            profile,
            calibration,
            self.temperature,
            resolved,
        )?;
        let (next, previous) = self.frame.pages();
        sequencer::send_image(&mut self.interface, profile, next, previous)?;
        self.frame.commit();
        sequencer::update(&mut self.interface, profile)?;
        sequencer::power_off(&mut self.interface, profile)?;

        if self.power_profile.mode == PowerMode::Auto {
            self.suspend(self.power_profile.scope)?;
        }
        Ok(resolved)
    }

    /// Black then white full-screen flushes to clear ghosting.
    pub fn regenerate(&mut self, mode: UpdateMode) -> Result<(), Error> {
        self.clear(Colour::Black);
        self.flush_mode(mode)?;
        self.interface.delay_ms(REGENERATE_PAUSE_MS);
        self.clear(Colour::White);
        self.flush_mode(mode)?;
        self.interface.delay_ms(REGENERATE_PAUSE_MS);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Fill the screen.
    pub fn clear(&mut self, colour: Colour) {
        self.frame.clear(colour);
    }

    /// Draw one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_point(&mut self, x: u16, y: u16, colour: Colour) {
        self.frame.set_point(x, y, colour);
    }

    /// Read one pixel back, `None` when out of bounds.
    pub fn get_point(&self, x: u16, y: u16) -> Option<Colour> {
        self.frame.get_point(x, y)
    }

    /// Width in the current orientation.
    pub fn screen_size_x(&self) -> u16 {
        self.frame.size_x()
    }

    /// Height in the current orientation.
    pub fn screen_size_y(&self) -> u16 {
        self.frame.size_y()
    }

    // -----------------------------------------------------------------------
    // Settings and read-outs
    // -----------------------------------------------------------------------

    /// Panel temperature in °C used for the next update.
    pub fn set_temperature(&mut self, celsius: i8) {
        self.temperature = celsius;
    }

    /// Current panel temperature setting.
    pub fn temperature(&self) -> i8 {
        self.temperature
    }

    /// Rotation in quarter turns, taken modulo 4.
    pub fn set_orientation(&mut self, orientation: u8) {
        self.frame
            .set_orientation(Orientation::from_index(orientation));
    }

    /// Current rotation.
    pub fn orientation(&self) -> Orientation {
        self.frame.orientation()
    }

    /// Swap black and white.
    pub fn set_invert(&mut self, invert: bool) {
        self.frame.set_invert(invert);
    }

    /// When to suspend on its own, and what a suspend switches off.
    pub fn set_power_profile(&mut self, mode: PowerMode, scope: PowerScope) {
        self.power_profile = PowerProfile { mode, scope };
    }

    /// Current power profile.
    pub fn power_profile(&self) -> PowerProfile {
        self.power_profile
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        self.state
    }

    /// Calibration cached since the last `begin`.
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }

    /// Screen model.
    pub fn model(&self) -> ScreenModel {
        self.model
    }

    /// Descriptive report, e.g. `iTC 2.66" -Wide`.
    pub fn who_am_i(&self) -> heapless::String<32> {
        self.model.who_am_i()
    }

    /// Frame-buffer contents, next page first.
    pub fn frame_buffer(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Give the hardware and storage back.
    pub fn release(self) -> (BUS, PanelPins<DC, CS, BUSY, RST, PWR>, DELAY, B) {
        let (bus, pins, delay) = self.interface.release();
        (bus, pins, delay, self.frame.release())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use eink_specs::models::{EPD_150_KS_0J, EPD_290_KS_0F};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use platform::mocks::{MockBoard, MockBus, MockBusy, MockPin};

    type TestScreen =
        ScreenEpdExt4<MockBus, MockPin, MockPin, MockBusy, MockPin, MockPin, NoopDelay, Vec<u8>>;

    fn screen(board: &MockBoard, model: ScreenModel) -> TestScreen {
        let len = model.frame_buffer_len().unwrap_or(0);
        ScreenEpdExt4::new(model, board.bus(), board.pins(), NoopDelay::new(), vec![0xEE; len])
    }

    #[test]
    fn calls_before_begin_report_not_started() {
        let board = MockBoard::new();
        let mut screen = screen(&board, EPD_290_KS_0F);
        assert_eq!(screen.resume(), Err(Error::NotStarted));
        assert_eq!(screen.flush(), Err(Error::NotStarted));
        assert!(board.events().is_empty());
    }

    #[test]
    fn begin_without_otp_is_on_with_embedded_calibration() {
        let board = MockBoard::new();
        let mut screen = screen(&board, EPD_290_KS_0F);
        screen.begin().unwrap();
        assert_eq!(screen.power_state(), PowerState::ON);
        assert_eq!(screen.calibration(), Some(Calibration::EMBEDDED));
        assert!(screen.frame_buffer().iter().all(|b| *b == 0));
        assert_eq!(board.reads(), 0);
    }

    #[test]
    fn j_driver_with_busy_high_is_wrong_panel() {
        let board = MockBoard::new();
        // busy idles high: not a J controller
        let mut screen = screen(&board, EPD_150_KS_0J);
        let err = screen.begin().unwrap_err();
        assert_eq!(err, Error::WrongPanel(EPD_150_KS_0J));
        assert!(err.is_fatal());
    }

    #[test]
    fn release_returns_storage() {
        let board = MockBoard::new();
        let mut screen = screen(&board, EPD_290_KS_0F);
        screen.begin().unwrap();
        screen.clear(Colour::White);
        let (_, _, _, buffer) = screen.release();
        assert_eq!(buffer.len(), 384 * 21 * 2);
        assert!(buffer[..384 * 21].iter().all(|b| *b == 0xFF));
    }
}
