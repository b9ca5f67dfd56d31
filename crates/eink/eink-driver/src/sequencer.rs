//! Update command sequence
//!
//! One update runs four phases: initialize, send image, update, power off.
//! The phases are uniform; everything model-specific comes from the
//! [`PanelProfile`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use eink_specs::{InitLayout, PanelProfile, UpdateMode};
use platform::PanelBus;

use crate::error::Error;
use crate::interface::PanelInterface;
use crate::otp::Calibration;

// ---------------------------------------------------------------------------
// Command codes
// ---------------------------------------------------------------------------

/// Panel setting; PSR and soft reset on the PSR controllers.
const PANEL_SETTING: u8 = 0x00;
/// DC/DC power off.
const POWER_OFF: u8 = 0x02;
/// DC/DC power on.
const POWER_ON: u8 = 0x04;
/// Display refresh (PSR controllers), soft reset (J controller).
const REFRESH: u8 = 0x12;
/// Vcom and data interval.
const VCOM_INTERVAL: u8 = 0x50;
/// Active temperature.
const TEMPERATURE: u8 = 0xE5;
/// Temperature input select.
const TEMPERATURE_SELECT: u8 = 0xE0;

const J_SOFT_RESET: u8 = 0x12;
const J_TEMPERATURE: u8 = 0x1A;
const J_BORDER: u8 = 0x3C;
const J_UPDATE_CONTROL: u8 = 0x22;
const J_ACTIVATE: u8 = 0x20;

/// Soft reset value for [`PANEL_SETTING`].
const SOFT_RESET: u8 = 0x0E;
/// Temperature flag marking a fast update.
const FAST_TEMPERATURE: u8 = 0x40;
/// Vcom interval outside the image transfer.
const VCOM_IDLE: u8 = 0x07;
/// Vcom interval during the image transfer.
const VCOM_TRANSFER: u8 = 0x27;

/// Phase 1: soft reset, temperature and panel settings.
pub(crate) fn initial<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    profile: &PanelProfile,
    calibration: Calibration,
    temperature: i8,
    mode: UpdateMode,
) -> Result<(), Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    // Two's complement, as the controller expects.
    let [temperature] = temperature.to_ne_bytes();
    let fast = mode == UpdateMode::Fast;

    if profile.init == InitLayout::Embedded {
        interface.send_command8(J_SOFT_RESET)?;
        interface.command_mode()?;
        interface.wait_busy(profile.ready)?;
        interface.send_command_data8(J_TEMPERATURE, temperature)?;
        if fast {
            interface.send_command_data8(J_BORDER, 0xC0)?;
            interface.send_command_data8(J_UPDATE_CONTROL, 0xDF)?;
        } else {
            interface.send_command_data8(J_UPDATE_CONTROL, 0xD7)?;
        }
        return Ok(());
    }

    let (temperature, psr) = if fast {
        (temperature | FAST_TEMPERATURE, calibration.fast_psr())
    } else {
        (temperature, calibration.psr())
    };

    interface.send_command_data8(PANEL_SETTING, SOFT_RESET)?;
    interface.wait_busy(profile.ready)?;
    interface.send_command_data8(TEMPERATURE, temperature)?;
    interface.send_command_data8(TEMPERATURE_SELECT, 0x02)?;
    if profile.init == InitLayout::FixedPairs {
        interface.send_command_data8(0x4D, 0x55)?;
        interface.send_command_data8(0xE9, 0x02)?;
    } else {
        interface.send_index_data(PANEL_SETTING, &psr)?;
    }
    if fast {
        interface.send_command_data8(VCOM_INTERVAL, VCOM_IDLE)?;
    }
    Ok(())
}

/// Phase 2: previous page, then next page.
pub(crate) fn send_image<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    profile: &PanelProfile,
    next: &[u8],
    previous: &[u8],
) -> Result<(), Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    if profile.vcom_toggle {
        interface.send_command_data8(VCOM_INTERVAL, VCOM_TRANSFER)?;
    }
    interface.send_index_data(profile.image.previous, previous)?;
    interface.send_index_data(profile.image.next, next)?;
    if profile.vcom_toggle {
        interface.send_command_data8(VCOM_INTERVAL, VCOM_IDLE)?;
    }
    Ok(())
}

/// Phase 3: refresh and wait for it to finish.
pub(crate) fn update<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    profile: &PanelProfile,
) -> Result<(), Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    interface.wait_busy(profile.ready)?;
    if profile.init == InitLayout::Embedded {
        interface.send_command8(J_ACTIVATE)?;
        interface.deselect()?;
    } else {
        interface.send_command8(POWER_ON)?;
        interface.wait_busy(profile.ready)?;
        interface.send_command8(REFRESH)?;
    }
    interface.wait_busy(profile.ready)
}

/// Phase 4: DC/DC off, unless the controller does it on its own.
pub(crate) fn power_off<BUS, DC, CS, BUSY, RST, PWR, DELAY>(
    interface: &mut PanelInterface<BUS, DC, CS, BUSY, RST, PWR, DELAY>,
    profile: &PanelProfile,
) -> Result<(), Error>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
{
    if profile.auto_power_off {
        return Ok(());
    }
    interface.send_command8(POWER_OFF)?;
    interface.wait_busy(profile.ready)
}
