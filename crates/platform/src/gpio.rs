//! Panel pin wiring
//!
//! The panel driver takes its GPIO as `embedded-hal` pins grouped in
//! [`PanelPins`]. Power and the secondary chip-select are optional because
//! not every board wires them; the driver decides at `begin()` whether the
//! selected screen can live without them.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Role of a panel pin, used in configuration errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Panel power switch (`panelPower`).
    PanelPower,
    /// Primary chip-select (`panelCS`).
    PanelCs,
    /// Secondary chip-select for two-controller panels (`panelCSS`).
    PanelCss,
    /// Data/command select (`panelDC`).
    PanelDc,
    /// Controller reset (`panelReset`).
    PanelReset,
    /// Controller busy output (`panelBusy`).
    PanelBusy,
}

impl PinRole {
    /// Board-schematic name of the pin.
    pub const fn name(self) -> &'static str {
        match self {
            PinRole::PanelPower => "panelPower",
            PinRole::PanelCs => "panelCS",
            PinRole::PanelCss => "panelCSS",
            PinRole::PanelDc => "panelDC",
            PinRole::PanelReset => "panelReset",
            PinRole::PanelBusy => "panelBusy",
        }
    }
}

/// Pins connecting the host to one panel.
pub struct PanelPins<DC, CS, BUSY, RST, PWR> {
    /// Data/command select, low for command bytes.
    pub dc: DC,
    /// Chip-select, active low.
    pub cs: CS,
    /// Busy output from the controller.
    pub busy: BUSY,
    /// Reset, active low.
    pub reset: RST,
    /// Panel power switch, active high.
    pub power: Option<PWR>,
    /// Second chip-select for two-controller panels.
    pub cs_secondary: Option<CS>,
}

impl<DC, CS, BUSY, RST, PWR> PanelPins<DC, CS, BUSY, RST, PWR> {
    /// Pins for a single-controller panel with switched power.
    pub fn new(dc: DC, cs: CS, busy: BUSY, reset: RST, power: PWR) -> Self {
        Self {
            dc,
            cs,
            busy,
            reset,
            power: Some(power),
            cs_secondary: None,
        }
    }

    /// Same wiring with the second chip-select fitted.
    #[must_use]
    pub fn with_secondary_cs(mut self, cs_secondary: CS) -> Self {
        self.cs_secondary = Some(cs_secondary);
        self
    }
}

impl<DC, CS, BUSY, RST> PanelPins<DC, CS, BUSY, RST, NoPin> {
    /// Pins for a board whose panel power is not switchable.
    pub fn without_power(dc: DC, cs: CS, busy: BUSY, reset: RST) -> Self {
        Self {
            dc,
            cs,
            busy,
            reset,
            power: None,
            cs_secondary: None,
        }
    }
}

/// Placeholder for a pin the board does not wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    #[test]
    fn without_power_leaves_optional_pins_empty() {
        let pins = PanelPins::without_power(NoPin, NoPin, NoPin, NoPin);
        assert!(pins.power.is_none());
        assert!(pins.cs_secondary.is_none());
    }

    #[test]
    fn secondary_cs_is_fitted_on_request() {
        let idle = || PinMock::new(&[]);
        let mut pins =
            PanelPins::new(idle(), idle(), idle(), idle(), idle()).with_secondary_cs(idle());
        assert!(pins.power.is_some());
        assert!(pins.cs_secondary.is_some());

        pins.dc.done();
        pins.cs.done();
        pins.busy.done();
        pins.reset.done();
        if let Some(power) = pins.power.as_mut() {
            power.done();
        }
        if let Some(css) = pins.cs_secondary.as_mut() {
            css.done();
        }
    }

    #[test]
    fn role_names_match_schematic() {
        assert_eq!(PinRole::PanelPower.name(), "panelPower");
        assert_eq!(PinRole::PanelCss.name(), "panelCSS");
    }
}
