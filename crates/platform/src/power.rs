//! Panel power state
//!
//! The panel moves through four states, encoded as bit flags so a partial
//! power-up can be tested with a mask:
//!
//! ```text
//!        resume            OTP + SPI
//! OFF ──────────▶ GPIO ─────────────▶ ON
//!  ▲                                  │
//!  └──── SLEEP ◀────── suspend ───────┘
//!          │   resume
//!          └──────────▶ GPIO ...
//! ```
//!
//! `GPIO` means the panel is powered and its control lines are driven; `ON`
//! additionally has the 4-wire SPI bus running.

/// Power state of one panel, as bit flags. Defaults to [`PowerState::OFF`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerState(u8);

impl PowerState {
    /// Panel powered, control pins driven.
    pub const GPIO_MASK: u8 = 0x01;
    /// 4-wire SPI running.
    pub const SPI_MASK: u8 = 0x02;
    /// Power removed after a suspend; SPI released.
    pub const SLEEP_MASK: u8 = 0x10;

    /// Never powered since `begin()`.
    pub const OFF: Self = Self(0x00);
    /// Powered and reset, SPI not started.
    pub const GPIO: Self = Self(Self::GPIO_MASK);
    /// Ready for commands.
    pub const ON: Self = Self(Self::GPIO_MASK | Self::SPI_MASK);
    /// Suspended by `suspend()`.
    pub const SLEEP: Self = Self(Self::SLEEP_MASK);

    /// Raw flags.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `mask` is set.
    pub const fn contains(self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self.0 {
            0x00 => "OFF",
            0x01 => "GPIO",
            0x03 => "ON",
            0x10 => "SLEEP",
            _ => "MIXED",
        }
    }
}

/// What `suspend()` is allowed to switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerScope {
    /// Leave everything powered.
    None,
    /// Release SPI and cut panel power through the power pin.
    #[default]
    GpioOnly,
}

impl PowerScope {
    /// Whether the scope covers the GPIO/power stage.
    pub const fn includes_gpio(self) -> bool {
        matches!(self, PowerScope::GpioOnly)
    }
}

/// When the driver suspends on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Only when the application calls `suspend()`.
    #[default]
    Manual,
    /// After every flush.
    Auto,
}

/// Power mode and scope, as set by `set_power_profile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerProfile {
    /// When to suspend.
    pub mode: PowerMode,
    /// What a suspend switches off.
    pub scope: PowerScope,
}
