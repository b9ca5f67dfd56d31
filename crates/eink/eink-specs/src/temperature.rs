//! Temperature policy for update modes
//!
//! Fast update relies on waveforms characterised over a narrower band than
//! the global update. A requested mode is clamped against the band for the
//! panel's film before any command is issued:
//!
//! | Film | Fast      | Global     |
//! |------|-----------|------------|
//! | P    | 0..=50 °C | 0..=50 °C  |
//! | K    | 0..=50 °C | -15..=60 °C|
//!
//! Other films have no fast band and a 0..=50 °C global band.

use crate::screen_model::Film;

/// Default panel temperature used until the application reports one.
pub const DEFAULT_TEMPERATURE: i8 = 25;

/// Update mode for one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateMode {
    /// Nothing is sent; the temperature is outside every supported band.
    None,
    /// Full refresh with the temperature-compensated waveform.
    Global,
    /// Fast refresh using the OTP-derived PSR.
    Fast,
}

impl UpdateMode {
    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            UpdateMode::None => "UPDATE_NONE",
            UpdateMode::Global => "UPDATE_GLOBAL",
            UpdateMode::Fast => "UPDATE_FAST",
        }
    }
}

/// Inclusive temperature band in °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureRange {
    /// Lowest supported temperature.
    pub min: i8,
    /// Highest supported temperature.
    pub max: i8,
}

impl TemperatureRange {
    /// Whether `celsius` lies inside the band.
    pub const fn contains(&self, celsius: i8) -> bool {
        celsius >= self.min && celsius <= self.max
    }
}

const STANDARD: TemperatureRange = TemperatureRange { min: 0, max: 50 };
const WIDE: TemperatureRange = TemperatureRange { min: -15, max: 60 };

/// Band in which fast update is valid, `None` for films without it.
pub const fn fast_range(film: Film) -> Option<TemperatureRange> {
    if film.has_fast_update() {
        Some(STANDARD)
    } else {
        None
    }
}

/// Band in which global update is valid.
pub const fn global_range(film: Film) -> TemperatureRange {
    match film {
        Film::K => WIDE,
        _ => STANDARD,
    }
}

/// Clamp `requested` to what the film supports at `celsius`.
///
/// Fast falls back to global outside the fast band, global falls back to
/// [`UpdateMode::None`] outside the global band.
pub const fn check_temperature_mode(film: Film, celsius: i8, requested: UpdateMode) -> UpdateMode {
    let mut mode = requested;

    if let UpdateMode::Fast = mode {
        let fast_ok = match fast_range(film) {
            Some(range) => range.contains(celsius),
            None => false,
        };
        if !fast_ok {
            mode = UpdateMode::Global;
        }
    }

    if let UpdateMode::Global = mode {
        if !global_range(film).contains(celsius) {
            mode = UpdateMode::None;
        }
    }

    mode
}
