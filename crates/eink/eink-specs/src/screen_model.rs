//! Screen model identifiers
//!
//! A Pervasive Displays part number such as `E2266KS0C1` encodes three things
//! the driver branches on:
//!
//! - the diagonal size code (`266` for 2.66")
//! - the film (`K`: wide temperature + fast update, `P`: fast update)
//! - the driver/controller code (`C`)
//!
//! [`ScreenModel`] carries exactly those, plus the touch flag used by the
//! 2.71" touch variants. It is immutable once constructed.

use core::fmt::{self, Write as _};

use crate::profile::{profile_for, PanelProfile};

/// Diagonal size codes that use split-half frame-buffer addressing and a
/// second chip-select line.
pub const SPLIT_SIZES: [u16; 2] = [969, 1198];

/// Film technology of the panel.
///
/// The film decides whether fast update exists at all and which temperature
/// band it is valid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Film {
    /// Monochrome, global update only.
    C,
    /// Monochrome with embedded fast update.
    P,
    /// Wide temperature range with embedded fast update.
    K,
    /// Black-white-red.
    J,
    /// Black-white-red-yellow.
    Q,
}

impl Film {
    /// Part-number letter.
    pub const fn letter(self) -> char {
        match self {
            Film::C => 'C',
            Film::P => 'P',
            Film::K => 'K',
            Film::J => 'J',
            Film::Q => 'Q',
        }
    }

    /// Whether the film supports the fast update waveform.
    pub const fn has_fast_update(self) -> bool {
        matches!(self, Film::P | Film::K)
    }
}

/// Screen model: diagonal size, film, driver code and touch flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenModel {
    size: u16,
    film: Film,
    driver: char,
    touch: bool,
}

impl ScreenModel {
    /// Build a model from its part-number fields.
    ///
    /// `size` is the diagonal in hundredths of an inch (`266` for 2.66"),
    /// `driver` the trailing controller letter (`'C'` in `KS-0C`).
    pub const fn new(size: u16, film: Film, driver: char) -> Self {
        Self {
            size,
            film,
            driver,
            touch: false,
        }
    }

    /// Same model with the touch layer fitted.
    pub const fn with_touch(self) -> Self {
        Self {
            touch: true,
            ..self
        }
    }

    /// Diagonal size code.
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Film.
    pub const fn film(&self) -> Film {
        self.film
    }

    /// Driver/controller letter.
    pub const fn driver(&self) -> char {
        self.driver
    }

    /// Whether the touch layer is fitted.
    pub const fn is_touch(&self) -> bool {
        self.touch
    }

    /// Sizes 9.69" and 11.98" drive two controllers and need `panelCSS`.
    pub const fn needs_secondary_cs(&self) -> bool {
        self.size == SPLIT_SIZES[0] || self.size == SPLIT_SIZES[1]
    }

    /// Per-model parameters, `None` when the model is outside the small family.
    pub const fn profile(&self) -> Option<&'static PanelProfile> {
        profile_for(*self)
    }

    /// Descriptive report combining the diagonal and the film suffix,
    /// e.g. `iTC 2.66" -Wide`.
    pub fn who_am_i(&self) -> heapless::String<32> {
        let mut text = heapless::String::new();
        let suffix = match self.film {
            Film::P => " -Fast",
            Film::K => " -Wide",
            _ => "",
        };
        // Longest form is `iTC 11.98" -Wide -Touch` (23 bytes); the write
        // cannot overflow the 32-byte buffer.
        let _ = write!(
            text,
            "iTC {}.{:02}\"{}",
            self.size / 100,
            self.size % 100,
            suffix
        );
        if self.touch {
            let _ = text.push_str(" -Touch");
        }
        text
    }

    /// Bytes of frame-buffer storage the driver needs for this model
    /// (two colour pages).
    pub const fn frame_buffer_len(&self) -> Option<usize> {
        match self.profile() {
            Some(profile) => Some(profile.frame_buffer_len()),
            None => None,
        }
    }
}

impl fmt::Display for ScreenModel {
    /// Short part-number form, e.g. `266-KS-0C`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}S-0{}", self.size, self.film.letter(), self.driver)?;
        if self.touch {
            f.write_str("-Touch")?;
        }
        Ok(())
    }
}
