//! Per-model protocol parameters
//!
//! Every phase of the update protocol branches on the screen model: busy pin
//! polarity, where the PSR bytes sit in OTP, which command pair carries the
//! image, whether the vcom interval register is toggled around the transfer,
//! and how fast SPI may run. Those branches are captured here as data, one
//! [`PanelProfile`] per supported model, and looked up with [`profile_for`].
//! The sequencer itself stays uniform.

use crate::screen_model::{Film, ScreenModel};

/// Conservative SPI clock used for most panels.
pub const SPI_HZ_DEFAULT: u32 = 8_000_000;

/// SPI clock validated on the 1.50"/1.52", 2.06" and 2.90" panels.
pub const SPI_HZ_FAST: u32 = 16_000_000;

/// Level the busy line settles on once the controller is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadyLevel {
    /// Idle when low (1.50"/1.52" J driver).
    Low,
    /// Idle when high (all other drivers).
    High,
}

impl ReadyLevel {
    /// `true` when a sampled pin level means the controller is idle.
    pub const fn is_ready(self, pin_high: bool) -> bool {
        match self {
            ReadyLevel::Low => !pin_high,
            ReadyLevel::High => pin_high,
        }
    }
}

/// Where the two PSR bytes live in OTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OtpLayout {
    /// Configuration is embedded in the controller; nothing to read.
    Embedded,
    /// Single PSR offset; the bank-1 signature is not rechecked.
    Fixed {
        /// Address of the first PSR byte.
        psr: u16,
        /// PSR pair returned when the signature selects bank 1, without
        /// reading further.
        bank1_override: Option<[u8; 2]>,
    },
    /// Two banks, each with its own signature and PSR offsets.
    Banked {
        /// Bank selected by a `0xA5` signature.
        bank0: OtpBank,
        /// Bank selected by any other signature.
        bank1: OtpBank,
    },
}

/// Offsets inside one OTP bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OtpBank {
    /// Address of the signature recheck byte, `0` for none.
    pub signature: u16,
    /// Address of the first PSR byte.
    pub psr: u16,
}

impl OtpLayout {
    /// Offsets for the bank selected by the signature byte.
    ///
    /// `None` for [`OtpLayout::Embedded`].
    pub const fn bank(&self, bank: u8) -> Option<OtpBank> {
        match *self {
            OtpLayout::Embedded => None,
            OtpLayout::Fixed { psr, .. } => Some(OtpBank { signature: 0, psr }),
            OtpLayout::Banked { bank0, bank1 } => {
                if bank == 0 {
                    Some(bank0)
                } else {
                    Some(bank1)
                }
            }
        }
    }
}

/// Shape of the initialize phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitLayout {
    /// J driver: soft reset `0x12`, temperature `0x1A`, update control `0x22`.
    Embedded,
    /// Soft reset `0x00`, temperature `0xE5`/`0xE0`, then the OTP PSR pair.
    Psr,
    /// As [`InitLayout::Psr`] but with two fixed pairs in place of the PSR.
    FixedPairs,
}

/// Command indices for the image transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageCommands {
    /// Receives the previous plane, sent first.
    pub previous: u8,
    /// Receives the next plane, sent second.
    pub next: u8,
}

/// Everything the sequencer needs to know about one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelProfile {
    /// Long side in pixels (frame-buffer rows).
    pub rows: u16,
    /// Short side in pixels (frame-buffer row length in bits).
    pub columns: u16,
    /// Busy line idle level.
    pub ready: ReadyLevel,
    /// OTP layout.
    pub otp: OtpLayout,
    /// Initialize phase shape.
    pub init: InitLayout,
    /// Image transfer commands.
    pub image: ImageCommands,
    /// Toggle register `0x50` to `0x27` before and `0x07` after the transfer.
    pub vcom_toggle: bool,
    /// The controller powers its DC/DC down on its own.
    pub auto_power_off: bool,
    /// SPI clock in Hz.
    pub spi_hz: u32,
}

impl PanelProfile {
    /// Bytes per frame-buffer row.
    pub const fn stride(&self) -> usize {
        (self.columns / 8) as usize
    }

    /// Bytes in one colour page.
    #[allow(clippy::arithmetic_side_effects)] // largest panel: 384 × 21 = 8 064
    pub const fn page_len(&self) -> usize {
        self.rows as usize * self.stride()
    }

    /// Bytes for both pages (next + previous).
    #[allow(clippy::arithmetic_side_effects)] // 2 × 8 064 at most
    pub const fn frame_buffer_len(&self) -> usize {
        self.page_len() * 2
    }

    /// Whether OTP has to be read before the first update.
    pub const fn has_otp(&self) -> bool {
        !matches!(self.otp, OtpLayout::Embedded)
    }
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

const IMAGE_J: ImageCommands = ImageCommands {
    previous: 0x24,
    next: 0x26,
};

const IMAGE_DTM: ImageCommands = ImageCommands {
    previous: 0x10,
    next: 0x13,
};

const OTP_09: OtpLayout = OtpLayout::Fixed {
    psr: 0x004B,
    bank1_override: None,
};

const OTP_09_KS: OtpLayout = OtpLayout::Fixed {
    psr: 0x004B,
    bank1_override: Some([0xCF, 0x82]),
};

const OTP_0C: OtpLayout = OtpLayout::Banked {
    bank0: OtpBank {
        signature: 0x0000,
        psr: 0x0FB4,
    },
    bank1: OtpBank {
        signature: 0x1000,
        psr: 0x1FB4,
    },
};

const OTP_0E: OtpLayout = OtpLayout::Banked {
    bank0: OtpBank {
        signature: 0x0000,
        psr: 0x0B1B,
    },
    bank1: OtpBank {
        signature: 0x0C00,
        psr: 0x171B,
    },
};

const fn j_driver(rows: u16, columns: u16) -> PanelProfile {
    PanelProfile {
        rows,
        columns,
        ready: ReadyLevel::Low,
        otp: OtpLayout::Embedded,
        init: InitLayout::Embedded,
        image: IMAGE_J,
        vcom_toggle: false,
        auto_power_off: true,
        spi_hz: SPI_HZ_FAST,
    }
}

const fn psr_driver(rows: u16, columns: u16, otp: OtpLayout, vcom_toggle: bool) -> PanelProfile {
    PanelProfile {
        rows,
        columns,
        ready: ReadyLevel::High,
        otp,
        init: InitLayout::Psr,
        image: IMAGE_DTM,
        vcom_toggle,
        auto_power_off: false,
        spi_hz: SPI_HZ_DEFAULT,
    }
}

const fn with_spi(profile: PanelProfile, spi_hz: u32) -> PanelProfile {
    PanelProfile { spi_hz, ..profile }
}

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

const EPD_150_152: PanelProfile = j_driver(200, 200);
const EPD_154_0C: PanelProfile = psr_driver(152, 152, OTP_0C, true);
const EPD_206_0E: PanelProfile = with_spi(psr_driver(248, 128, OTP_0E, true), SPI_HZ_FAST);
const EPD_213_0E: PanelProfile = psr_driver(212, 104, OTP_0E, true);
const EPD_266_0C: PanelProfile = psr_driver(296, 152, OTP_0C, true);
const EPD_271_09: PanelProfile = psr_driver(264, 176, OTP_09, false);
const EPD_271_KS_09: PanelProfile = psr_driver(264, 176, OTP_09_KS, false);
const EPD_271_0C: PanelProfile = psr_driver(264, 176, OTP_0C, true);
const EPD_287_09: PanelProfile = psr_driver(296, 128, OTP_09, false);
const EPD_290_0F: PanelProfile = PanelProfile {
    otp: OtpLayout::Embedded,
    init: InitLayout::FixedPairs,
    ..with_spi(psr_driver(384, 168, OTP_09, false), SPI_HZ_FAST)
};

/// Parameters for a supported small-family model.
///
/// Returns `None` for any model outside the table: unknown size, a film
/// without fast update, or a driver code this family does not use.
pub const fn profile_for(model: ScreenModel) -> Option<&'static PanelProfile> {
    let profile = match (model.size(), model.film(), model.driver()) {
        (150 | 152, Film::K, 'J') => &EPD_150_152,
        (154, Film::P | Film::K, 'C') => &EPD_154_0C,
        (206, Film::K, 'E') => &EPD_206_0E,
        (213, Film::P | Film::K, 'E') => &EPD_213_0E,
        (266, Film::P | Film::K, 'C') => &EPD_266_0C,
        (271, Film::P, '9') => &EPD_271_09,
        (271, Film::K, '9') => &EPD_271_KS_09,
        (271, Film::K, 'C') => &EPD_271_0C,
        (287, Film::P, '9') => &EPD_287_09,
        (290, Film::K, 'F') => &EPD_290_0F,
        _ => return None,
    };
    // Only the 2.71" 09 panels come with a touch layer.
    if model.is_touch() && !(model.size() == 271 && model.driver() == '9') {
        return None;
    }
    Some(profile)
}
