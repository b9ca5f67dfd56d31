//! Driver errors
//!
//! Two tiers. Fatal configuration errors mean the driver was pointed at the
//! wrong hardware or wired wrongly: retrying cannot help and the caller
//! should stop using the panel. Everything else is a transient transport or
//! timing failure.

use eink_specs::ScreenModel;
use platform::PinRole;

/// Errors returned by the panel driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The model is outside the supported small family.
    UnsupportedModel(ScreenModel),
    /// A pin the model requires is not wired.
    MissingPin(PinRole),
    /// The OTP bank signature recheck did not read `0xA5`.
    OtpBankMismatch {
        /// Bank selected by the first signature byte.
        bank: u8,
        /// Byte read at the recheck offset.
        found: u8,
    },
    /// Busy line state after reset does not match the model's controller.
    WrongPanel(ScreenModel),
    /// Caller-provided frame buffer cannot hold both pages.
    BufferTooSmall {
        /// Bytes the model needs.
        required: usize,
        /// Bytes provided.
        provided: usize,
    },
    /// `begin()` has not succeeded yet.
    NotStarted,
    /// Busy line did not reach its ready level within the timeout.
    PanelNotResponding,
    /// Transport error.
    Bus,
    /// GPIO error.
    Gpio,
}

impl Error {
    /// Whether the error is an unrecoverable configuration error.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel(_)
                | Self::MissingPin(_)
                | Self::OtpBankMismatch { .. }
                | Self::WrongPanel(_)
                | Self::BufferTooSmall { .. }
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedModel(model) => write!(f, "Screen {model} is not supported"),
            Self::MissingPin(role) => write!(f, "Required pin {} is not defined", role.name()),
            Self::OtpBankMismatch { bank, found } => write!(
                f,
                "OTP bank {bank} check failed: read {found:#04x}, expected 0xa5"
            ),
            Self::WrongPanel(model) => write!(f, "Panel does not answer as {model}"),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Frame buffer too small: {required} bytes required, {provided} provided"
            ),
            Self::NotStarted => write!(f, "Screen not started"),
            Self::PanelNotResponding => write!(f, "Panel busy timeout"),
            Self::Bus => write!(f, "Panel bus error"),
            Self::Gpio => write!(f, "GPIO error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
