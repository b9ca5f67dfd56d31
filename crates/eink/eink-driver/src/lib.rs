//! Pervasive Displays EXT4 e-paper driver
//!
//! Drives the small-family panels with embedded fast update (films P and K)
//! through a [`PanelBus`](platform::PanelBus) and `embedded-hal` pins.
//!
//! # Layers
//!
//! ```text
//! ScreenEpdExt4      begin / flush / suspend / resume, power state
//!   ├── FrameBuffer  two 1-bit pages, orientation, colours
//!   ├── otp          3-wire calibration read
//!   ├── sequencer    initialize → image → update → power off
//!   └── interface    command framing, reset, busy wait with timeout
//! ```
//!
//! Everything model-specific comes from the lookup table in `eink-specs`.
//!
//! # Example
//!
//! ```
//! use eink_driver::{Colour, ScreenEpdExt4};
//! use eink_specs::models::EPD_290_KS_0F;
//! use eink_specs::UpdateMode;
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use platform::mocks::MockBoard;
//!
//! let board = MockBoard::new();
//! let buffer = vec![0u8; EPD_290_KS_0F.frame_buffer_len().unwrap()];
//! let mut screen =
//!     ScreenEpdExt4::new(EPD_290_KS_0F, board.bus(), board.pins(), NoopDelay::new(), buffer);
//!
//! screen.begin().unwrap();
//! screen.clear(Colour::White);
//! screen.set_point(10, 20, Colour::Black);
//! assert_eq!(screen.flush().unwrap(), UpdateMode::Fast);
//! ```
//!
//! # Features
//!
//! - `std` (default): `std::error::Error` for [`Error`]
//! - `graphics` (default): `embedded_graphics::DrawTarget`
//! - `defmt`: defmt logging and `defmt::Format` derives
//! - `tracing`: tracing logging on the host

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // every error is an `Error` variant documented there
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod fmt;

mod error;
mod frame_buffer;
#[cfg(feature = "graphics")]
mod graphics;
mod interface;
mod otp;
mod screen;
mod sequencer;

pub use error::Error;
pub use frame_buffer::{Colour, FrameBuffer, Geometry, Orientation};
pub use interface::BusyTimeout;
pub use otp::Calibration;
pub use screen::ScreenEpdExt4;

pub use eink_specs::{ScreenModel, UpdateMode};
pub use platform::{PowerMode, PowerScope, PowerState};
