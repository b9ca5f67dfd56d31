//! Board seam for e-paper panels
//!
//! This crate provides the trait and types a panel driver needs from the
//! board, so the driver can be developed and tested without hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (flush, set_point, ...)
//!         ↓
//! Panel driver (eink-driver)
//!         ↓
//! Board seam (this crate - PanelBus, PanelPins, PowerState)
//!         ↓
//! HAL (embedded-hal SPI + GPIO, or the mocks below)
//! ```
//!
//! # Modules
//!
//! - [`peripheral`] - [`PanelBus`]: 4-wire SPI, 3-wire OTP mode, I2C begin
//! - [`gpio`] - [`PanelPins`] wiring and [`NoPin`]
//! - [`power`] - [`PowerState`] flags and the suspend profile
//! - [`mocks`] - recording bus and pins for host tests (`std` feature)
//!
//! # Features
//!
//! - `std` (default): standard library support and [`mocks`]
//! - `defmt`: `defmt::Format` derives on every public type

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this HAL crate:
#![allow(clippy::doc_markdown)] // pin names like panelCSS in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod gpio;
pub mod mocks;
pub mod peripheral;
pub mod power;

pub use gpio::{NoPin, PanelPins, PinRole};
pub use peripheral::{BitOrder, HalBus, PanelBus, SpiConfig, SpiMode};
pub use power::{PowerMode, PowerProfile, PowerScope, PowerState};
