//! E-Paper Screen Specifications
//!
//! Model identifiers and per-model protocol parameters for the Pervasive
//! Displays small-family panels with embedded fast update (films P and K).
//!
//! # Features
//!
//! - **no_std compatible** - tables are `const`, nothing allocates
//! - **Model templates** - named constants for every supported part number
//! - **Lookup table** - one [`PanelProfile`] per model instead of per-phase
//!   branching on the model
//! - **Temperature policy** - clamps fast/global update to the film's band
//! - **Serde support** - optional serialization of models and profiles
//!
//! # Example
//!
//! ```
//! use eink_specs::models::EPD_266_KS_0C;
//! use eink_specs::{check_temperature_mode, UpdateMode};
//!
//! let profile = EPD_266_KS_0C.profile().unwrap();
//! assert_eq!((profile.rows, profile.columns), (296, 152));
//! assert_eq!(EPD_266_KS_0C.who_am_i().as_str(), "iTC 2.66\" -Wide");
//!
//! // Too cold for fast update on a wide-temperature film
//! let mode = check_temperature_mode(EPD_266_KS_0C.film(), -10, UpdateMode::Fast);
//! assert_eq!(mode, UpdateMode::Global);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod models;
pub mod profile;
mod screen_model;
pub mod temperature;

pub use profile::{
    profile_for, ImageCommands, InitLayout, OtpBank, OtpLayout, PanelProfile, ReadyLevel,
    SPI_HZ_DEFAULT, SPI_HZ_FAST,
};
pub use screen_model::{Film, ScreenModel, SPLIT_SIZES};
pub use temperature::{
    check_temperature_mode, fast_range, global_range, TemperatureRange, UpdateMode,
    DEFAULT_TEMPERATURE,
};
