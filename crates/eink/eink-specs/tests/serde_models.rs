//! Models and profiles serialize for configuration files.

#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used)]

use eink_specs::models::{EPD_271_KS_09_TOUCH, EPD_290_KS_0F};
use eink_specs::{OtpLayout, ScreenModel};

#[test]
fn screen_model_survives_json() {
    let json = serde_json::to_string(&EPD_271_KS_09_TOUCH).unwrap();
    let back: ScreenModel = serde_json::from_str(&json).unwrap();
    assert_eq!(back, EPD_271_KS_09_TOUCH);
    assert!(back.profile().is_some());
}

#[test]
fn profile_serializes_otp_layout_by_name() {
    let profile = EPD_290_KS_0F.profile().unwrap();
    assert_eq!(profile.otp, OtpLayout::Embedded);
    let json = serde_json::to_value(profile).unwrap();
    assert_eq!(json["otp"], "Embedded");
    assert_eq!(json["rows"], 384);
    assert_eq!(json["spi_hz"], 16_000_000);
}
