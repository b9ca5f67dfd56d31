//! Pre-configured screen models
//!
//! Named constants for the small-family panels with fast update (films P and
//! K). Names follow the part number: `EPD_266_KS_0C` is `E2266KS0C1`.

use crate::screen_model::{Film, ScreenModel};

/// 1.50" 200×200, wide temperature, J driver.
pub const EPD_150_KS_0J: ScreenModel = ScreenModel::new(150, Film::K, 'J');
/// 1.52" 200×200, wide temperature, J driver.
pub const EPD_152_KS_0J: ScreenModel = ScreenModel::new(152, Film::K, 'J');
/// 1.54" 152×152, fast update.
pub const EPD_154_PS_0C: ScreenModel = ScreenModel::new(154, Film::P, 'C');
/// 1.54" 152×152, wide temperature.
pub const EPD_154_KS_0C: ScreenModel = ScreenModel::new(154, Film::K, 'C');
/// 2.06" 248×128, wide temperature.
pub const EPD_206_KS_0E: ScreenModel = ScreenModel::new(206, Film::K, 'E');
/// 2.13" 212×104, fast update.
pub const EPD_213_PS_0E: ScreenModel = ScreenModel::new(213, Film::P, 'E');
/// 2.13" 212×104, wide temperature.
pub const EPD_213_KS_0E: ScreenModel = ScreenModel::new(213, Film::K, 'E');
/// 2.66" 296×152, fast update.
pub const EPD_266_PS_0C: ScreenModel = ScreenModel::new(266, Film::P, 'C');
/// 2.66" 296×152, wide temperature.
pub const EPD_266_KS_0C: ScreenModel = ScreenModel::new(266, Film::K, 'C');
/// 2.71" 264×176, fast update.
pub const EPD_271_PS_09: ScreenModel = ScreenModel::new(271, Film::P, '9');
/// 2.71" 264×176, fast update, touch layer.
pub const EPD_271_PS_09_TOUCH: ScreenModel = EPD_271_PS_09.with_touch();
/// 2.71" 264×176, wide temperature.
pub const EPD_271_KS_09: ScreenModel = ScreenModel::new(271, Film::K, '9');
/// 2.71" 264×176, wide temperature, touch layer.
pub const EPD_271_KS_09_TOUCH: ScreenModel = EPD_271_KS_09.with_touch();
/// 2.71"(A) 264×176, wide temperature.
pub const EPD_271_KS_0C: ScreenModel = ScreenModel::new(271, Film::K, 'C');
/// 2.87" 296×128, fast update.
pub const EPD_287_PS_09: ScreenModel = ScreenModel::new(287, Film::P, '9');
/// 2.90" 384×168, wide temperature.
pub const EPD_290_KS_0F: ScreenModel = ScreenModel::new(290, Film::K, 'F');

/// Every model with a [`PanelProfile`](crate::PanelProfile).
pub const ALL: &[ScreenModel] = &[
    EPD_150_KS_0J,
    EPD_152_KS_0J,
    EPD_154_PS_0C,
    EPD_154_KS_0C,
    EPD_206_KS_0E,
    EPD_213_PS_0E,
    EPD_213_KS_0E,
    EPD_266_PS_0C,
    EPD_266_KS_0C,
    EPD_271_PS_09,
    EPD_271_PS_09_TOUCH,
    EPD_271_KS_09,
    EPD_271_KS_09_TOUCH,
    EPD_271_KS_0C,
    EPD_287_PS_09,
    EPD_290_KS_0F,
];
