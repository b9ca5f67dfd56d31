//! `embedded-graphics` drawing into the frame buffer
//!
//! `BinaryColor::On` is black ink, `BinaryColor::Off` white paper. Pixels
//! go through the screen orientation; off-screen pixels are dropped.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use platform::PanelBus;

use crate::error::Error;
use crate::frame_buffer::Colour;
use crate::screen::ScreenEpdExt4;

impl<BUS, DC, CS, BUSY, RST, PWR, DELAY, B> DrawTarget
    for ScreenEpdExt4<BUS, DC, CS, BUSY, RST, PWR, DELAY, B>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    type Color = BinaryColor;
    type Error = Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            let colour = match color {
                BinaryColor::On => Colour::Black,
                BinaryColor::Off => Colour::White,
            };
            self.set_point(x, y, colour);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let colour = match color {
            BinaryColor::On => Colour::Black,
            BinaryColor::Off => Colour::White,
        };
        ScreenEpdExt4::clear(self, colour);
        Ok(())
    }
}

impl<BUS, DC, CS, BUSY, RST, PWR, DELAY, B> OriginDimensions
    for ScreenEpdExt4<BUS, DC, CS, BUSY, RST, PWR, DELAY, B>
where
    BUS: PanelBus,
    DC: OutputPin,
    CS: OutputPin,
    BUSY: InputPin,
    RST: OutputPin,
    PWR: OutputPin,
    DELAY: DelayNs,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    fn size(&self) -> Size {
        Size::new(
            u32::from(self.screen_size_x()),
            u32::from(self.screen_size_y()),
        )
    }
}
