//! WS2813C single-wire RGB LED
//!
//! The LED has no clock line: each bit is a pulse whose high time tells a
//! 1 from a 0. There is no timer behind the waveform. Pulse width comes
//! from the number of back-to-back pin writes, so the whole frame runs
//! inside one critical section.
//!
//! ```text
//! 1 bit:  HHHHHHHHHHHHHHLLLLLL         14 × high, 6 × low
//! 0 bit:  HHHHHLLLLLLLLLLLLLLL         5 × high, 15 × low
//! ```
//!
//! A frame is 24 bits, green then red then blue, each colour MSB first.
//! The colour is packed in that order ([`pack_grb`]) and then mirrored
//! ([`reverse24`]) so the transmit loop can always shift out the low bit.
//!
//! The protocol has no acknowledgement. Pin errors are dropped and a bad
//! waveform only shows as a wrong colour.

#![cfg_attr(not(test), no_std)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

use embedded_hal::digital::OutputPin;

/// Bits per frame.
pub const FRAME_BITS: u32 = 24;

/// Pin writes for the high phase of a 1 bit (about 780 ns at 56 ns each).
pub const ONE_HIGH: usize = 14;
/// Pin writes for the low phase of a 1 bit.
pub const ONE_LOW: usize = 6;
/// Pin writes for the high phase of a 0 bit (about 280 ns).
pub const ZERO_HIGH: usize = 5;
/// Pin writes for the low phase of a 0 bit.
pub const ZERO_LOW: usize = 15;

const FRAME_MASK: u32 = 0x00FF_FFFF;

/// Pack a colour in wire order: `G<<16 | R<<8 | B`, bit 23 is the first
/// bit on the wire.
#[allow(clippy::arithmetic_side_effects)] // u8 shifted by at most 16 fits u32
pub fn pack_grb(red: u8, green: u8, blue: u8) -> u32 {
    (u32::from(green) << 16) | (u32::from(red) << 8) | u32::from(blue)
}

/// Mirror the low 24 bits so the first wire bit becomes bit 0.
#[allow(clippy::arithmetic_side_effects)] // constant shift < 32
pub const fn reverse24(value: u32) -> u32 {
    (value & FRAME_MASK).reverse_bits() >> 8
}

/// One WS2813C on a push-pull output pin.
pub struct Ws2813c<P> {
    pin: P,
    num_leds: u16,
}

impl<P: OutputPin> Ws2813c<P> {
    /// Take ownership of the data pin. `num_leds` is kept for the caller;
    /// every frame drives the first LED of the chain.
    pub fn new(pin: P, num_leds: u16) -> Self {
        Self { pin, num_leds }
    }

    /// Drive the line low and switch the LED off.
    pub fn begin(&mut self) {
        let _ = self.pin.set_low();
        self.set_pixel(0, 0, 0);

        #[cfg(feature = "defmt")]
        defmt::debug!("WS2813C ready, {} LED(s)", self.num_leds);
    }

    /// Show one colour.
    pub fn set_pixel(&mut self, red: u8, green: u8, blue: u8) {
        let frame = reverse24(pack_grb(red, green, blue));
        critical_section::with(|_| transmit(&mut self.pin, frame));
    }

    /// Same colour on every LED. With a single data frame this is
    /// [`set_pixel`](Self::set_pixel).
    pub fn set_all(&mut self, red: u8, green: u8, blue: u8) {
        self.set_pixel(red, green, blue);
    }

    /// LED count given at construction.
    pub fn num_leds(&self) -> u16 {
        self.num_leds
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

/// Shift out `frame` LSB first. Keep this free of calls other than the pin
/// writes.
#[inline(always)]
#[allow(clippy::inline_always, clippy::arithmetic_side_effects)] // shift by 1 on u32
fn transmit<P: OutputPin>(pin: &mut P, frame: u32) {
    let mut bits = frame;
    for _ in 0..FRAME_BITS {
        if bits & 1 != 0 {
            pulse(pin, ONE_HIGH, ONE_LOW);
        } else {
            pulse(pin, ZERO_HIGH, ZERO_LOW);
        }
        bits >>= 1;
    }
}

#[inline(always)]
#[allow(clippy::inline_always)]
fn pulse<P: OutputPin>(pin: &mut P, high: usize, low: usize) {
    for _ in 0..high {
        let _ = pin.set_high();
    }
    for _ in 0..low {
        let _ = pin.set_low();
    }
}
