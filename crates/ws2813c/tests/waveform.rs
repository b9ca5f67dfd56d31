//! Pin waveform of whole frames, checked write by write on a mock pin.

#![allow(clippy::arithmetic_side_effects)]

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
use ws2813c::{Ws2813c, ONE_HIGH, ONE_LOW, ZERO_HIGH, ZERO_LOW};

/// Pin writes for a sequence of wire bits, first bit first.
fn waveform(bits: impl IntoIterator<Item = bool>) -> Vec<Transaction> {
    let mut writes = Vec::new();
    for bit in bits {
        let (high, low) = if bit {
            (ONE_HIGH, ONE_LOW)
        } else {
            (ZERO_HIGH, ZERO_LOW)
        };
        writes.extend(std::iter::repeat(Transaction::set(State::High)).take(high));
        writes.extend(std::iter::repeat(Transaction::set(State::Low)).take(low));
    }
    writes
}

/// Wire bits of one colour byte, MSB first.
fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).rev().map(move |i| (byte >> i) & 1 == 1)
}

#[test]
fn red_sends_green_byte_first() {
    // green 0x00, red 0xFF, blue 0x00
    let bits = [false; 8]
        .into_iter()
        .chain([true; 8])
        .chain([false; 8]);
    let expected = waveform(bits);
    assert_eq!(expected.len(), 8 * 20 * 3);

    let mut led = Ws2813c::new(PinMock::new(&expected), 1);
    led.set_pixel(0xFF, 0x00, 0x00);
    led.release().done();
}

#[test]
fn mixed_colour_is_msb_first_per_channel() {
    let (red, green, blue) = (0x81, 0x42, 0x0F);
    let bits = byte_bits(green).chain(byte_bits(red)).chain(byte_bits(blue));
    let expected = waveform(bits);

    let mut led = Ws2813c::new(PinMock::new(&expected), 1);
    led.set_pixel(red, green, blue);
    led.release().done();
}

#[test]
fn begin_pulls_low_then_sends_black() {
    let mut expected = vec![Transaction::set(State::Low)];
    expected.extend(waveform([false; 24]));

    let mut led = Ws2813c::new(PinMock::new(&expected), 4);
    led.begin();
    assert_eq!(led.num_leds(), 4);
    led.release().done();
}

#[test]
fn set_all_writes_one_frame() {
    let expected = waveform([true; 24]);
    let mut led = Ws2813c::new(PinMock::new(&expected), 8);
    led.set_all(0xFF, 0xFF, 0xFF);
    led.release().done();
}
