//! The recording mock board keeps pin and bus traffic in one ordered log.

#![allow(clippy::unwrap_used)]

use embedded_hal::digital::{InputPin, OutputPin};
use platform::mocks::{Event, MockBoard, PinId};
use platform::{PanelBus, SpiConfig};

#[test]
fn pins_and_bus_share_one_log() {
    let board = MockBoard::new();
    let mut pins = board.pins();
    let mut bus = board.bus();

    pins.cs.set_low().unwrap();
    bus.begin(SpiConfig::panel(8_000_000)).unwrap();
    bus.write(0x12).unwrap();
    pins.cs.set_high().unwrap();
    bus.end().unwrap();

    assert_eq!(
        board.events(),
        vec![
            Event::Set(PinId::Cs, false),
            Event::Begin(8_000_000),
            Event::Write(0x12),
            Event::Set(PinId::Cs, true),
            Event::End,
        ]
    );
}

#[test]
fn pins_without_power_has_no_power_pin() {
    let board = MockBoard::new();
    assert!(board.pins_without_power().power.is_none());
    assert!(board.pins().power.is_some());
}

#[test]
fn busy_idle_level_is_configurable() {
    let board = MockBoard::new();
    let mut busy = board.busy();
    assert!(busy.is_high().unwrap());
    board.set_busy_idle(false);
    assert!(busy.is_low().unwrap());
}

#[test]
fn clear_events_keeps_queued_reads() {
    let board = MockBoard::new();
    let mut bus = board.bus();
    board.queue_reads(&[0xA5]);
    bus.write(0x00).unwrap();
    board.clear_events();
    assert!(board.events().is_empty());
    assert_eq!(bus.read().unwrap(), 0xA5);
    assert_eq!(board.count(Event::Read(0xA5)), 1);
}

#[test]
fn default_begin_wire_is_recorded_by_mock() {
    let board = MockBoard::new();
    let mut bus = board.bus();
    bus.begin_wire().unwrap();
    assert_eq!(board.count(Event::BeginWire), 1);
}
