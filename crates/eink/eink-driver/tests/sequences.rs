//! Command sequences of a full flush, decoded from the mock board's event log.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use eink_driver::{Colour, ScreenEpdExt4};
use eink_specs::models::{EPD_152_KS_0J, EPD_266_KS_0C, EPD_266_PS_0C, EPD_290_KS_0F};
use eink_specs::{ScreenModel, UpdateMode};
use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::mocks::{Event, Frame, MockBoard, MockBus, MockBusy, MockPin};

type TestScreen =
    ScreenEpdExt4<MockBus, MockPin, MockPin, MockBusy, MockPin, MockPin, NoopDelay, Vec<u8>>;

// 2.66": 296 lines × 19 bytes
const PAGE_266: usize = 296 * 19;

fn frame(command: u8, data: &[u8]) -> Frame {
    Frame {
        command,
        data: data.to_vec(),
    }
}

/// Begun screen with bank-0 OTP PSR `[0x05, 0x40]` and a clean event log.
fn started(board: &MockBoard, model: ScreenModel) -> TestScreen {
    let mut stream = vec![0x00; 0x0FB6 + 1];
    stream[1] = 0xA5;
    stream[0x0FB4 + 1] = 0x05;
    stream[0x0FB5 + 1] = 0x40;
    board.queue_reads(&stream);

    let len = model.frame_buffer_len().unwrap();
    let mut screen =
        ScreenEpdExt4::new(model, board.bus(), board.pins(), NoopDelay::new(), vec![0u8; len]);
    screen.begin().unwrap();
    board.clear_events();
    screen
}

#[test]
fn fast_flush_runs_all_four_phases() {
    let board = MockBoard::new();
    let mut screen = started(&board, EPD_266_PS_0C);
    screen.clear(Colour::White);

    assert_eq!(screen.flush().unwrap(), UpdateMode::Fast);

    let white = vec![0xFF; PAGE_266];
    let black = vec![0x00; PAGE_266];
    assert_eq!(
        board.frames(),
        vec![
            // initialize
            frame(0x00, &[0x0E]),
            frame(0xE5, &[25 | 0x40]),
            frame(0xE0, &[0x02]),
            frame(0x00, &[0x05 | 0x10, 0x40 | 0x02]),
            frame(0x50, &[0x07]),
            // image
            frame(0x50, &[0x27]),
            frame(0x10, &black),
            frame(0x13, &white),
            frame(0x50, &[0x07]),
            // update
            frame(0x04, &[]),
            frame(0x12, &[]),
            // power off
            frame(0x02, &[]),
        ]
    );
}

#[test]
fn flush_commits_next_over_previous() {
    let board = MockBoard::new();
    let mut screen = started(&board, EPD_266_PS_0C);
    screen.clear(Colour::Grey);
    screen.flush().unwrap();

    let (next, previous) = screen.frame_buffer().split_at(PAGE_266);
    assert_eq!(next, &previous[..PAGE_266]);

    // the second flush diffs against the first image
    board.clear_events();
    screen.clear(Colour::Black);
    screen.flush().unwrap();
    let previous_sent = board
        .frames()
        .into_iter()
        .find(|f| f.command == 0x10)
        .unwrap();
    assert_eq!(previous_sent.data[..2], [0x55, 0x55]);
    assert_eq!(previous_sent.data[19..21], [0xAA, 0xAA]);
}

#[test]
fn cold_fast_flush_downgrades_to_global_with_plain_psr() {
    let board = MockBoard::new();
    let mut screen = started(&board, EPD_266_KS_0C);
    screen.set_temperature(-10);

    assert_eq!(screen.flush().unwrap(), UpdateMode::Global);

    let frames = board.frames();
    assert_eq!(frames[1], frame(0xE5, &[0xF6]));
    assert_eq!(frames[3], frame(0x00, &[0x05, 0x40]));
    // no fast vcom setting before the image
    assert_eq!(frames[4], frame(0x50, &[0x27]));
}

#[test]
fn out_of_range_temperature_sends_nothing() {
    let board = MockBoard::new();
    let mut screen = started(&board, EPD_266_KS_0C);
    screen.set_temperature(-20);

    assert_eq!(screen.flush().unwrap(), UpdateMode::None);
    assert!(board.events().is_empty());
    assert_eq!(screen.flush_mode(UpdateMode::Global).unwrap(), UpdateMode::None);
    assert!(board.events().is_empty());
}

#[test]
fn j_driver_sequence() {
    let board = MockBoard::new();
    board.set_busy_idle(false);
    let mut screen = started(&board, EPD_152_KS_0J);
    // no OTP on the J driver: the queued stream is untouched
    assert_eq!(board.reads(), 0);

    screen.flush_mode(UpdateMode::Global).unwrap();
    assert_eq!(board.commands(), vec![0x12, 0x1A, 0x22, 0x24, 0x26, 0x20]);
    assert_eq!(board.frames()[2], frame(0x22, &[0xD7]));

    board.clear_events();
    screen.flush().unwrap();
    assert_eq!(
        board.commands(),
        vec![0x12, 0x1A, 0x3C, 0x22, 0x24, 0x26, 0x20]
    );
}

#[test]
fn spi_speed_follows_model() {
    let board = MockBoard::new();
    let mut screen = started(&board, EPD_290_KS_0F);
    screen.suspend(platform::PowerScope::GpioOnly).unwrap();
    screen.resume().unwrap();
    assert_eq!(board.count(Event::Begin(16_000_000)), 1);

    let board = MockBoard::new();
    let mut screen = started(&board, EPD_266_PS_0C);
    screen.suspend(platform::PowerScope::GpioOnly).unwrap();
    screen.resume().unwrap();
    assert_eq!(board.count(Event::Begin(8_000_000)), 1);
}
