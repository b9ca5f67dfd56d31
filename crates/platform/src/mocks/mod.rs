//! Recording mocks for panel driver tests
//!
//! One [`MockBoard`] hands out a bus and pins that all append to the same
//! event log, so a test sees pin toggles and bus bytes in their true order.
//! [`MockBoard::frames`] decodes the log into `(command, data)` frames using
//! the data/command pin, which is how the command sequences are asserted.

#![cfg(any(test, feature = "std"))]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::gpio::PanelPins;
use crate::peripheral::{PanelBus, SpiConfig};

/// Pin identity in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinId {
    /// Data/command.
    Dc,
    /// Chip-select.
    Cs,
    /// Secondary chip-select.
    CsSecondary,
    /// Reset.
    Reset,
    /// Power switch.
    Power,
}

/// One recorded board interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Output pin driven high (`true`) or low.
    Set(PinId, bool),
    /// 4-wire bus started at this frequency.
    Begin(u32),
    /// 3-wire OTP mode entered.
    BeginThreeWire,
    /// Bus released.
    End,
    /// Byte written.
    Write(u8),
    /// Byte read.
    Read(u8),
    /// Auxiliary I2C started.
    BeginWire,
}

/// Command byte and the data bytes that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Byte written with DC low.
    pub command: u8,
    /// Bytes written with DC high until the next command.
    pub data: Vec<u8>,
}

/// Error returned by [`MockBus`] once failure injection is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

#[derive(Default)]
struct BoardLog {
    events: Vec<Event>,
    reads: VecDeque<u8>,
    busy_script: VecDeque<bool>,
    busy_idle: bool,
    busy_polls: usize,
    fail_bus: bool,
}

/// Shared state behind the mock bus and pins.
#[derive(Clone)]
pub struct MockBoard {
    log: Rc<RefCell<BoardLog>>,
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBoard {
    /// New board whose busy line idles high.
    pub fn new() -> Self {
        let log = BoardLog {
            busy_idle: true,
            ..BoardLog::default()
        };
        Self {
            log: Rc::new(RefCell::new(log)),
        }
    }

    /// Bus handle.
    pub fn bus(&self) -> MockBus {
        MockBus {
            log: Rc::clone(&self.log),
        }
    }

    /// Output pin handle.
    pub fn pin(&self, id: PinId) -> MockPin {
        MockPin {
            id,
            log: Rc::clone(&self.log),
        }
    }

    /// Busy input handle.
    pub fn busy(&self) -> MockBusy {
        MockBusy {
            log: Rc::clone(&self.log),
        }
    }

    /// Full wiring with a power pin.
    pub fn pins(&self) -> PanelPins<MockPin, MockPin, MockBusy, MockPin, MockPin> {
        PanelPins::new(
            self.pin(PinId::Dc),
            self.pin(PinId::Cs),
            self.busy(),
            self.pin(PinId::Reset),
            self.pin(PinId::Power),
        )
    }

    /// Wiring without a power pin.
    pub fn pins_without_power(&self) -> PanelPins<MockPin, MockPin, MockBusy, MockPin, MockPin> {
        PanelPins {
            power: None,
            ..self.pins()
        }
    }

    /// Queue bytes returned by successive bus reads. An empty queue reads `0xFF`.
    pub fn queue_reads(&self, bytes: &[u8]) {
        self.log.borrow_mut().reads.extend(bytes.iter().copied());
    }

    /// Level the busy line returns once the script is exhausted.
    pub fn set_busy_idle(&self, high: bool) {
        self.log.borrow_mut().busy_idle = high;
    }

    /// Levels returned by the next busy reads, in order.
    pub fn script_busy(&self, levels: &[bool]) {
        self.log.borrow_mut().busy_script.extend(levels.iter().copied());
    }

    /// Make every bus call fail.
    pub fn fail_bus(&self, fail: bool) {
        self.log.borrow_mut().fail_bus = fail;
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().events.clone()
    }

    /// Forget recorded events (queued reads and busy script stay).
    pub fn clear_events(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// How often `event` was recorded.
    pub fn count(&self, event: Event) -> usize {
        self.log.borrow().events.iter().filter(|e| **e == event).count()
    }

    /// Number of bytes read from the bus.
    pub fn reads(&self) -> usize {
        self.log
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Read(_)))
            .count()
    }

    /// Number of busy line samples taken.
    pub fn busy_polls(&self) -> usize {
        self.log.borrow().busy_polls
    }

    /// Decode written bytes into command frames.
    ///
    /// A byte written with DC low opens a frame; bytes written with DC high
    /// append to the open frame. Data written before any command is dropped.
    pub fn frames(&self) -> Vec<Frame> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut dc_high = true;
        for event in &self.log.borrow().events {
            match *event {
                Event::Set(PinId::Dc, high) => dc_high = high,
                Event::Write(byte) if !dc_high => frames.push(Frame {
                    command: byte,
                    data: Vec::new(),
                }),
                Event::Write(byte) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.data.push(byte);
                    }
                }
                _ => {}
            }
        }
        frames
    }

    /// Command bytes only, in order.
    pub fn commands(&self) -> Vec<u8> {
        self.frames().iter().map(|f| f.command).collect()
    }
}

/// Bus half of a [`MockBoard`].
pub struct MockBus {
    log: Rc<RefCell<BoardLog>>,
}

impl MockBus {
    fn push(&mut self, event: Event) -> Result<(), MockBusError> {
        let mut log = self.log.borrow_mut();
        if log.fail_bus {
            return Err(MockBusError);
        }
        log.events.push(event);
        Ok(())
    }
}

impl PanelBus for MockBus {
    type Error = MockBusError;

    fn begin(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        self.push(Event::Begin(config.frequency))
    }

    fn begin_three_wire(&mut self) -> Result<(), Self::Error> {
        self.push(Event::BeginThreeWire)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        self.push(Event::End)
    }

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.push(Event::Write(byte))
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        let byte = {
            let mut log = self.log.borrow_mut();
            if log.fail_bus {
                return Err(MockBusError);
            }
            log.reads.pop_front().unwrap_or(0xFF)
        };
        self.push(Event::Read(byte))?;
        Ok(byte)
    }

    fn begin_wire(&mut self) -> Result<(), Self::Error> {
        self.push(Event::BeginWire)
    }
}

/// Output pin of a [`MockBoard`].
pub struct MockPin {
    id: PinId,
    log: Rc<RefCell<BoardLog>>,
}

impl ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().events.push(Event::Set(self.id, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().events.push(Event::Set(self.id, true));
        Ok(())
    }
}

/// Busy input of a [`MockBoard`].
pub struct MockBusy {
    log: Rc<RefCell<BoardLog>>,
}

impl ErrorType for MockBusy {
    type Error = core::convert::Infallible;
}

impl InputPin for MockBusy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut log = self.log.borrow_mut();
        log.busy_polls = log.busy_polls.saturating_add(1);
        let level = match log.busy_script.pop_front() {
            Some(level) => level,
            None => log.busy_idle,
        };
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
