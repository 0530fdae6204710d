//! Recording transport for protocol tests
//!
//! All handles share one log, so the exact interleaving of pin changes, bus
//! writes, delays and busy reads can be replayed after an operation.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{self, ErrorType as SpiErrorType, SpiBus};

use epaper::epd::BusyPolarity;
use epaper::{Epd, PanelModel, Timing};

/// Output lines of the panel connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ChipSelect,
    DataCommand,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set { role: Role, high: bool },
    Write(u8),
    Flush,
    DelayNs(u32),
    BusyRead { high: bool },
}

/// What the controller saw, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wire {
    Cmd(u8),
    Data(u8),
    /// A busy poll that found the controller idle
    Idle,
}

/// Failure to inject into the next matching transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Pin(Role),
    /// Fail the write of this byte, counted from the moment of injection
    WriteAt(usize),
    BusyRead,
}

#[derive(Debug, Default)]
struct Log {
    events: Vec<Event>,
    dc_high: bool,
    busy_levels: VecDeque<bool>,
    idle_high: bool,
    stuck: bool,
    fault: Option<Fault>,
    writes_since_fault: usize,
}

impl Log {
    fn take_fault(&mut self, matches: impl FnOnce(Fault) -> bool) -> bool {
        match self.fault {
            Some(fault) if matches(fault) => {
                self.fault = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    pub fn new(polarity: BusyPolarity) -> Self {
        let log = Log {
            idle_high: polarity.is_idle(true),
            ..Log::default()
        };
        Recorder {
            log: Rc::new(RefCell::new(log)),
        }
    }

    pub fn pin(&self, role: Role) -> RecPin {
        RecPin {
            role,
            log: Rc::clone(&self.log),
        }
    }

    pub fn busy(&self) -> RecBusy {
        RecBusy {
            log: Rc::clone(&self.log),
        }
    }

    pub fn spi(&self) -> RecSpi {
        RecSpi {
            log: Rc::clone(&self.log),
        }
    }

    pub fn delay(&self) -> RecDelay {
        RecDelay {
            log: Rc::clone(&self.log),
        }
    }

    /// The next `polls` busy reads report busy
    pub fn busy_for(&self, polls: usize) {
        let mut log = self.log.borrow_mut();
        let busy_level = !log.idle_high;
        log.busy_levels.extend(std::iter::repeat(busy_level).take(polls));
    }

    /// Busy line never reports idle again
    pub fn stuck_busy(&self) {
        self.log.borrow_mut().stuck = true;
    }

    pub fn inject(&self, fault: Fault) {
        let mut log = self.log.borrow_mut();
        log.fault = Some(fault);
        log.writes_since_fault = 0;
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().events.clear();
    }

    /// Commands, data bytes and completed busy waits in issue order
    pub fn wire(&self) -> Vec<Wire> {
        let log = self.log.borrow();
        let idle_high = log.idle_high;
        let mut dc_high = false;
        let mut wire = Vec::new();
        for event in &log.events {
            match *event {
                Event::Set {
                    role: Role::DataCommand,
                    high,
                } => dc_high = high,
                Event::Write(byte) if dc_high => wire.push(Wire::Data(byte)),
                Event::Write(byte) => wire.push(Wire::Cmd(byte)),
                Event::BusyRead { high } if high == idle_high => wire.push(Wire::Idle),
                _ => {}
            }
        }
        wire
    }

    /// Sum of all requested delays
    pub fn delayed_ms(&self) -> u64 {
        let ns: u64 = self
            .log
            .borrow()
            .events
            .iter()
            .map(|event| match event {
                Event::DelayNs(ns) => u64::from(*ns),
                _ => 0,
            })
            .sum();
        ns / 1_000_000
    }

    /// Every byte is written with CS low, flushed, then CS raised
    pub fn assert_bracketed(&self) {
        let events = self.events();
        let mut cs_low = false;
        for (i, event) in events.iter().enumerate() {
            match *event {
                Event::Set {
                    role: Role::ChipSelect,
                    high,
                } => cs_low = !high,
                Event::Write(byte) => {
                    assert!(cs_low, "byte 0x{byte:02X} written with CS high");
                    assert_eq!(
                        events.get(i + 1),
                        Some(&Event::Flush),
                        "byte 0x{byte:02X} not flushed"
                    );
                    assert_eq!(
                        events.get(i + 2),
                        Some(&Event::Set {
                            role: Role::ChipSelect,
                            high: true
                        }),
                        "CS not released after 0x{byte:02X}"
                    );
                }
                _ => {}
            }
        }
    }
}

pub struct RecPin {
    role: Role,
    log: Rc<RefCell<Log>>,
}

impl RecPin {
    fn set(&mut self, high: bool) -> Result<(), digital::ErrorKind> {
        let mut log = self.log.borrow_mut();
        let role = self.role;
        if log.take_fault(|fault| fault == Fault::Pin(role)) {
            return Err(digital::ErrorKind::Other);
        }
        if role == Role::DataCommand {
            log.dc_high = high;
        }
        log.events.push(Event::Set { role, high });
        Ok(())
    }
}

impl PinErrorType for RecPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for RecPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

pub struct RecBusy {
    log: Rc<RefCell<Log>>,
}

impl RecBusy {
    fn read(&mut self) -> Result<bool, digital::ErrorKind> {
        let mut log = self.log.borrow_mut();
        if log.take_fault(|fault| fault == Fault::BusyRead) {
            return Err(digital::ErrorKind::Other);
        }
        let high = if log.stuck {
            !log.idle_high
        } else {
            let idle = log.idle_high;
            log.busy_levels.pop_front().unwrap_or(idle)
        };
        log.events.push(Event::BusyRead { high });
        Ok(high)
    }
}

impl PinErrorType for RecBusy {
    type Error = digital::ErrorKind;
}

impl InputPin for RecBusy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|high| !high)
    }
}

pub struct RecSpi {
    log: Rc<RefCell<Log>>,
}

impl SpiErrorType for RecSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus for RecSpi {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        for &byte in words {
            if let Some(Fault::WriteAt(n)) = log.fault {
                if log.writes_since_fault == n {
                    log.fault = None;
                    return Err(spi::ErrorKind::Other);
                }
                log.writes_since_fault += 1;
            }
            log.events.push(Event::Write(byte));
        }
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().events.push(Event::Flush);
        Ok(())
    }
}

pub struct RecDelay {
    log: Rc<RefCell<Log>>,
}

impl DelayNs for RecDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().events.push(Event::DelayNs(ns));
    }
}

pub type RecordedEpd = Epd<RecSpi, RecPin, RecPin, RecPin, RecBusy, RecDelay>;

/// Session over a fresh recorder, construction events already cleared
pub fn open(model: PanelModel, timing: Timing) -> (RecordedEpd, Recorder) {
    let recorder = Recorder::new(model.busy_polarity());
    let epd = Epd::new(
        recorder.spi(),
        recorder.pin(Role::ChipSelect),
        recorder.pin(Role::DataCommand),
        recorder.pin(Role::Reset),
        recorder.busy(),
        recorder.delay(),
        model,
        timing,
    )
    .expect("recording transport never fails unless told to");
    recorder.clear();
    (epd, recorder)
}

/// The ordered stream `init()` must produce for the 2.7" panel
pub fn epd_2in7_init_stream() -> Vec<Wire> {
    let mut wire = Vec::new();
    let mut step = |opcode: u8, payload: &[u8]| {
        wire.push(Wire::Cmd(opcode));
        wire.extend(payload.iter().map(|&b| Wire::Data(b)));
    };

    step(0x01, &[0x03, 0x00, 0x2B, 0x2B, 0x09]);
    step(0x06, &[0x07, 0x07, 0x17]);
    for pair in [
        [0x60, 0xA5],
        [0x89, 0xA5],
        [0x90, 0x00],
        [0x93, 0x2A],
        [0xA0, 0xA5],
        [0xA1, 0x00],
        [0x73, 0x41],
    ] {
        step(0xF8, &pair[..]);
    }
    step(0x16, &[0x00]);
    step(0x04, &[]);
    wire.push(Wire::Idle);

    let mut step = |opcode: u8, payload: &[u8]| {
        wire.push(Wire::Cmd(opcode));
        wire.extend(payload.iter().map(|&b| Wire::Data(b)));
    };
    step(0x00, &[0xAF]);
    step(0x30, &[0x3A]);
    step(0x82, &[0x12]);
    step(
        0x20,
        &[
            0x00, 0x00, //
            0x00, 0x08, 0x00, 0x00, 0x00, 0x02, //
            0x60, 0x28, 0x28, 0x00, 0x00, 0x01, //
            0x00, 0x14, 0x00, 0x00, 0x00, 0x01, //
            0x00, 0x12, 0x12, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ],
    );
    step(
        0x21,
        &[
            0x40, 0x08, 0x00, 0x00, 0x00, 0x02, //
            0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
            0x40, 0x14, 0x00, 0x00, 0x00, 0x01, //
            0xA0, 0x12, 0x12, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ],
    );
    step(
        0x22,
        &[
            0x40, 0x08, 0x00, 0x00, 0x00, 0x02, //
            0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
            0x40, 0x14, 0x00, 0x00, 0x00, 0x01, //
            0xA0, 0x12, 0x12, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ],
    );
    step(
        0x23,
        &[
            0x80, 0x08, 0x00, 0x00, 0x00, 0x02, //
            0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
            0x80, 0x14, 0x00, 0x00, 0x00, 0x01, //
            0x50, 0x12, 0x12, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ],
    );
    step(
        0x24,
        &[
            0x80, 0x08, 0x00, 0x00, 0x00, 0x02, //
            0x90, 0x28, 0x28, 0x00, 0x00, 0x01, //
            0x80, 0x14, 0x00, 0x00, 0x00, 0x01, //
            0x50, 0x12, 0x12, 0x00, 0x00, 0x01, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        ],
    );
    wire
}

/// `start` + `payload` + refresh + completed busy wait
pub fn frame_stream(start: u8, payload: &[u8]) -> Vec<Wire> {
    let mut wire = vec![Wire::Cmd(start)];
    wire.extend(payload.iter().map(|&b| Wire::Data(b)));
    wire.push(Wire::Cmd(0x12));
    wire.push(Wire::Idle);
    wire
}
