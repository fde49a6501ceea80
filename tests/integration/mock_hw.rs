//! Mock pins, clock and event sink for integration tests.
//!
//! Pins share their state through `Rc` handles so a test can flip the
//! button or inspect the duty history while a controller owns the pin.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dimmer::app::events::DimmerEvent;
use dimmer::app::ports::{Clock, EventSink};
use embedded_hal::digital::{self, InputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

// ── Error ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl pwm::Error for MockError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

// ── MockButton ────────────────────────────────────────────────

/// Active-low button.  `press()` / `release()` act on every clone.
#[derive(Clone, Default)]
pub struct MockButton {
    pressed: Rc<Cell<bool>>,
    reads: Rc<Cell<usize>>,
}

impl MockButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl digital::ErrorType for MockButton {
    type Error = MockError;
}

impl InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, MockError> {
        self.reads.set(self.reads.get() + 1);
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, MockError> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.pressed.get())
    }
}

// ── MockPwm ───────────────────────────────────────────────────

/// 8-bit PWM output recording every duty written.
#[derive(Clone, Default)]
pub struct MockPwm {
    writes: Rc<RefCell<Vec<u16>>>,
    fail: Rc<Cell<bool>>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<u16> {
        self.writes.borrow().clone()
    }

    pub fn last(&self) -> Option<u16> {
        self.writes.borrow().last().copied()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl pwm::ErrorType for MockPwm {
    type Error = MockError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), MockError> {
        if self.fail.get() {
            return Err(MockError);
        }
        self.writes.borrow_mut().push(duty);
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u32>,
    reads: Cell<usize>,
}

impl ManualClock {
    pub fn at(ms: u32) -> Self {
        Self {
            now: Cell::new(ms),
            reads: Cell::new(0),
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.reads.set(self.reads.get() + 1);
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DimmerEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase_changes(&self) -> Vec<DimmerEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, DimmerEvent::PhaseChanged { .. }))
            .copied()
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DimmerEvent) {
        self.events.push(*event);
    }
}
