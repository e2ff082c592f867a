//! Fake `embedded-hal` pins and delay shared by the host tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Input pin whose level is set from the test.
#[derive(Clone, Default)]
pub struct FakeInput {
    high: Rc<Cell<bool>>,
}

impl FakeInput {
    pub fn high() -> Self {
        let pin = Self::default();
        pin.set(true);
        pin
    }

    pub fn low() -> Self {
        Self::default()
    }

    pub fn set(&self, high: bool) {
        self.high.set(high);
    }
}

impl ErrorType for FakeInput {
    type Error = Infallible;
}

impl InputPin for FakeInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

/// Output pin that remembers its level and every write.
#[derive(Clone, Default)]
pub struct FakeOutput {
    high: Rc<Cell<bool>>,
    writes: Rc<RefCell<Vec<bool>>>,
}

impl FakeOutput {
    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.borrow().clone()
    }

    fn write(&self, high: bool) {
        self.high.set(high);
        self.writes.borrow_mut().push(high);
    }
}

impl ErrorType for FakeOutput {
    type Error = Infallible;
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.write(true);
        Ok(())
    }
}

/// Delay that returns immediately and records the requested durations.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    calls_ns: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn calls_ns(&self) -> Vec<u32> {
        self.calls_ns.borrow().clone()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls_ns.borrow_mut().push(ns);
    }
}
