//! Recording doubles for the bus, pins and delay used by the unit tests.

use core::convert::Infallible;
use std::vec::Vec;

use embedded_hal::{delay::DelayNs, digital};

use crate::interface::Interface;

/// A single transfer seen by [`MockDisplayInterface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(u8),
    Data(Vec<u8>),
}

/// Error injected by [`MockDisplayInterface::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

#[derive(Debug, Default)]
pub struct MockDisplayInterface {
    pub events: Vec<Event>,
    /// Number of transfers that succeed before every later one fails.
    pub fail_after: Option<usize>,
}

impl MockDisplayInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(transfers: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(transfers),
        }
    }

    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Command(c) => Some(*c),
                Event::Data(_) => None,
            })
            .collect()
    }

    pub fn data(&self) -> Vec<&[u8]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Data(d) => Some(d.as_slice()),
                Event::Command(_) => None,
            })
            .collect()
    }

    /// Parameter bytes sent directly after the last occurrence of `command`.
    pub fn params_of(&self, command: u8) -> Option<&[u8]> {
        let pos = self
            .events
            .iter()
            .rposition(|e| *e == Event::Command(command))?;
        match self.events.get(pos + 1) {
            Some(Event::Data(d)) => Some(d.as_slice()),
            _ => Some(&[]),
        }
    }

    fn check(&self) -> Result<(), MockBusError> {
        match self.fail_after {
            Some(n) if self.events.len() >= n => Err(MockBusError),
            _ => Ok(()),
        }
    }
}

impl Interface for MockDisplayInterface {
    type Error = MockBusError;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.check()?;
        self.events.push(Event::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        self.events.push(Event::Data(data.to_vec()));
        Ok(())
    }
}

/// Records every millisecond delay requested.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub sleeps_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.push(ms);
    }
}

/// Output pin recording each level written, `true` for high.
#[derive(Debug, Default)]
pub struct MockPin {
    pub levels: Vec<bool>,
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}
