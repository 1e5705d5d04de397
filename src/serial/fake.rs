//! Recording serial backend for tests

use crate::error::SendError;
use crate::serial::backend::{SerialBackend, SerialLink};
use crate::serial::port::PortConfig;
use anyhow::Result;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Open(PortConfig),
    SetDtr(bool),
    ClearInput,
    Pause(Duration),
    Write(Vec<u8>),
    Flush,
    Close,
}

/// Backend that records every call in order and never touches hardware
#[derive(Debug, Default)]
pub struct FakeBackend {
    events: Rc<RefCell<Vec<Event>>>,
    fail_open: Option<io::ErrorKind>,
    /// Number of opens that succeed before `fail_open` applies
    opens_before_failure: usize,
    opens: usize,
    fail_write: bool,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every open fails with the given error kind
    pub fn failing_open(kind: io::ErrorKind) -> Self {
        Self {
            fail_open: Some(kind),
            ..Self::default()
        }
    }

    /// The first `successful` opens work, every later one fails
    pub fn failing_open_after(successful: usize, kind: io::ErrorKind) -> Self {
        Self {
            fail_open: Some(kind),
            opens_before_failure: successful,
            ..Self::default()
        }
    }

    /// Opens succeed, writes fail
    pub fn failing_write() -> Self {
        Self {
            fail_write: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn opened(&self) -> Vec<PortConfig> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Open(config) => Some(config.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn written(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl SerialBackend for FakeBackend {
    type Link = FakeLink;

    fn open(&mut self, config: &PortConfig) -> Result<FakeLink> {
        let attempt = self.opens;
        self.opens += 1;

        if let Some(kind) = self.fail_open.filter(|_| attempt >= self.opens_before_failure) {
            return Err(SendError::DeviceUnavailable {
                path: config.port_path.clone(),
                source: io::Error::from(kind),
            }
            .into());
        }

        self.events.borrow_mut().push(Event::Open(config.clone()));
        Ok(FakeLink {
            events: Rc::clone(&self.events),
            fail_write: self.fail_write,
        })
    }

    fn pause(&mut self, duration: Duration) {
        self.events.borrow_mut().push(Event::Pause(duration));
    }
}

pub struct FakeLink {
    events: Rc<RefCell<Vec<Event>>>,
    fail_write: bool,
}

impl FakeLink {
    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl SerialLink for FakeLink {
    fn set_dtr(&mut self, level: bool) -> Result<()> {
        self.record(Event::SetDtr(level));
        Ok(())
    }

    fn clear_input(&mut self) -> Result<()> {
        self.record(Event::ClearInput);
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if self.fail_write {
            return Err(SendError::link("write", io::Error::from(io::ErrorKind::TimedOut)).into());
        }
        self.record(Event::Write(data.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.record(Event::Flush);
        Ok(())
    }
}

impl Drop for FakeLink {
    fn drop(&mut self) {
        self.record(Event::Close);
    }
}
