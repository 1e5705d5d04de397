//! Boundary between the send procedure and the operating system
//!
//! The procedure only ever talks to a `SerialBackend`, so the whole reset and
//! write sequence can be replayed against a recording double in tests.

use crate::serial::port::{PortConfig, SerialConnection};
use anyhow::Result;
use std::time::Duration;

/// An open serial device. Dropping it closes the device.
pub trait SerialLink {
    /// Drive the DTR (Data Terminal Ready) control line
    fn set_dtr(&mut self, level: bool) -> Result<()>;

    /// Discard bytes already received but not yet read
    fn clear_input(&mut self) -> Result<()>;

    /// Write the whole buffer
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Block until buffered output has been transmitted
    fn flush(&mut self) -> Result<()>;

    /// Release the device now instead of at scope end
    fn close(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// Opens serial devices and provides the blocking pause
pub trait SerialBackend {
    type Link: SerialLink;

    fn open(&mut self, config: &PortConfig) -> Result<Self::Link>;

    fn pause(&mut self, duration: Duration);
}

/// Real serial ports and real sleeping
#[derive(Debug, Default)]
pub struct SystemBackend;

impl SerialBackend for SystemBackend {
    type Link = SerialConnection;

    fn open(&mut self, config: &PortConfig) -> Result<SerialConnection> {
        SerialConnection::open(config.clone())
    }

    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
