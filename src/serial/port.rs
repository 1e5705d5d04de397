//! Serial port configuration and connection management
//!
//! Holds the two fixed configurations used to talk to an auto-resetting
//! USB-serial board and the owning wrapper around an open port.

use crate::error::SendError;
use crate::serial::backend::SerialLink;
use anyhow::Result;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Write;
use std::time::Duration;

/// Baud rate the payload connection runs at
pub const LINK_BAUD: u32 = 115200;

/// Read/write timeout of the payload connection
pub const LINK_TIMEOUT: Duration = Duration::from_secs(1);

/// Baud rate used when no explicit parameters are given
pub const NATIVE_BAUD: u32 = 9600;

/// Configuration for serial port connection
#[derive(Debug, Clone, PartialEq)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, /dev/ttyACM0)
    pub port_path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Covers both XON/XOFF and RTS/CTS
    pub flow_control: FlowControl,
    /// Read/write timeout
    pub timeout: Duration,
    /// Refuse other opens of the same device while held
    pub exclusive: bool,
}

impl PortConfig {
    /// Parameters the serial library falls back to when none are given.
    ///
    /// Only the control lines are touched through this connection, so the
    /// framing is irrelevant to the device. Neither preset is exclusive: the
    /// reset connection stays open while the link connection is opened, so
    /// DTR is never released in between.
    pub fn native(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            baud_rate: NATIVE_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::ZERO,
            exclusive: false,
        }
    }

    /// 115200 baud, 8-N-1, no flow control, 1 s timeout
    pub fn link(port_path: &str) -> Self {
        Self::native(port_path)
            .with_baud_rate(LINK_BAUD)
            .with_timeout(LINK_TIMEOUT)
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read/write timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Owned serial port; the OS handle is released when this is dropped
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open a serial connection with the given configuration
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .exclusive(config.exclusive)
            .open()
            .map_err(|e| SendError::DeviceUnavailable {
                path: config.port_path.clone(),
                source: e.into(),
            })?;

        log::debug!(
            "Opened {} at {} baud",
            config.port_path,
            config.baud_rate
        );

        Ok(Self { port, config })
    }
}

impl SerialLink for SerialConnection {
    fn set_dtr(&mut self, level: bool) -> Result<()> {
        self.port
            .write_data_terminal_ready(level)
            .map_err(|e| SendError::link("set DTR", e))?;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| SendError::link("clear input buffer", e))?;
        Ok(())
    }

    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port
            .write_all(data)
            .map_err(|e| SendError::link("write", e))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.port
            .flush()
            .map_err(|e| SendError::link("flush", e))?;
        Ok(())
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        log::debug!("Closed {}", self.config.port_path);
    }
}
