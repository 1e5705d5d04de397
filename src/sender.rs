//! Reset-and-send procedure
//!
//! Boards with a USB-serial bridge wired to the reset pin (Arduino style)
//! reboot when DTR goes low and back high. The procedure pulses DTR, waits
//! for the bootloader to hand over to the firmware, then reopens the port
//! at the link parameters and writes the payload once. Nothing is read back.

use crate::serial::{LinkSettings, PortConfig, SerialBackend, SerialLink};
use anyhow::Result;
use colored::Colorize;
use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Serial device of the target board
pub const DEVICE_PATH: &str = "/dev/ttyUSB0";

/// Time the board needs after the DTR pulse before its firmware listens.
///
/// Covers the bootloader's wait-for-upload window plus firmware setup on
/// the boards this tool targets; shorter values lose the first bytes.
pub const RESET_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Printed when no payload was given
pub const NO_INPUT_NOTICE: &str = "No Input given!";

/// Text to send, captured once from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(String);

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// First argument only; the rest are ignored
    pub fn from_args(args: &[String]) -> Option<Self> {
        args.first().map(|text| Self::new(text.as_str()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a run ended with
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoInput,
    Sent(Payload),
}

/// Pulse DTR on `DEVICE_PATH`, wait, and send `payload` if there is one.
///
/// Console output (one line) goes to `out`. Errors are returned as soon as
/// they happen. The reset connection is held until the very end so DTR stays
/// asserted across the reopen; every open connection is closed on the way out.
pub fn run<B, W>(backend: &mut B, payload: Option<Payload>, out: &mut W) -> Result<Outcome>
where
    B: SerialBackend,
    W: Write,
{
    let _reset_port = reset_board(backend, DEVICE_PATH)?;

    log::debug!("Waiting {:?} for the board to boot", RESET_SETTLE_DELAY);
    backend.pause(RESET_SETTLE_DELAY);

    let Some(payload) = payload else {
        writeln!(out, "{}", NO_INPUT_NOTICE)?;
        return Ok(Outcome::NoInput);
    };

    send(backend, DEVICE_PATH, &payload)?;

    writeln!(out, "{} Sent: {}", "[OK]".green().bold(), payload)?;
    Ok(Outcome::Sent(payload))
}

/// DTR low, drop pending input, DTR high. Returns the still open connection;
/// closing it would drop DTR again.
fn reset_board<B: SerialBackend>(backend: &mut B, port_path: &str) -> Result<B::Link> {
    let mut port = backend.open(&PortConfig::native(port_path))?;

    log::debug!("Pulsing DTR on {}", port_path);
    port.set_dtr(false)?;
    port.clear_input()?;
    port.set_dtr(true)?;

    Ok(port)
}

fn send<B: SerialBackend>(backend: &mut B, port_path: &str, payload: &Payload) -> Result<()> {
    let config = PortConfig::link(port_path);
    log::debug!("Link settings:\n{}", LinkSettings::from(&config).to_toml());

    let mut link = backend.open(&config)?;
    link.write_all(payload.as_bytes())?;
    link.flush()?;
    link.close();

    log::debug!("Wrote {} bytes to {}", payload.as_bytes().len(), port_path);
    Ok(())
}
