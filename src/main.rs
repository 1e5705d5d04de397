//! dtr-send
//!
//! Resets a USB-serial board that reboots on a DTR pulse (Arduino style),
//! waits for it to come up, and sends it one string.
//!
//! # Usage
//!
//! ```bash
//! # Reset the board on /dev/ttyUSB0 and send "hello"
//! dtr-send hello
//!
//! # Only reset the board
//! dtr-send
//!
//! # Trace every step
//! RUST_LOG=debug dtr-send hello
//! ```
//!
//! The device path, link parameters and settle delay are fixed.

mod error;
mod sender;
mod serial;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::ffi::OsString;

use error::SendError;
use sender::{Outcome, Payload};
use serial::SystemBackend;

/// Reset an auto-resetting serial board and send it a string
#[derive(Parser, Debug)]
#[command(name = "dtr-send")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Text to send; anything after the first token is ignored
    #[arg(raw = true)]
    args: Vec<String>,
}

impl Cli {
    /// Parse with every token treated as data, `--` included.
    ///
    /// An escape is inserted after the program name, so clap never sees a
    /// user token in option position.
    fn parse_argv<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::<OsString>::into);
        let program = argv.next().unwrap_or_else(|| OsString::from("dtr-send"));

        Self::try_parse_from(
            std::iter::once(program)
                .chain(std::iter::once(OsString::from("--")))
                .chain(argv),
        )
    }

    fn payload(&self) -> Option<Payload> {
        if self.args.len() > 1 {
            log::debug!("Ignoring {} extra argument(s)", self.args.len() - 1);
        }
        Payload::from_args(&self.args)
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_argv(std::env::args_os()).unwrap_or_else(|e| e.exit());

    let mut backend = SystemBackend;
    let mut stdout = std::io::stdout().lock();

    match sender::run(&mut backend, cli.payload(), &mut stdout) {
        Ok(Outcome::Sent(payload)) => {
            log::debug!("Done, {} bytes sent", payload.as_bytes().len());
            Ok(())
        }
        Ok(Outcome::NoInput) => Ok(()),
        Err(e) => {
            if let Some(hint) = e.downcast_ref::<SendError>().and_then(SendError::hint) {
                eprintln!("{} {}", "[HINT]".yellow().bold(), hint);
            }
            Err(e)
        }
    }
}
