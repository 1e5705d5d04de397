//! Serial port plumbing
//!
//! This module provides:
//! - The fixed port configurations for resetting and for sending
//! - An owning connection wrapper around `serialport`
//! - The backend seam used by the send procedure

pub mod backend;
#[cfg(test)]
pub mod fake;
pub mod port;
pub mod settings;

pub use backend::{SerialBackend, SerialLink, SystemBackend};
pub use port::PortConfig;
pub use settings::LinkSettings;
