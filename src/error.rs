//! Error types for device access
//!
//! Everything is fail-fast: these errors are propagated to `main` and end
//! the process. Nothing here is retried.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    /// The serial device could not be opened (missing, busy, or no permission)
    #[error("serial device {path} is unavailable")]
    DeviceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A serial primitive failed on an already open device
    #[error("failed to {action} on serial device")]
    Link {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl SendError {
    pub fn link(action: &'static str, source: impl Into<io::Error>) -> Self {
        SendError::Link {
            action,
            source: source.into(),
        }
    }

    /// Troubleshooting hint for the console, if the error kind has one
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SendError::DeviceUnavailable { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Add your user to the 'dialout' group: sudo usermod -aG dialout $USER")
                }
                io::ErrorKind::NotFound => {
                    Some("Check the board is connected: ls -la /dev/ttyUSB* /dev/ttyACM*")
                }
                _ => Some("Make sure no other program (serial monitor, IDE) holds the port"),
            },
            SendError::Link { .. } => None,
        }
    }
}
