//! Human-readable summary of a port configuration
//!
//! Used for the debug dump of the effective link parameters.

use crate::serial::port::PortConfig;
use serde::Serialize;
use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Serial port settings in plain terms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSettings {
    pub port: String,
    pub baud_rate: u32,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
    /// Parity ("none", "even", "odd")
    pub parity: String,
    pub xonxoff: bool,
    pub rtscts: bool,
    pub timeout_ms: u64,
}

impl From<&PortConfig> for LinkSettings {
    fn from(config: &PortConfig) -> Self {
        let data_bits = match config.data_bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let stop_bits = match config.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        let parity = match config.parity {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
        };

        Self {
            port: config.port_path.clone(),
            baud_rate: config.baud_rate,
            data_bits,
            stop_bits,
            parity: parity.to_string(),
            xonxoff: config.flow_control == FlowControl::Software,
            rtscts: config.flow_control == FlowControl::Hardware,
            timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl LinkSettings {
    /// Render as TOML for logging
    pub fn to_toml(&self) -> String {
        toml::to_string(self).unwrap_or_else(|e| format!("<unrenderable settings: {}>", e))
    }
}
