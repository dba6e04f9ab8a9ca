//! Echo session settings

use super::EchoError;
use std::time::Duration;

/// Console UART path on the bring-up host
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyUSB0";

/// Board console baud rate
pub const DEFAULT_BAUD: u32 = 115200;

/// Upper bound on a single line read
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// How long the session echoes before closing the port
pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(10);

/// Configuration for an echo session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoConfig {
    /// Serial device path (e.g., /dev/ttyUSB0)
    pub device_path: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Per-read timeout
    pub read_timeout: Duration,
    /// Wall-clock length of the session, measured from connect
    pub session_duration: Duration,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            device_path: String::from(DEFAULT_DEVICE_PATH),
            baud_rate: DEFAULT_BAUD,
            read_timeout: DEFAULT_READ_TIMEOUT,
            session_duration: DEFAULT_SESSION_DURATION,
        }
    }
}

impl EchoConfig {
    /// Create a new configuration for `device_path` with default settings
    pub fn new(device_path: &str) -> Self {
        Self {
            device_path: device_path.to_string(),
            ..Default::default()
        }
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the session duration
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    /// Reject settings that cannot open a port or would busy-spin the read loop
    pub fn validate(&self) -> Result<(), EchoError> {
        if self.device_path.is_empty() {
            return Err(EchoError::InvalidConfig("device path is empty"));
        }
        if self.baud_rate == 0 {
            return Err(EchoError::InvalidConfig("baud rate must be non-zero"));
        }
        if self.read_timeout.is_zero() {
            return Err(EchoError::InvalidConfig("read timeout must be non-zero"));
        }
        Ok(())
    }
}
