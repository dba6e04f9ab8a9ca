//! Serial port connection for the echo session
//!
//! Owns the `serialport` handle; dropping the connection releases the
//! device on every exit path.

use super::{EchoConfig, EchoError, LineSource};
use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::time::Instant;

/// Wrapper around an open serial port
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: EchoConfig,
}

impl SerialConnection {
    /// Open the device named in `config` (8N1, no flow control)
    pub fn open(config: &EchoConfig) -> Result<Self, EchoError> {
        config.validate()?;

        let port = serialport::new(&config.device_path, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| EchoError::Open {
                path: config.device_path.clone(),
                source,
            })?;

        log::debug!(
            "opened {} at {} baud (timeout {:?})",
            config.device_path,
            config.baud_rate,
            config.read_timeout
        );

        Ok(Self {
            port,
            config: config.clone(),
        })
    }

    /// Get the port configuration
    pub fn config(&self) -> &EchoConfig {
        &self.config
    }

    /// Close the port
    pub fn close(self) {
        log::debug!("closing {}", self.config.device_path);
        drop(self.port);
    }
}

impl LineSource for SerialConnection {
    /// Read until `\n` (kept in the output) or until the read timeout passes.
    ///
    /// Each byte read waits only for what is left of the timeout, so one
    /// call never blocks longer than `read_timeout`.
    fn read_line(&mut self) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.config.read_timeout;
        let mut buffer = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.port
                .set_timeout(remaining)
                .with_context(|| "Failed to set serial read timeout")?;

            match self.port.read(&mut byte) {
                Ok(1) => {
                    buffer.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Ok(_) => break,
                Err(ref e) if e.kind() == ErrorKind::TimedOut => break,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                // Hand back what already arrived; the error resurfaces on the next read
                Err(_) if !buffer.is_empty() => break,
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to read from serial port: {}", self.config.device_path)
                    })
                }
            }
        }

        Ok(buffer)
    }
}
