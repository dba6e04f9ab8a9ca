//! Serial console echo for board bring-up
//!
//! This module provides:
//! - The fixed echo session settings ([`EchoConfig`])
//! - A time-bounded echo loop over any [`LineSource`]
//! - A `serialport`-backed source (requires the `serial` feature)

pub mod config;
pub mod echo;
#[cfg(feature = "serial")]
pub mod port;

pub use config::EchoConfig;
pub use echo::{decode_ignoring_invalid, Clock, EchoSession, EchoSummary, MonotonicClock};
#[cfg(feature = "serial")]
pub use port::SerialConnection;

use thiserror::Error;

/// Source of raw console lines.
///
/// `read_line` blocks for at most one read timeout and returns the bytes
/// received, including the trailing `\n` if one arrived. An empty vector
/// means nothing arrived before the timeout.
pub trait LineSource {
    fn read_line(&mut self) -> anyhow::Result<Vec<u8>>;
}

/// Errors that end an echo session before it starts
#[derive(Debug, Error)]
pub enum EchoError {
    #[error("invalid echo configuration: {0}")]
    InvalidConfig(&'static str),

    #[cfg(feature = "serial")]
    #[error("failed to open serial port {path}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
}
