//! Board bring-up diagnostics
//!
//! Host-side companions for board bring-up:
//!
//! - **Pattern Verifier**: regenerates the deterministic test pattern the
//!   firmware hashes, computes its SHA-256 both in one shot and in 64KB
//!   chunks, and emits the expected digest as a C snippet.
//! - **Serial Echo**: opens the board's console UART and echoes whatever it
//!   prints for a fixed window (device access requires the `serial` feature).
//!
//! # Usage
//!
//! ```bash
//! # Print the expected digest and firmware snippet
//! sha256-pattern
//!
//! # Echo the board console for 10 seconds
//! cargo run --features serial --bin serial-echo
//! ```

pub mod pattern;
pub mod serial;

/// Initialize `env_logger` for a binary; `verbose` raises the default filter.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
