//! Serial console echo
//!
//! Opens the board console at /dev/ttyUSB0 (115200 8N1) and copies whatever
//! arrives to stdout for 10 seconds.

use anyhow::{Context, Result};
use board_diag::serial::{EchoConfig, EchoSession, MonotonicClock, SerialConnection};
use clap::Parser;
use colored::Colorize;
use std::io;
use std::process::ExitCode;

/// Serial console echo
#[derive(Parser)]
#[command(name = "serial-echo")]
#[command(version)]
#[command(about = "Echo the board's serial console to stdout for a fixed window")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    board_diag::init_logging(cli.verbose);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let session = EchoSession::new(EchoConfig::default())?;
    let config = session.config();

    let mut conn = SerialConnection::open(config)
        .with_context(|| format!("Cannot start echo on {}", config.device_path))?;
    println!("Connected to {}", config.device_path);

    let clock = MonotonicClock::start();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = session.run(&mut conn, &mut out, &clock);

    conn.close();
    log::info!(
        "echoed {} bytes in {} lines ({} suppressed errors)",
        summary.bytes,
        summary.lines,
        summary.errors
    );

    Ok(())
}
