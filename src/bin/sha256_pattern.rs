//! SHA-256 test pattern verifier
//!
//! Regenerates the 400KB bring-up test pattern, hashes it in one shot and
//! in 64KB chunks, and prints the expected digest plus a C snippet for the
//! firmware.
//!
//! Exit status is 0 when both digests agree, 1 on a mismatch or any
//! internal error.

use anyhow::{Context, Result};
use board_diag::pattern::{self, report, Outcome};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::process::ExitCode;

/// SHA-256 test pattern verifier
#[derive(Parser)]
#[command(name = "sha256-pattern")]
#[command(version)]
#[command(about = "Compute the expected SHA-256 of the board bring-up test pattern")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    board_diag::init_logging(cli.verbose);

    match run() {
        Ok(outcome) => {
            if !outcome.is_success() {
                println!("{} Verification failed!", "[FAIL]".red().bold());
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<Outcome> {
    log::debug!(
        "pattern: {} bytes in {} chunks of {}",
        pattern::TEST_DATA_SIZE,
        pattern::NUM_CHUNKS,
        pattern::CHUNK_SIZE
    );

    let verification = pattern::verify().context("Failed to hash test pattern")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_report(&mut out, &verification).context("Failed to write report")?;
    out.flush().context("Failed to flush report")?;

    Ok(verification.outcome())
}
