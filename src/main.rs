//! fieldhist - per-field input history merged into suggestion lists
//!
//! This is the main entry point for the fieldhist command-line application.
//! It initializes logging and handles errors gracefully.

use fieldhist::cli;
use fieldhist::error::Result;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // Initialize tracing based on RUST_LOG environment variable
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_default();

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    cli::run()
}
