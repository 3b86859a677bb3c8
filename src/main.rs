//! mongoq - MongoDB shell query translator
//!
//! Reads lines of MongoDB shell syntax and prints each one as a classified,
//! structured query in JSON.
//!
//! # Usage
//!
//! ```bash
//! # Translate arguments
//! mongoq 'db.users.find({ age: { $gt: 18 } })' 'show dbs'
//!
//! # Translate stdin, refusing writes
//! mongoq --read-only < commands.txt
//! ```

use tracing_subscriber::EnvFilter;

use mongoq::cli::CliInterface;
use mongoq::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Translate input lines
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.run()
}

/// Initialize logging system based on verbosity level
///
/// `RUST_LOG` takes precedence over the configured level when set. Logs go
/// to stderr so stdout carries only translated queries.
///
/// # Arguments
/// * `cli` - CLI interface with the effective logging configuration
fn initialize_logging(cli: &CliInterface) {
    let logging = &cli.config().logging;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_directive()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
