//! Basic logger usage example
//!
//! Demonstrates synchronous logging to a colored console across every severity.
//!
//! Run with: cargo run --example basic_usage

use sluice::prelude::*;
use sluice::{critical, debug, info, time_scope};

fn main() -> Result<()> {
    println!("=== Sluice - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .synchronous()
        .sink(ConsoleSink::colored())
        .build()?;

    println!("1. One record per severity:");
    for severity in Severity::ALL {
        logger.log(severity, format!("This is a {} record", severity));
    }

    println!("\n2. Macros with formatting and call sites:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    debug!(logger, "Configuration loaded from {}", "sluice.toml");
    critical!(logger, "Invariant broken: {} > {}", 3, 2);

    println!("\n3. Timing a scope:");
    {
        time_scope!(logger, "warm cache", Severity::Info);
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
