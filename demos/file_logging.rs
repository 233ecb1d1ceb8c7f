//! File logging example
//!
//! Demonstrates fan-out to a console and a file, each with its own valve and formatter.
//!
//! Run with: cargo run --example file_logging

use sluice::prelude::*;

fn main() -> Result<()> {
    println!("=== Sluice - File Logging Example ===\n");

    let logger = Logger::builder()
        .synchronous()
        .sink(ConsoleSink::new().with_valve(valve::release_only).with_formatter(formatter::simple))
        .sink(FileSink::new("application.log")?)
        .sink(FileSink::new("application.jsonl")?.with_formatter(formatter::json))
        .build()?;

    println!("1. Release-band records reach every sink:");
    logger.info("Application started");
    logger.alert("Falling back to the default profile");

    println!("\n2. Debug-band records only reach the files:");
    logger.debug("Connection pool size is 8");
    logger.trace("Entering request handler");

    println!("\n3. Embedded newlines are escaped:");
    logger.error("request failed\nretrying");

    drop(logger);

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.jsonl' for file output");
    Ok(())
}
