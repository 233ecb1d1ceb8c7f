//! Async logging example
//!
//! Demonstrates multi-threaded producers on a lock-free ring drained by a background flusher.
//!
//! Run with: cargo run --example async_logging

use sluice::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Sluice - Async Logging Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .asynchronous()
            .ring_buffer(1024)
            .overflow_policy(OverflowPolicy::AlertAndDrop)
            .on_overflow(Arc::new(|count| eprintln!("ALERT: {} records dropped", count)))
            .sink(ConsoleSink::colored().with_valve(valve::exclude_trace))
            .sink(FileSink::new("async_test.log")?)
            .build()?,
    );

    let mut flusher = Flusher::new(&logger);
    flusher.start(Duration::from_millis(50))?;

    println!("1. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    logger.info(format!("Thread {} - Message {}", thread_id, i));
                    thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }

    flusher.stop();
    logger.flush();

    let metrics = logger.metrics();
    println!(
        "\n2. Delivered {} records, dropped {} ({:.2}%)",
        metrics.total_delivered(),
        metrics.dropped_count(),
        metrics.drop_rate()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");
    Ok(())
}
