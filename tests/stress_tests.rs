//! Stress tests for concurrent producers and draining
//!
//! These tests verify:
//! - No record is lost or duplicated under contention when the ring has room
//! - Overflow accounting stays exact when producers outrun the consumer
//! - Owner flushes and a background flusher never consume concurrently
//! - Thread safety of the unbounded queue under high volume

use parking_lot::Mutex;
use sluice::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const PRODUCERS: usize = 8;
const PER_PRODUCER: usize = 10_000;

fn producer_sink(seen: &Arc<Mutex<Vec<(usize, usize)>>>) -> CallbackSink {
    let seen = Arc::clone(seen);
    CallbackSink::new(move |_, record| {
        if let Some((p, seq)) = record.message.split_once(':') {
            if let (Ok(p), Ok(seq)) = (p.parse(), seq.parse()) {
                seen.lock().push((p, seq));
            }
        }
    })
}

fn assert_per_producer_fifo(seen: &[(usize, usize)], producers: usize, per_producer: usize) {
    let mut next = vec![0usize; producers];
    for &(p, seq) in seen {
        assert_eq!(seq, next[p], "producer {} out of order", p);
        next[p] += 1;
    }
    assert!(next.iter().all(|&n| n == per_producer), "missing records: {:?}", next);
}

/// Concurrent producers with a ring large enough for everything
#[test]
fn test_ring_logger_no_loss_with_room() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let logger = Arc::new(
        Logger::builder()
            .asynchronous()
            .ring_buffer((PRODUCERS * PER_PRODUCER).next_power_of_two())
            .overflow_policy(OverflowPolicy::DropNewest)
            .sink(producer_sink(&seen))
            .build()
            .unwrap(),
    );
    let barrier = Arc::new(Barrier::new(PRODUCERS));

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for seq in 0..PER_PRODUCER {
                    assert!(logger.store(Record::new(Severity::Debug, format!("{}:{}", p, seq))));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }

    assert_eq!(logger.flush(), PRODUCERS * PER_PRODUCER);
    assert_eq!(logger.dropped_count(), 0);
    assert_per_producer_fifo(&seen.lock(), PRODUCERS, PER_PRODUCER);
}

/// Producers outrun a small ring; every record is either delivered or counted as dropped
#[test]
fn test_ring_logger_overflow_accounting() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&delivered);
    let logger = Arc::new(
        Logger::builder()
            .asynchronous()
            .ring_buffer(64)
            .overflow_policy(OverflowPolicy::DropNewest)
            .sink(CallbackSink::new(move |_, _| {
                counted.fetch_add(1, Ordering::Relaxed);
            }))
            .build()
            .unwrap(),
    );
    let accepted = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(AtomicBool::new(false));

    let consumer = {
        let logger = Arc::clone(&logger);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                logger.flush();
                thread::yield_now();
            }
        })
    };

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let logger = Arc::clone(&logger);
            let accepted = Arc::clone(&accepted);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    if logger.store(Record::new(Severity::Trace, format!("{}:{}", p, seq))) {
                        accepted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }
    done.store(true, Ordering::Release);
    consumer.join().expect("consumer panicked");
    logger.flush();

    let accepted = accepted.load(Ordering::Relaxed);
    assert_eq!(delivered.load(Ordering::Relaxed), accepted);
    assert_eq!(
        accepted + logger.dropped_count() as usize,
        PRODUCERS * PER_PRODUCER
    );
    assert_eq!(
        logger.metrics().buffer_full_events(),
        logger.dropped_count()
    );
}

/// Several threads flushing while producers store: each record delivered once
#[test]
fn test_competing_flushers_deliver_exactly_once() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let logger = Arc::new(
        Logger::builder()
            .asynchronous()
            .ring_buffer(4096)
            .overflow_policy(OverflowPolicy::FlushAndRetry)
            .sink(producer_sink(&seen))
            .build()
            .unwrap(),
    );

    let mut flushers: Vec<Flusher> = (0..3)
        .map(|_| {
            let mut flusher = Flusher::new(&logger);
            flusher.start(Duration::from_millis(1)).unwrap();
            flusher
        })
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|p| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for seq in 0..5_000 {
                    logger.info(format!("{}:{}", p, seq));
                    if seq % 500 == 0 {
                        logger.flush();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }
    for flusher in &mut flushers {
        flusher.stop();
    }
    logger.flush();

    let seen = seen.lock();
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), seen.len(), "duplicate delivery");
    assert_eq!(logger.dropped_count(), 0);
    assert_per_producer_fifo(&seen, 4, 5_000);
}

/// The unbounded queue never drops, whatever the volume
#[test]
fn test_unbounded_queue_under_load() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let logger = Arc::new(
        Logger::builder()
            .asynchronous()
            .unbounded_buffer()
            .sink(producer_sink(&seen))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    assert!(logger.store(Record::new(Severity::Warn, format!("{}:{}", p, seq))));
                    if seq % 1_000 == 999 {
                        logger.flush();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }
    logger.flush();

    assert_eq!(logger.dropped_count(), 0);
    assert_eq!(
        logger.metrics().total_delivered(),
        (PRODUCERS * PER_PRODUCER) as u64
    );
    assert_per_producer_fifo(&seen.lock(), PRODUCERS, PER_PRODUCER);
}

/// Synchronous delivery from many threads into a file
#[test]
fn test_sync_file_logging_from_many_threads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("sync_stress.log");

    let logger = Arc::new(
        Logger::builder()
            .synchronous()
            .ring_buffer(256)
            .sink(FileSink::new(&log_file).expect("Failed to create sink"))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..1_000 {
                    logger.error(format!("thread {} line {}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer panicked");
    }
    drop(logger);

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 4_000);
    for t in 0..4 {
        assert!(content.contains(&format!("thread {} line 999", t)));
    }
}
