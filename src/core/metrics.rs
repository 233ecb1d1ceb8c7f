//! Logger metrics for observability
//!
//! Counters for monitoring the health of a [`Logger`](crate::Logger):
//! records lost to a full buffer, records delivered, sink failures and
//! drain passes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use sluice::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_delivered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records lost because the buffer rejected them
    dropped_count: AtomicU64,

    /// Records drained from the buffer and presented to the sinks
    total_delivered: AtomicU64,

    /// Number of times the buffer was found full on push
    buffer_full_events: AtomicU64,

    /// Sink outputs that failed or panicked
    sink_errors: AtomicU64,

    /// Completed drain passes
    flush_count: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_delivered: AtomicU64::new(0),
            buffer_full_events: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_delivered(&self) -> u64 {
        self.total_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn buffer_full_events(&self) -> u64 {
        self.buffer_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    /// Record a dropped record, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.total_delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_buffer_full(&self) -> u64 {
        self.buffer_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flush_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been delivered or dropped yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_delivered() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_delivered.store(0, Ordering::Relaxed);
        self.buffer_full_events.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.flush_count.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dropped_count: AtomicU64::new(self.dropped_count()),
            total_delivered: AtomicU64::new(self.total_delivered()),
            buffer_full_events: AtomicU64::new(self.buffer_full_events()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            flush_count: AtomicU64::new(self.flush_count()),
        }
    }
}
