//! Main logger implementation

use super::{
    buffer::{Buffer, BufferKind, LockedQueue},
    error::{panic_message, LoggerError, Result},
    flusher::{Flusher, DEFAULT_FLUSH_INTERVAL},
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    record::{Origin, Record},
    severity::Severity,
    sink::Sink,
    timer::ScopedTimer,
};
use crate::sinks::ConsoleSink;
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// When stored records reach the sinks. Fixed for a logger's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Every `store` drains the buffer before returning.
    #[default]
    Synchronous,
    /// Records wait in the buffer until [`Logger::flush`] runs, either
    /// called directly or from a [`Flusher`].
    Asynchronous,
}

/// Buffers records from any number of threads and delivers them to its sinks.
///
/// Draining is serialised: the sink lock is held for the whole drain, so at
/// most one thread consumes the buffer at a time even when the owner and a
/// [`Flusher`] both call [`flush`](Logger::flush). Sinks must not log
/// through the logger that owns them.
pub struct Logger {
    mode: DeliveryMode,
    buffer: Box<dyn Buffer>,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    /// Metrics for observability (dropped count, total delivered, etc.)
    metrics: LoggerMetrics,
    /// Policy for handling a full buffer
    overflow_policy: OverflowPolicy,
    /// Optional callback for overflow notifications
    on_overflow: Option<OverflowCallback>,
}

impl Logger {
    /// Create a logger over an unbounded locked queue.
    #[must_use]
    pub fn new(mode: DeliveryMode) -> Self {
        Self::with_buffer(mode, Box::new(LockedQueue::new()))
    }

    #[must_use]
    pub fn synchronous() -> Self {
        Self::new(DeliveryMode::Synchronous)
    }

    #[must_use]
    pub fn asynchronous() -> Self {
        Self::new(DeliveryMode::Asynchronous)
    }

    /// Create a logger over a lock-free ring of `capacity` records.
    pub fn with_ring(mode: DeliveryMode, capacity: usize) -> Result<Self> {
        Ok(Self::with_buffer(mode, BufferKind::Ring(capacity).build()?))
    }

    /// Create a logger over any [`Buffer`] implementation.
    pub fn with_buffer(mode: DeliveryMode, buffer: Box<dyn Buffer>) -> Self {
        Self {
            mode,
            buffer,
            sinks: Mutex::new(Vec::new()),
            metrics: LoggerMetrics::new(),
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
        }
    }

    /// An asynchronous logger printing to a colored console, flushed every
    /// [`DEFAULT_FLUSH_INTERVAL`] by the returned [`Flusher`].
    ///
    /// The caller owns both handles; dropping the flusher stops periodic
    /// delivery, dropping the logger performs a final flush.
    pub fn console_default() -> Result<(Arc<Logger>, Flusher)> {
        let logger = Arc::new(
            Logger::builder()
                .asynchronous()
                .sink(ConsoleSink::colored())
                .build()?,
        );
        let mut flusher = Flusher::new(&logger);
        flusher.start(DEFAULT_FLUSH_INTERVAL)?;
        Ok((logger, flusher))
    }

    #[inline]
    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    #[inline]
    pub fn is_async(&self) -> bool {
        self.mode == DeliveryMode::Asynchronous
    }

    /// Capacity of the underlying buffer, `None` when unbounded.
    pub fn buffer_capacity(&self) -> Option<usize> {
        self.buffer.capacity()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    /// Append a sink. It receives records from the next flush on.
    pub fn connect_sink(&self, sink: Box<dyn Sink>) {
        self.sinks.lock().push(sink);
    }

    /// Hand a record to the buffer.
    ///
    /// Returns `false` when the buffer rejected the record and the overflow
    /// policy dropped it. In synchronous mode the buffer is drained before
    /// this returns.
    pub fn store(&self, record: Record) -> bool {
        let accepted = match self.buffer.push(record) {
            Ok(()) => true,
            Err(record) => self.handle_overflow(record),
        };

        if self.mode == DeliveryMode::Synchronous {
            self.flush();
        }

        accepted
    }

    /// Like [`store`](Logger::store), but reports a dropped record as
    /// [`LoggerError::BufferFull`].
    ///
    /// # Example
    ///
    /// ```
    /// use sluice::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .asynchronous()
    ///     .ring_buffer(2)
    ///     .overflow_policy(OverflowPolicy::DropNewest)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(logger.try_store(Record::new(Severity::Info, "a")).is_ok());
    /// assert!(logger.try_store(Record::new(Severity::Info, "b")).is_ok());
    /// assert!(matches!(
    ///     logger.try_store(Record::new(Severity::Info, "c")),
    ///     Err(LoggerError::BufferFull { capacity: 2 })
    /// ));
    /// ```
    pub fn try_store(&self, record: Record) -> Result<()> {
        if self.store(record) {
            Ok(())
        } else {
            Err(LoggerError::buffer_full(
                self.buffer.capacity().unwrap_or_default(),
            ))
        }
    }

    /// Handle a record rejected by a bounded buffer
    fn handle_overflow(&self, record: Record) -> bool {
        self.metrics.record_buffer_full();

        match self.overflow_policy {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
                false
            }

            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                false
            }

            OverflowPolicy::FlushAndRetry => {
                self.flush();
                match self.buffer.push(record) {
                    Ok(()) => true,
                    Err(_) => {
                        self.alert_and_drop();
                        false
                    }
                }
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        if dropped_count == 0 || (dropped_count + 1) % 1000 == 0 {
            eprintln!(
                "[sluice WARNING] Buffer full ({}), {} records dropped. \
                 Consider a larger ring, a shorter flush interval or an unbounded buffer.",
                self.buffer.name(),
                dropped_count + 1
            );

            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Drain the buffer into the sinks.
    ///
    /// Each record is presented to every sink in connection order; sinks
    /// whose valve rejects it are skipped. A failing or panicking sink does
    /// not keep the record from the others. Returns the number of records
    /// drained.
    pub fn flush(&self) -> usize {
        let mut sinks = self.sinks.lock();
        let metrics = &self.metrics;

        let drained = self
            .buffer
            .drain(&mut |record| Self::deliver(&mut sinks, &record, metrics));

        if drained > 0 {
            Self::flush_sinks(&mut sinks, metrics);
        }
        metrics.record_flush();

        drained
    }

    /// Present one record to every sink with per-sink panic isolation
    fn deliver(sinks: &mut [Box<dyn Sink>], record: &Record, metrics: &LoggerMetrics) {
        for (idx, sink) in sinks.iter_mut().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| {
                if sink.accepts(record) {
                    sink.output(record)
                } else {
                    Ok(())
                }
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_sink_error();
                    eprintln!("[sluice ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                }
                Err(payload) => {
                    metrics.record_sink_error();
                    eprintln!(
                        "[sluice CRITICAL] Sink #{} ({}) panicked: {}. \
                         Other sinks continue to function.",
                        idx,
                        sink.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        metrics.record_delivered();
    }

    fn flush_sinks(sinks: &mut [Box<dyn Sink>], metrics: &LoggerMetrics) {
        for (idx, sink) in sinks.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_sink_error();
                    eprintln!("[sluice ERROR] Sink #{} ({}) flush failed: {}", idx, sink.name(), e);
                }
                Err(payload) => {
                    metrics.record_sink_error();
                    eprintln!(
                        "[sluice CRITICAL] Sink #{} ({}) panicked during flush: {}",
                        idx,
                        sink.name(),
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    /// Number of records lost to a full buffer
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use sluice::{DeliveryMode, Logger};
    ///
    /// let logger = Logger::with_ring(DeliveryMode::Asynchronous, 1024).unwrap();
    /// logger.info("hello");
    /// logger.flush();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_delivered(), 1);
    /// assert_eq!(metrics.drop_rate(), 0.0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn log(&self, severity: Severity, message: impl AsRef<str>) {
        self.store(Record::new(severity, message));
    }

    /// Log with call-site information, see the [`origin!`](crate::origin) macro.
    pub fn log_at(&self, origin: Origin, severity: Severity, message: impl AsRef<str>) {
        self.store(Record::new(severity, message).with_origin(origin));
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    pub fn alert(&self, message: impl AsRef<str>) {
        self.log(Severity::Alert, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(Severity::Critical, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(Severity::Warn, message);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.log(Severity::Trace, message);
    }

    /// Time the enclosing scope at [`Severity::Debug`].
    pub fn timer(&self, title: impl Into<String>) -> ScopedTimer<'_> {
        ScopedTimer::new(self, title, Severity::Debug)
    }

    pub fn timer_at(&self, title: impl Into<String>, severity: Severity) -> ScopedTimer<'_> {
        ScopedTimer::new(self, title, severity)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::synchronous()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("mode", &self.mode)
            .field("buffer", &self.buffer.name())
            .field("capacity", &self.buffer.capacity())
            .field("overflow_policy", &self.overflow_policy)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Final drain so nothing still buffered is lost
        self.flush();

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[sluice WARNING] Logger shutting down with {} dropped records (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use sluice::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .asynchronous()
///     .ring_buffer(1024)
///     .sink(ConsoleSink::new().with_valve(valve::exclude_trace))
///     .overflow_policy(OverflowPolicy::AlertAndDrop)
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} records dropped", count);
///     }))
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    mode: DeliveryMode,
    buffer: BufferKind,
    sinks: Vec<Box<dyn Sink>>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
}

impl LoggerBuilder {
    /// Create a new builder: synchronous, unbounded, no sinks
    pub fn new() -> Self {
        Self {
            mode: DeliveryMode::default(),
            buffer: BufferKind::default(),
            sinks: Vec::new(),
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn synchronous(self) -> Self {
        self.mode(DeliveryMode::Synchronous)
    }

    #[must_use = "builder methods return a new value"]
    pub fn asynchronous(self) -> Self {
        self.mode(DeliveryMode::Asynchronous)
    }

    /// Use a lock-free ring of `capacity` records (a power of two).
    #[must_use = "builder methods return a new value"]
    pub fn ring_buffer(mut self, capacity: usize) -> Self {
        self.buffer = BufferKind::Ring(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn unbounded_buffer(mut self) -> Self {
        self.buffer = BufferKind::Unbounded;
        self
    }

    /// Connect a sink; sinks receive records in the order they are added
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Set the policy applied when a bounded buffer is full
    ///
    /// Default is `AlertAndDrop`. Has no effect with an unbounded buffer.
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The callback is invoked when records are dropped by `AlertAndDrop`
    /// or a failed `FlushAndRetry`. The parameter is the total count of
    /// dropped records.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Build the Logger, failing on an invalid ring capacity
    pub fn build(self) -> Result<Logger> {
        let mut logger = Logger::with_buffer(self.mode, self.buffer.build()?);
        logger.overflow_policy = self.overflow_policy;
        logger.on_overflow = self.on_overflow;

        for sink in self.sinks {
            logger.connect_sink(sink);
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
