//! Scope timing on top of the logger's public API

use super::{logger::Logger, severity::Severity};
use std::time::{Duration, Instant};

/// Emits a record when created and another with the elapsed time when dropped.
///
/// # Example
///
/// ```
/// use sluice::Logger;
///
/// let logger = Logger::asynchronous();
/// {
///     let _timer = logger.timer("load config");
///     // ... timed work ...
/// }
/// assert_eq!(logger.flush(), 2);
/// ```
pub struct ScopedTimer<'a> {
    logger: &'a Logger,
    title: String,
    severity: Severity,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(logger: &'a Logger, title: impl Into<String>, severity: Severity) -> Self {
        let title = title.into();
        logger.log(severity, format!("[{}] start", title));

        Self {
            logger,
            title,
            severity,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        self.logger.log(
            self.severity,
            format!(
                "[{}] finished in {:.3} ms",
                self.title,
                elapsed.as_secs_f64() * 1000.0
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::CallbackSink;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_emits_start_and_end() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let logger = Logger::builder()
            .sink(CallbackSink::new(move |_, record| {
                sink_seen.lock().push((record.severity, record.message.clone()))
            }))
            .build()
            .unwrap();

        {
            let _timer = logger.timer_at("handshake", Severity::Info);
            std::thread::sleep(Duration::from_millis(2));
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (Severity::Info, "[handshake] start".to_string()));
        assert_eq!(seen[1].0, Severity::Info);
        assert!(seen[1].1.starts_with("[handshake] finished in "));
        assert!(seen[1].1.ends_with(" ms"));
    }

    #[test]
    fn test_default_severity_is_debug() {
        let logger = Logger::asynchronous();
        let timer = logger.timer("x");
        assert_eq!(timer.severity, Severity::Debug);
    }
}
