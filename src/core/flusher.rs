//! Periodic background flushing for asynchronous loggers
//!
//! A [`Flusher`] owns one background thread that wakes every interval and
//! drains its logger. It only holds a [`Weak`] reference, so it never keeps a
//! logger alive: once the last [`Arc<Logger>`] is gone the thread notices on
//! its next wake-up and exits on its own.
//!
//! # Example
//!
//! ```
//! use sluice::{Flusher, Logger};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let logger = Arc::new(Logger::asynchronous());
//! let mut flusher = Flusher::new(&logger);
//! flusher.start(Duration::from_millis(100)).unwrap();
//!
//! logger.info("delivered by the flusher thread");
//!
//! flusher.stop();
//! assert!(!flusher.is_running());
//! ```

use super::{
    error::{LoggerError, Result},
    logger::Logger,
};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Interval used by [`Logger::console_default`].
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlusherState {
    /// Constructed, never started
    Inert,
    /// Background thread active
    Running,
    /// Stopped explicitly, or exited because the logger went away
    Stopped,
}

pub struct Flusher {
    logger: Weak<Logger>,
    /// Dropping the sender wakes the background thread and ends it.
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    started: bool,
}

impl Flusher {
    /// Attach to an asynchronous logger.
    ///
    /// Attaching to a synchronous logger is a programming error: it panics
    /// in debug builds and the flusher never starts in release builds.
    pub fn new(logger: &Arc<Logger>) -> Self {
        debug_assert!(
            logger.is_async(),
            "Flusher requires a logger in asynchronous mode"
        );

        Self {
            logger: Arc::downgrade(logger),
            stop_tx: None,
            handle: None,
            started: false,
        }
    }

    pub fn state(&self) -> FlusherState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => FlusherState::Running,
            _ if self.started => FlusherState::Stopped,
            _ => FlusherState::Inert,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == FlusherState::Running
    }

    /// Spawn the background thread, flushing every `interval`.
    ///
    /// Starting an already running flusher is a programming error: it panics
    /// in debug builds and is ignored in release builds. A stopped flusher
    /// may be started again.
    pub fn start(&mut self, interval: Duration) -> Result<()> {
        debug_assert!(!self.is_running(), "Flusher already started");
        if self.is_running() {
            return Ok(());
        }

        // Reap a thread that exited on its own
        self.stop();

        let Some(logger) = self.logger.upgrade() else {
            return Err(LoggerError::other("cannot start flusher: logger already dropped"));
        };
        if !logger.is_async() {
            eprintln!("[sluice ERROR] Flusher attached to a synchronous logger, not starting");
            return Ok(());
        }
        logger.debug(format!("[sluice] start periodic flushing every {:?}", interval));
        drop(logger);

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let weak = Weak::clone(&self.logger);

        let handle = thread::Builder::new()
            .name("sluice-flusher".to_string())
            .spawn(move || Self::run(weak, stop_rx, interval))
            .map_err(|e| {
                LoggerError::io_operation("spawning flusher thread", "thread creation failed", e)
            })?;

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        self.started = true;
        Ok(())
    }

    fn run(logger: Weak<Logger>, stop_rx: Receiver<()>, interval: Duration) {
        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            // The strong reference lives only for this flush; if the owner
            // drops its handle meanwhile, the final flush runs here.
            match logger.upgrade() {
                Some(logger) => {
                    logger.flush();
                }
                None => break,
            }
        }
    }

    /// Signal the background thread and wait for it to exit.
    ///
    /// No flush performed by this flusher happens after `stop` returns.
    pub fn stop(&mut self) {
        drop(self.stop_tx.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                eprintln!("[sluice ERROR] Flusher thread panicked");
            }
        }
    }
}

impl Drop for Flusher {
    fn drop(&mut self) {
        self.stop();
    }
}
