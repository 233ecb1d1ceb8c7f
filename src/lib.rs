//! # Sluice
//!
//! A low-overhead, in-process logging core.
//!
//! Application threads store [`Record`]s into a [`Logger`]; the logger keeps
//! them in a [`Buffer`] and delivers them to its [`Sink`]s either inline
//! ([`DeliveryMode::Synchronous`]) or on demand
//! ([`DeliveryMode::Asynchronous`]), typically driven by a background
//! [`Flusher`].
//!
//! ## Features
//!
//! - **Lock-free ring**: bounded multi-producer single-consumer queue; producers never take a lock
//! - **Unbounded queue**: mutex-protected, never drops a record
//! - **Valves and formatters**: every sink filters and renders records on its own
//! - **Explicit ownership**: no global logger; handles are `Arc<Logger>` values you pass around
//!
//! ## Example
//!
//! ```
//! use sluice::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let logger = Arc::new(
//!     Logger::builder()
//!         .asynchronous()
//!         .ring_buffer(1024)
//!         .sink(ConsoleSink::colored().with_valve(valve::exclude_trace))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut flusher = Flusher::new(&logger);
//! flusher.start(Duration::from_millis(200)).unwrap();
//!
//! logger.info("service ready");
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub use crate::core::{formatter, valve};

pub mod prelude {
    pub use crate::core::{formatter, valve};
    pub use crate::core::{
        Buffer, BufferKind, DeliveryMode, Flusher, FlusherState, Formatter, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, MpscRing, Origin, OverflowCallback,
        OverflowPolicy, Record, Result, ScopedTimer, Severity, Sink, Valve,
        DEFAULT_FLUSH_INTERVAL,
    };
    pub use crate::sinks::{CallbackSink, ConsoleSink, FileSink};
}

pub use crate::core::{
    Buffer, BufferKind, Consumer, DeliveryMode, Flusher, FlusherState, Formatter, LockedQueue,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, MpscRing, Origin, OverflowCallback,
    OverflowPolicy, Record, Result, RingBuffer, ScopedTimer, Severity, Sink, Valve,
    DEFAULT_FLUSH_INTERVAL,
};
pub use sinks::{CallbackSink, ConsoleSink, FileSink};
