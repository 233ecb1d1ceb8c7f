//! Core logger types and traits

pub mod buffer;
pub mod error;
pub mod flusher;
pub mod formatter;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod record;
pub mod ring;
pub mod severity;
pub mod sink;
pub mod timer;
pub mod valve;

pub use buffer::{Buffer, BufferKind, LockedQueue, RingBuffer};
pub use error::{LoggerError, Result};
pub use flusher::{Flusher, FlusherState, DEFAULT_FLUSH_INTERVAL};
pub use formatter::Formatter;
pub use logger::{DeliveryMode, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use record::{Origin, Record};
pub use ring::{Consumer, MpscRing};
pub use severity::Severity;
pub use sink::Sink;
pub use timer::ScopedTimer;
pub use valve::Valve;
