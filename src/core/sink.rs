//! Sink trait for log output destinations

use super::{error::Result, record::Record};

/// A delivery target for records.
///
/// The [`Logger`](crate::Logger) presents every drained record to each
/// connected sink, in connection order. The sink only writes the record
/// when [`accepts`](Sink::accepts) returns `true`.
///
/// Implementations must flush any buffered output when dropped.
pub trait Sink: Send + Sync {
    /// The sink's valve. Must be pure and cheap.
    fn accepts(&self, record: &Record) -> bool;

    /// Format and write one record.
    fn output(&mut self, record: &Record) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}
