//! Formatters render a record into one line of text
//!
//! Built-in layouts:
//!
//! - [`full`]: everything, intended for files
//! - [`console`]: time, level and origin, intended for a developer terminal
//! - [`simple`]: date, level and message, intended for release consoles
//! - [`json`]: one JSON object per line

use super::{
    error::{panic_message, LoggerError, Result},
    record::Record,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub type Formatter = Arc<dyn Fn(&Record) -> String + Send + Sync>;

fn origin_parts(record: &Record) -> (&str, String, &str) {
    match &record.origin {
        Some(origin) => (origin.file_name(), origin.line.to_string(), origin.function),
        None => ("-", "-".to_string(), "-"),
    }
}

pub fn full(record: &Record) -> String {
    let (file, line, function) = origin_parts(record);
    let pid = record
        .process_id
        .map(|pid| pid.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}] [{}] [process {:>8}] [thread {:>12}] [{:>24}:{:<4}({:>24})] | {}",
        record.timestamp.format("%F %T%.3f"),
        record.severity.label(),
        pid,
        record.thread_label(),
        file,
        line,
        function,
        record.message
    )
}

pub fn console(record: &Record) -> String {
    let (file, line, function) = origin_parts(record);
    format!(
        "[{}] [{}] [{:>24}: {:<4}({:>24})] | {}",
        record.timestamp.format("%T%.3f"),
        record.severity.label(),
        file,
        line,
        function,
        record.message
    )
}

pub fn simple(record: &Record) -> String {
    format!(
        "[{}] [{}] | {}",
        record.timestamp.format("%F %T"),
        record.severity.label(),
        record.message
    )
}

/// One JSON object, falling back to [`simple`] if serialization fails.
pub fn json(record: &Record) -> String {
    try_json(record).unwrap_or_else(|_| simple(record))
}

pub fn try_json(record: &Record) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Run `formatter`, turning a panic into a [`LoggerError::FormatterError`].
pub fn render(formatter: &Formatter, record: &Record) -> Result<String> {
    catch_unwind(AssertUnwindSafe(|| formatter(record)))
        .map_err(|payload| LoggerError::formatter("custom", panic_message(payload.as_ref())))
}
