//! File sink implementation

use crate::core::{
    formatter::{self, render},
    valve, Formatter, LoggerError, Record, Result, Sink, Valve,
};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Appends one formatted line per record to a file.
///
/// Output is buffered; it reaches the file on every logger flush and is
/// synced to disk when the sink is dropped.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    valve: Valve,
    formatter: Formatter,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            valve: Arc::new(valve::always_open),
            formatter: Arc::new(formatter::full),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn with_valve(mut self, valve: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.valve = Arc::new(valve);
        self
    }

    /// Replace the formatter
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sluice::sinks::FileSink;
    /// use sluice::formatter;
    ///
    /// let sink = FileSink::new("/var/log/app.jsonl")
    ///     .unwrap()
    ///     .with_formatter(formatter::json);
    /// ```
    #[must_use]
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&Record) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }
}

impl Sink for FileSink {
    fn accepts(&self, record: &Record) -> bool {
        (self.valve)(record)
    }

    fn output(&mut self, record: &Record) -> Result<()> {
        let line = render(&self.formatter, record)?;
        writeln!(self.writer, "{}", line)
            .map_err(|e| LoggerError::file_sink(self.path.display().to_string(), e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the disk
        if self.writer.flush().is_ok() {
            let _ = self.writer.get_ref().sync_all();
        }
    }
}
