//! Console sink implementation

use crate::core::{
    formatter::{self, render},
    valve, Formatter, Record, Result, Sink, Valve,
};
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

/// Writes records to standard output, optionally colored by severity.
///
/// The color is a fixed function of the record's severity (see
/// [`Severity::color`](crate::Severity::color)); it has no influence on the
/// valve.
pub struct ConsoleSink {
    use_colors: bool,
    valve: Valve,
    formatter: Formatter,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: false,
            valve: Arc::new(valve::always_open),
            formatter: Arc::new(formatter::console),
        }
    }

    /// The colored console variant.
    pub fn colored() -> Self {
        Self::new().with_colors(true)
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Replace the valve
    ///
    /// # Example
    ///
    /// ```
    /// use sluice::sinks::ConsoleSink;
    /// use sluice::valve;
    ///
    /// let sink = ConsoleSink::colored().with_valve(valve::release_only);
    /// ```
    #[must_use]
    pub fn with_valve(mut self, valve: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.valve = Arc::new(valve);
        self
    }

    /// Replace the formatter
    ///
    /// # Example
    ///
    /// ```
    /// use sluice::sinks::ConsoleSink;
    /// use sluice::formatter;
    ///
    /// let sink = ConsoleSink::new().with_formatter(formatter::simple);
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

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn accepts(&self, record: &Record) -> bool {
        (self.valve)(record)
    }

    fn output(&mut self, record: &Record) -> Result<()> {
        let line = render(&self.formatter, record)?;
        let mut out = std::io::stdout().lock();

        if self.use_colors {
            writeln!(out, "{}", line.color(record.severity.color()))?;
        } else {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        if self.use_colors {
            "colored_console"
        } else {
            "console"
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;

    #[test]
    fn test_names() {
        assert_eq!(ConsoleSink::new().name(), "console");
        assert_eq!(ConsoleSink::colored().name(), "colored_console");
    }

    #[test]
    fn test_color_does_not_affect_valve() {
        let plain = ConsoleSink::new().with_valve(valve::exclude_trace);
        let colored = ConsoleSink::colored().with_valve(valve::exclude_trace);

        for severity in Severity::ALL {
            let record = Record::new(severity, "x");
            assert_eq!(plain.accepts(&record), colored.accepts(&record));
        }
    }

    #[test]
    fn test_output_succeeds() {
        let mut sink = ConsoleSink::colored().with_formatter(formatter::simple);
        assert!(sink.output(&Record::new(Severity::Alert, "console sink test")).is_ok());
        assert!(sink.flush().is_ok());
    }
}
