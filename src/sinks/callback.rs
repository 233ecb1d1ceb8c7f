//! Callback sink: the extension point for custom destinations

use crate::core::{
    formatter::{self, render},
    valve, Formatter, Record, Result, Sink, Valve,
};
use std::sync::Arc;

type OutputFn = Box<dyn FnMut(&str, &Record) + Send + Sync>;

/// Hands every accepted record, already formatted, to a closure.
///
/// # Example
///
/// ```
/// use sluice::sinks::CallbackSink;
/// use sluice::Logger;
/// use std::sync::{Arc, Mutex};
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let captured = Arc::clone(&lines);
///
/// let logger = Logger::builder()
///     .sink(CallbackSink::new(move |line, _record| {
///         captured.lock().unwrap().push(line.to_string());
///     }))
///     .build()
///     .unwrap();
///
/// logger.info("hello");
/// assert_eq!(lines.lock().unwrap().len(), 1);
/// ```
pub struct CallbackSink {
    name: String,
    output: OutputFn,
    valve: Valve,
    formatter: Formatter,
}

impl CallbackSink {
    pub fn new<F>(output: F) -> Self
    where
        F: FnMut(&str, &Record) + Send + Sync + 'static,
    {
        Self {
            name: "callback".to_string(),
            output: Box::new(output),
            valve: Arc::new(valve::always_open),
            formatter: Arc::new(formatter::simple),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_valve(mut self, valve: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.valve = Arc::new(valve);
        self
    }

    #[must_use]
    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&Record) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }
}

impl Sink for CallbackSink {
    fn accepts(&self, record: &Record) -> bool {
        (self.valve)(record)
    }

    fn output(&mut self, record: &Record) -> Result<()> {
        let line = render(&self.formatter, record)?;
        (self.output)(&line, record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
