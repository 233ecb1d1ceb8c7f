//! Log record structure

use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;
use std::time::Instant;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn current_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Call-site information attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl Origin {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// File name without its directory components.
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// One log event.
///
/// Records are built once by the logging call and never mutated after they
/// are handed to a [`Logger`](crate::Logger).
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub instant: Instant,
    pub thread_id: String,
    pub thread_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl Record {
    /// Escape line breaks and tabs so a record always renders as one line.
    fn sanitize_message(message: &str) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message.to_string();
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(severity: Severity, message: impl AsRef<str>) -> Self {
        Self {
            severity,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Utc::now(),
            instant: Instant::now(),
            thread_id: current_thread_id(),
            thread_name: current_thread_name(),
            process_id: Some(std::process::id()),
            origin: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub fn without_process_id(mut self) -> Self {
        self.process_id = None;
        self
    }

    /// Thread name if the producing thread had one, its id otherwise.
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}
