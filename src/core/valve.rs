//! Valves decide whether a sink accepts a record
//!
//! A valve is a pure predicate over a [`Record`]. It must be total over all
//! severities and free of side effects, since it runs on whichever thread is
//! draining the logger.

use super::{record::Record, severity::Severity};
use std::sync::Arc;

pub type Valve = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Accept everything.
pub fn always_open(_record: &Record) -> bool {
    true
}

/// Accept everything except the most verbose band.
pub fn exclude_trace(record: &Record) -> bool {
    record.severity != Severity::Trace
}

/// Accept only user-facing severities (error, alert, info).
pub fn release_only(record: &Record) -> bool {
    record.severity.is_release()
}

/// Accept only internal severities (critical, warn, debug, trace).
pub fn debug_only(record: &Record) -> bool {
    record.severity.is_debug()
}

/// Accept records up to and including `max` in the severity order.
pub fn at_most(max: Severity) -> impl Fn(&Record) -> bool + Clone + Send + Sync + 'static {
    move |record: &Record| record.severity <= max
}
