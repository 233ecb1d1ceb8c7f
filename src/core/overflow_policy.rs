//! Overflow policies for bounded buffers
//!
//! A bounded ring never blocks and never retries a push on its own. When it
//! rejects a record the [`Logger`](crate::Logger) applies one of these
//! policies.

use std::fmt;
use std::sync::Arc;

/// What the logger does with a record its buffer rejected
///
/// # Example
///
/// ```
/// use sluice::OverflowPolicy;
///
/// // Default behavior: alert and drop
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the record silently; only metrics are updated.
    DropNewest,

    /// Drop the record, alerting on stderr and through the overflow callback
    /// on the first drop and every 1000th thereafter.
    #[default]
    AlertAndDrop,

    /// Drain the buffer on the calling thread, then retry the push once.
    /// The record is dropped (with an alert) if the retry fails as well.
    ///
    /// This applies backpressure to the producer: it pays for delivery.
    FlushAndRetry,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
            OverflowPolicy::FlushAndRetry => write!(f, "FlushAndRetry"),
        }
    }
}

/// Callback type for overflow notifications
///
/// The parameter is the total count of dropped records so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
