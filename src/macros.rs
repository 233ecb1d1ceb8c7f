//! Logging macros for ergonomic message formatting.
//!
//! The release-band macros (`error!`, `alert!`, `info!`) store the message
//! only. The debug-band macros (`critical!`, `warn!`, `debug!`, `trace!`)
//! also capture the call site as an [`Origin`](crate::Origin).
//!
//! # Examples
//!
//! ```
//! use sluice::prelude::*;
//! use sluice::{debug, info};
//!
//! let logger = Logger::synchronous();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! debug!(logger, "Server listening on port {}", port);
//! ```

/// Build an [`Origin`](crate::Origin) for the current call site.
#[macro_export]
macro_rules! origin {
    () => {
        $crate::Origin::new(file!(), line!(), module_path!())
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use sluice::prelude::*;
/// # let logger = Logger::synchronous();
/// use sluice::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log a message with automatic formatting and the call site attached.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_at($crate::origin!(), $severity, format!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Alert, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a critical internal error with its call site.
///
/// # Examples
///
/// ```
/// # use sluice::prelude::*;
/// # let logger = Logger::synchronous();
/// use sluice::critical;
/// critical!(logger, "invariant broken: {} > {}", 3, 2);
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Critical, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Trace, $($arg)+)
    };
}

/// Time the rest of the enclosing block.
///
/// # Examples
///
/// ```
/// # use sluice::prelude::*;
/// # let logger = Logger::asynchronous();
/// use sluice::time_scope;
/// {
///     time_scope!(logger, "rebuild index");
///     // ... work ...
/// }
/// assert_eq!(logger.flush(), 2);
/// ```
#[macro_export]
macro_rules! time_scope {
    ($logger:expr, $title:expr) => {
        let _sluice_scoped_timer = $logger.timer($title);
    };
    ($logger:expr, $title:expr, $severity:expr) => {
        let _sluice_scoped_timer = $logger.timer_at($title, $severity);
    };
}
