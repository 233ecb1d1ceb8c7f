//! Severity definitions
//!
//! Severities are ordered from the most user-facing to the most verbose.
//! The discriminants are part of the public contract: valves compare them
//! directly, so they are never renumbered.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum Severity {
    // release band: user-facing
    Error = 0,
    Alert = 1,
    #[default]
    Info = 2,
    // debug band: internal
    Critical = 3,
    Warn = 4,
    Debug = 5,
    Trace = 6,
}

impl Severity {
    /// Every severity, in ascending order.
    pub const ALL: [Severity; 7] = [
        Severity::Error,
        Severity::Alert,
        Severity::Info,
        Severity::Critical,
        Severity::Warn,
        Severity::Debug,
        Severity::Trace,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Alert => "ALERT",
            Severity::Info => "INFO",
            Severity::Critical => "CRITICAL",
            Severity::Warn => "WARN",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// Fixed-width tag used by the built-in text formatters.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => " ERR",
            Severity::Alert => "ALRT",
            Severity::Info => "INFO",
            Severity::Critical => "CRIT",
            Severity::Warn => "WARN",
            Severity::Debug => " DBG",
            Severity::Trace => "TRCE",
        }
    }

    /// Whether this severity belongs to the user-facing release band.
    #[inline]
    pub fn is_release(&self) -> bool {
        *self <= Severity::Info
    }

    /// Whether this severity belongs to the internal debug band.
    #[inline]
    pub fn is_debug(&self) -> bool {
        !self.is_release()
    }

    pub fn color(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Error => Red,
            Severity::Alert => Magenta,
            Severity::Info => Green,
            Severity::Critical => BrightRed,
            Severity::Warn => Yellow,
            Severity::Debug => Cyan,
            Severity::Trace => BrightBlack,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ERROR" | "ERR" => Ok(Severity::Error),
            "ALERT" | "ALART" | "ALRT" => Ok(Severity::Alert),
            "INFO" => Ok(Severity::Info),
            "CRITICAL" | "CRIT" => Ok(Severity::Critical),
            "WARN" | "WARNING" => Ok(Severity::Warn),
            "DEBUG" | "DBG" => Ok(Severity::Debug),
            "TRACE" | "TRCE" => Ok(Severity::Trace),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}
