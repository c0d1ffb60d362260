//! Core logging types
//!
//! - Level: the four log severities, ordered
//! - LoggableEvent: lifecycle points that may produce a log line

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log line.
///
/// Ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Debug information useful for development.
    Debug,
    /// General informational messages (default).
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for failures.
    Error,
}

impl Level {
    /// Returns the lowercase name of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Converts this log level to a tracing::Level.
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle point that can be individually switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggableEvent {
    /// First message hook of a call (`"started call"`)
    StartCall,
    /// Call completion (`"finished call"`)
    FinishCall,
    /// Payload line for a received message
    PayloadReceived,
    /// Payload line for a sent message
    PayloadSent,
}
