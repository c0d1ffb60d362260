//! Default status and severity policy
//!
//! Server and client roles classify the same code differently. A server that
//! hits `Internal` has a bug to fix, so it logs at Error. A client that
//! receives `Internal` did nothing wrong and only logs a warning.

use super::constants::{DURATION_KEY, RFC3339, TIME_MS_KEY};
use super::fields::Fields;
use super::types::Level;
use crate::callmeta::Role;
use crate::error::{Code, RpcError};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::time::{Duration, SystemTime};

// =============================================================================
// Code to Level
// =============================================================================

/// Default severity for a code on the server side. Unlisted codes, `Ok`
/// included, log at Error.
pub fn default_server_code_to_level(code: Code) -> Level {
    match code {
        Code::NotFound
        | Code::Canceled
        | Code::AlreadyExists
        | Code::InvalidArgument
        | Code::Unauthenticated => Level::Info,

        Code::DeadlineExceeded
        | Code::PermissionDenied
        | Code::ResourceExhausted
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange
        | Code::Unavailable => Level::Warn,

        Code::Unknown | Code::Unimplemented | Code::Internal | Code::DataLoss => Level::Error,

        _ => Level::Error,
    }
}

/// Default severity for a code on the client side. Unlisted codes log at Info.
pub fn default_client_code_to_level(code: Code) -> Level {
    match code {
        Code::Canceled
        | Code::InvalidArgument
        | Code::NotFound
        | Code::AlreadyExists
        | Code::ResourceExhausted
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange => Level::Debug,

        Code::Unimplemented | Code::Internal | Code::Unavailable | Code::DataLoss => Level::Warn,

        _ => Level::Info,
    }
}

/// Picks the default table for `role`.
pub fn default_code_to_level(code: Code, role: Role) -> Level {
    match role {
        Role::Server => default_server_code_to_level(code),
        Role::Client => default_client_code_to_level(code),
    }
}

/// Default error classification: the code the error carries.
pub fn default_error_to_code(err: &RpcError) -> Code {
    err.code
}

// =============================================================================
// Duration Fields
// =============================================================================

/// `grpc.time_ms` as a number of milliseconds with microsecond precision.
pub fn duration_to_time_millis_fields(duration: Duration) -> Fields {
    let millis = duration.as_micros() as f64 / 1000.0;
    Fields::new().field(TIME_MS_KEY, millis)
}

/// `grpc.duration` as text, e.g. `"1.5ms"`.
pub fn duration_to_duration_field(duration: Duration) -> Fields {
    Fields::new().field(DURATION_KEY, format!("{:?}", duration))
}

// =============================================================================
// Timestamps
// =============================================================================

/// Formats `time` in UTC with a chrono strftime string.
///
/// A format chrono rejects falls back to RFC 3339 rather than failing the
/// log line. [`LogConfig::validate`](super::LogConfig::validate) catches
/// such formats at setup.
pub fn format_timestamp(time: SystemTime, format: &str) -> String {
    let time: DateTime<Utc> = time.into();
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_ok() {
        return out;
    }

    tracing::warn!(format = %format, "invalid timestamp format, using RFC 3339");
    out.clear();
    // RFC3339 is a fixed valid format
    let _ = write!(out, "{}", time.format(RFC3339));
    out
}
