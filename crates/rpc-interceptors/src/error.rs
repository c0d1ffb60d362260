//! Status codes and error types for instrumented calls
//!
//! # Status Codes
//!
//! [`Code`] mirrors the connect/gRPC status code space, including `Ok`.
//! When serialized, codes become snake_case strings (`NotFound` becomes
//! `"not_found"`), the same form they take in log fields.
//!
//! # Example
//! ```rust,ignore
//! use rpc_interceptors::{Code, RpcError};
//!
//! let error = RpcError::new(Code::NotFound, "user not found");
//! let error = RpcError::not_found("user not found"); // Convenience method
//! assert_eq!(error.to_string(), "not_found: user not found");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outcome classification of a completed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    /// The call completed successfully
    Ok,
    /// The operation was cancelled, typically by the caller
    Canceled,
    /// Unknown error, or an error carrying no status of its own
    Unknown,
    /// The client specified an invalid argument
    InvalidArgument,
    /// The deadline expired before the operation could complete
    DeadlineExceeded,
    /// Some requested entity was not found
    NotFound,
    /// The entity the client tried to create already exists
    AlreadyExists,
    /// The caller lacks permission for the operation
    PermissionDenied,
    /// Some resource has been exhausted
    ResourceExhausted,
    /// The system is not in a state required for the operation
    FailedPrecondition,
    /// The operation was aborted, typically due to a concurrency issue
    Aborted,
    /// The operation was attempted past the valid range
    OutOfRange,
    /// The operation is not implemented or not supported
    Unimplemented,
    /// An internal invariant was broken
    Internal,
    /// The service is currently unavailable
    Unavailable,
    /// Unrecoverable data loss or corruption
    DataLoss,
    /// The request lacks valid authentication credentials
    Unauthenticated,
}

/// Every error code, in numeric order. `Code::Ok` is not an error and is excluded.
pub const ALL_CODES: [Code; 16] = [
    Code::Canceled,
    Code::Unknown,
    Code::InvalidArgument,
    Code::DeadlineExceeded,
    Code::NotFound,
    Code::AlreadyExists,
    Code::PermissionDenied,
    Code::ResourceExhausted,
    Code::FailedPrecondition,
    Code::Aborted,
    Code::OutOfRange,
    Code::Unimplemented,
    Code::Internal,
    Code::Unavailable,
    Code::DataLoss,
    Code::Unauthenticated,
];

impl Code {
    /// Returns the string representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
            Self::InvalidArgument => "invalid_argument",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::PermissionDenied => "permission_denied",
            Self::ResourceExhausted => "resource_exhausted",
            Self::FailedPrecondition => "failed_precondition",
            Self::Aborted => "aborted",
            Self::OutOfRange => "out_of_range",
            Self::Unimplemented => "unimplemented",
            Self::Internal => "internal",
            Self::Unavailable => "unavailable",
            Self::DataLoss => "data_loss",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// Returns the numeric wire value of the code.
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// Converts a numeric wire value into a code.
    ///
    /// Returns `None` for values outside the defined range.
    pub fn from_u32(value: u32) -> Option<Self> {
        if value == 0 {
            return Some(Self::Ok);
        }
        ALL_CODES.get(value as usize - 1).copied()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a call handler.
///
/// Carries the status [`Code`] that the logging policy classifies. The
/// instrumentation layer observes these errors but never alters them.
///
/// # Example
/// ```rust,ignore
/// use rpc_interceptors::{Code, RpcError};
///
/// let error = RpcError::new(Code::Unavailable, "upstream down")
///     .with_details(serde_json::json!({"upstream": "billing"}))
///     .with_cause("connection refused");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    /// Status code
    pub code: Code,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (JSON value)
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause, for debugging
    pub cause: Option<String>,
    end_of_stream: bool,
}

impl RpcError {
    /// Create a new error with code and message.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
            end_of_stream: false,
        }
    }

    /// The clean stream termination sentinel.
    ///
    /// Reporters treat it exactly like the absence of an error.
    pub fn end_of_stream() -> Self {
        Self {
            end_of_stream: true,
            ..Self::new(Code::Unknown, "EOF")
        }
    }

    /// Returns true for the clean stream termination sentinel.
    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Add a cause string for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    // Convenience constructors

    /// Create a `canceled` error.
    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(Code::Canceled, message)
    }

    /// Create an `unknown` error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Code::Unknown, message)
    }

    /// Create an `invalid_argument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    /// Create a `deadline_exceeded` error.
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    /// Create a `not_found` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    /// Create an `already_exists` error.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(Code::AlreadyExists, message)
    }

    /// Create a `permission_denied` error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(Code::PermissionDenied, message)
    }

    /// Create a `resource_exhausted` error.
    pub fn resource_exhausted(message: impl Into<String>) -> Self {
        Self::new(Code::ResourceExhausted, message)
    }

    /// Create a `failed_precondition` error.
    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(Code::FailedPrecondition, message)
    }

    /// Create an `aborted` error.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(Code::Aborted, message)
    }

    /// Create an `out_of_range` error.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(Code::OutOfRange, message)
    }

    /// Create an `unimplemented` error.
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(Code::Unimplemented, message)
    }

    /// Create an `internal` error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    /// Create an `unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    /// Create a `data_loss` error.
    pub fn data_loss(message: impl Into<String>) -> Self {
        Self::new(Code::DataLoss, message)
    }

    /// Create an `unauthenticated` error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(Code::Unauthenticated, message)
    }
}

impl From<std::io::Error> for RpcError {
    fn from(err: std::io::Error) -> Self {
        Self::unknown(err.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", err))
    }
}

impl Serialize for RpcError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("RpcError", 4)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;

        if let Some(ref details) = self.details {
            state.serialize_field("details", details)?;
        }

        if let Some(ref cause) = self.cause {
            state.serialize_field("cause", cause)?;
        }

        state.end()
    }
}

/// Result type alias for handler results.
pub type RpcResult<T> = Result<T, RpcError>;

/// Malformed field literal.
///
/// Raised when a flattened key/value sequence cannot be turned into
/// [`Fields`](crate::logging::Fields).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FieldsError {
    /// The sequence had an odd number of elements
    #[error("field literal has odd length {0}; keys and values must come in pairs")]
    OddLength(usize),
    /// A key position held something other than a string
    #[error("field key at position {index} is not a string")]
    NonStringKey {
        /// Position of the offending element in the flattened sequence
        index: usize,
    },
}
