//! Structured call logging
//!
//! Logs each unary call as a short sequence of lines: `started call`,
//! optional payload lines, and `finished call` with the status code, the
//! error if any, and the elapsed time. Lines go to any [`Logger`]; this
//! crate ships a tracing backend and a JSON backend.
//!
//! # Architecture
//!
//! - **fields**: ordered key/value container and context propagation
//! - **types**: `Level`, `LoggableEvent`
//! - **constants**: field keys, messages and defaults
//! - **policy**: default code to level tables and duration rendering
//! - **config**: `LogConfig` builder and file-friendly `LogSettings`
//! - **logger**: async `Logger` trait and implementations
//! - **reporter**: the per-call reporter and its factory
//!
//! # Severity
//!
//! A call without an error logs at Info. Otherwise the error's status code
//! picks the level, from a table that depends on which side of the call
//! this process is on:
//!
//! | code | server | client |
//! |---|---|---|
//! | `not_found`, `canceled`, `already_exists`, `invalid_argument` | Info | Debug |
//! | `unauthenticated` | Info | Info |
//! | `deadline_exceeded`, `permission_denied` | Warn | Info |
//! | `resource_exhausted`, `failed_precondition`, `aborted`, `out_of_range` | Warn | Debug |
//! | `unavailable` | Warn | Warn |
//! | `unknown` | Error | Info |
//! | `unimplemented`, `internal`, `data_loss` | Error | Warn |
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use rpc_interceptors::logging::{unary_server_interceptor, LogConfig, TracingLogger};
//! use rpc_interceptors::chain;
//!
//! let logging = unary_server_interceptor(TracingLogger, LogConfig::new())?;
//! let handler = chain(vec![logging], get_user);
//! ```
//!
//! # Carrying Fields Downstream
//!
//! ```rust,ignore
//! use rpc_interceptors::logging::{extract_fields, inject_field};
//!
//! async fn get_user(ctx: Context, req: Request) -> RpcResult<Response> {
//!     // grpc.service, grpc.method and friends are already here
//!     let fields = extract_fields(&ctx);
//!     let ctx = inject_field(&ctx, "user.id", req.input["id"].clone());
//!     repo.load(ctx, &req.input).await
//! }
//! ```

// =============================================================================
// Submodules
// =============================================================================

mod config;
pub mod constants;
mod fields;
mod logger;
mod policy;
mod reporter;
mod types;

// =============================================================================
// Public API Re-exports
// =============================================================================

// Core Types
pub use types::{Level, LoggableEvent};

// Fields and Context Propagation
pub use fields::{Fields, Iter, extract_fields, inject_field, inject_fields};

// Configuration
pub use config::{
    CodeToLevel, ConfigValidationError, DurationFieldStyle, DurationToFields, ErrorToCode,
    FieldsFromContext, LogConfig, LogSettings,
};

// Policy
pub use policy::{
    default_client_code_to_level, default_code_to_level, default_error_to_code,
    default_server_code_to_level, duration_to_duration_field, duration_to_time_millis_fields,
    format_timestamp,
};

// Logger Trait and Implementations
pub use logger::{JsonLogger, Logger, LoggerFn, TracingLogger, logger_fn};

// Reporter
pub use reporter::{LoggingReportable, LoggingReporter, common_fields};

// Test utilities (only exported in test builds)
#[cfg(test)]
pub use logger::MockLogger;

use crate::interceptor::InterceptorFn;

/// Logging interceptor for the server side of unary calls.
///
/// # Errors
///
/// Returns the validation error when `config` is invalid.
pub fn unary_server_interceptor(
    logger: impl Logger + 'static,
    config: LogConfig,
) -> Result<InterceptorFn, ConfigValidationError> {
    config.validate()?;
    tracing::debug!(config = ?config, "building server logging interceptor");
    Ok(crate::unary::unary_server_interceptor(
        LoggingReportable::new(logger, config),
    ))
}

/// Logging interceptor for the client side of unary calls.
///
/// # Errors
///
/// Returns the validation error when `config` is invalid.
pub fn unary_client_interceptor(
    logger: impl Logger + 'static,
    config: LogConfig,
) -> Result<InterceptorFn, ConfigValidationError> {
    config.validate()?;
    tracing::debug!(config = ?config, "building client logging interceptor");
    Ok(crate::unary::unary_client_interceptor(
        LoggingReportable::new(logger, config),
    ))
}
