#![warn(missing_docs)]
//! # RPC Interceptors
//!
//! Instrumentation for RPC handlers: structured lifecycle logging with a
//! pluggable logger, plus authorization header parsing.
//!
//! ## Overview
//!
//! - **Call identity** parsed from the procedure path (`/service/method`)
//! - **Reporter hooks** invoked at fixed points around every call
//! - **Severity policy** that differs for client and server roles
//! - **Ordered log fields** carried through the request context
//! - **Logger backends** for `tracing` and JSON output
//!
//! ## Architecture
//!
//! ```text
//!  inbound call
//!       │
//!       ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │ unary interceptor                                        │
//! │   CallMeta::new(descriptor) ──► Reportable::reporter()   │
//! │                                      │                   │
//! │          ┌───────────────────────────┤                   │
//! │          ▼                           ▼                   │
//! │   post_msg_receive ──► handler ──► post_msg_send         │
//! │                                      │                   │
//! │                                      ▼                   │
//! │                                  post_call               │
//! └──────────────────────────────────────┼───────────────────┘
//!                                        ▼
//!                           Logger (tracing / JSON / custom)
//! ```
//!
//! The interceptor never changes what the handler returns. Logging is best
//! effort: a logger that panics is contained and the call carries on.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rpc_interceptors::prelude::*;
//!
//! let handler = handler_fn(|ctx: Context, req: Request| async move {
//!     let token = auth::from_request(&req, "bearer")?;
//!     Ok(serde_json::json!({ "token_len": token.len() }))
//! });
//!
//! let logging = logging::unary_server_interceptor(
//!     TracingLogger,
//!     LogConfig::new().with_log_on_events([
//!         LoggableEvent::StartCall,
//!         LoggableEvent::PayloadReceived,
//!         LoggableEvent::FinishCall,
//!     ]),
//! )?;
//!
//! let handler = chain(vec![logging], handler);
//! let req = Request::new(Descriptor::new("/users.v1.Users/Get", Role::Server), json!({"id": 1}))
//!     .with_header("authorization", "Bearer abc");
//! let response = handler(Context::new(), req).await?;
//! ```
//!
//! ## Custom Logger
//!
//! ```rust,ignore
//! let logger = logger_fn(|_ctx, level, msg, fields| {
//!     eprintln!("{level:>5} {msg} {fields}");
//! });
//! let logging = logging::unary_client_interceptor(logger, LogConfig::new())?;
//! ```

pub mod auth;
mod callmeta;
mod context;
mod error;
mod interceptor;
pub mod logging;
pub mod reporter;
mod request;
mod unary;

#[cfg(test)]
mod tests;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::json;
}

// Public API
pub use callmeta::{CallMeta, Role, StreamType, UNKNOWN, split_full_method};
pub use context::Context;
pub use error::{ALL_CODES, Code, FieldsError, RpcError, RpcResult};
pub use interceptor::{
    BoxFuture, Interceptor, InterceptorFn, Next, chain, from_fn, handler_fn,
};
pub use logging::{
    ConfigValidationError, Fields, JsonLogger, Level, LogConfig, LogSettings, LoggableEvent,
    Logger, TracingLogger, extract_fields, inject_field, inject_fields, logger_fn,
};
pub use reporter::{NoopReporter, Report, Reportable, Reporter};
pub use request::{Descriptor, Headers, Request, Response};
pub use unary::{unary_client_interceptor, unary_interceptor, unary_server_interceptor};

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use rpc_interceptors::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Calls
        CallMeta,
        Code,
        // Context
        Context,
        Descriptor,
        Fields,
        Headers,
        // Interceptors
        Interceptor,
        InterceptorFn,
        // Logging
        JsonLogger,
        Level,
        LogConfig,
        LoggableEvent,
        Logger,
        Next,
        Request,
        Response,
        Role,
        // Errors
        RpcError,
        RpcResult,
        StreamType,
        TracingLogger,
        chain,
        extract_fields,
        fields,
        from_fn,
        handler_fn,
        inject_field,
        inject_fields,
        logger_fn,
    };
    pub use crate::{auth, logging};
    pub use serde_json::json;
}
