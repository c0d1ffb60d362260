//! Field keys, messages and defaults for the logging module.
//!
//! Keys follow the gRPC logging conventions so dashboards built for gRPC
//! services keep working against connect services.

// =============================================================================
// Field Keys
// =============================================================================

/// Wire protocol of the instrumented call.
pub const PROTOCOL_KEY: &str = "protocol";

/// Value of [`PROTOCOL_KEY`].
pub const PROTOCOL: &str = "connect";

/// `"server"` or `"client"`.
pub const COMPONENT_KEY: &str = "grpc.component";

/// Service half of the procedure path.
pub const SERVICE_KEY: &str = "grpc.service";

/// Method half of the procedure path.
pub const METHOD_KEY: &str = "grpc.method";

/// Stream type of the call.
pub const METHOD_TYPE_KEY: &str = "grpc.method_type";

/// Remote address, server role only.
pub const PEER_ADDRESS_KEY: &str = "peer.address";

/// Reporter creation time.
pub const START_TIME_KEY: &str = "grpc.start_time";

/// Call deadline, when the context carries one.
pub const REQUEST_DEADLINE_KEY: &str = "grpc.request.deadline";

/// Status code string on `finished call`.
pub const CODE_KEY: &str = "grpc.code";

/// Error display string.
pub const ERROR_KEY: &str = "grpc.error";

/// Default duration field: milliseconds as a JSON number.
pub const TIME_MS_KEY: &str = "grpc.time_ms";

/// Alternative duration field rendered as text.
pub const DURATION_KEY: &str = "grpc.duration";

/// Elapsed time on a received-payload line.
pub const RECV_DURATION_KEY: &str = "grpc.recv.duration";

/// Elapsed time on a sent-payload line.
pub const SEND_DURATION_KEY: &str = "grpc.send.duration";

/// Request payload.
pub const REQUEST_CONTENT_KEY: &str = "grpc.request.content";

/// Response payload.
pub const RESPONSE_CONTENT_KEY: &str = "grpc.response.content";

// =============================================================================
// Messages
// =============================================================================

/// First hook of a call.
pub const STARTED_CALL: &str = "started call";

/// Call completion.
pub const FINISHED_CALL: &str = "finished call";

/// Server received the request payload.
pub const REQUEST_RECEIVED: &str = "request received";

/// Client received the response payload.
pub const RESPONSE_RECEIVED: &str = "response received";

/// Client sent the request payload.
pub const REQUEST_SENT: &str = "request sent";

/// Server sent the response payload.
pub const RESPONSE_SENT: &str = "response sent";

// =============================================================================
// Defaults
// =============================================================================

/// RFC 3339 timestamp format in chrono strftime syntax.
pub const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// tracing target used by [`TracingLogger`](super::TracingLogger).
pub const TRACING_TARGET: &str = "rpc";

/// tracing target used by [`JsonLogger`](super::JsonLogger).
pub const JSON_TARGET: &str = "rpc_json";
