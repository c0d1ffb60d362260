//! Call identity derived from a procedure descriptor

use crate::request::Descriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for service and method when a procedure path has no separator.
pub const UNKNOWN: &str = "unknown";

/// Shape of the call's message exchange.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    /// Single request, single response
    #[default]
    Unary,
    /// Streamed requests, single response
    ClientStream,
    /// Single request, streamed responses
    ServerStream,
    /// Streams in both directions
    BidiStream,
}

impl StreamType {
    /// Returns the string form used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unary => "unary",
            Self::ClientStream => "client_stream",
            Self::ServerStream => "server_stream",
            Self::BidiStream => "bidi_stream",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the call the local process is on.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The local process issued the call
    Client,
    /// The local process is handling the call
    Server,
}

impl Role {
    /// Returns true for the client role.
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client)
    }

    /// Returns the string form used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a `/service/method` path into its two halves.
///
/// A single leading `/` is ignored and the split happens at the first
/// remaining `/`. Paths without a separator yield `("unknown", "unknown")`.
pub fn split_full_method(full_method: &str) -> (&str, &str) {
    let trimmed = full_method.strip_prefix('/').unwrap_or(full_method);
    match trimmed.split_once('/') {
        Some((service, method)) => (service, method),
        None => (UNKNOWN, UNKNOWN),
    }
}

/// Identity of a single call.
///
/// Built once when the call starts and never recomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct CallMeta {
    /// Service half of the procedure path
    pub service: String,
    /// Method half of the procedure path
    pub method: String,
    /// Message exchange shape
    pub stream_type: StreamType,
    /// Local role
    pub role: Role,
    /// Request payload, when one is available at call start
    pub req_or_nil: Option<serde_json::Value>,
}

impl CallMeta {
    /// Derives call identity from a descriptor and an optional request payload.
    pub fn new(descriptor: &Descriptor, req_or_nil: Option<serde_json::Value>) -> Self {
        let (service, method) = split_full_method(&descriptor.procedure);
        Self {
            service: service.to_string(),
            method: method.to_string(),
            stream_type: descriptor.stream_type,
            role: descriptor.role,
            req_or_nil,
        }
    }

    /// Returns true when the local process is the client.
    pub fn is_client(&self) -> bool {
        self.role.is_client()
    }

    /// Reconstructs the canonical `/service/method` path.
    pub fn full_method(&self) -> String {
        format!("/{}/{}", self.service, self.method)
    }
}
