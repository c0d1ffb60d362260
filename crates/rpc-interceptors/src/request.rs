//! Request types seen by interceptors

use crate::callmeta::{Role, StreamType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static description of the procedure being called.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Raw procedure path, normally `/service/method`
    pub procedure: String,
    /// Message exchange shape
    pub stream_type: StreamType,
    /// Local role for this call
    pub role: Role,
}

impl Descriptor {
    /// Describes a unary procedure.
    pub fn new(procedure: impl Into<String>, role: Role) -> Self {
        Self {
            procedure: procedure.into(),
            stream_type: StreamType::Unary,
            role,
        }
    }

    /// Sets the stream type.
    pub fn with_stream_type(mut self, stream_type: StreamType) -> Self {
        self.stream_type = stream_type;
        self
    }
}

/// Request headers with case-insensitive names.
///
/// Names are stored lower-cased; later inserts replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    /// Gets a header value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true if the header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no headers are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A single call as handed to interceptors and handlers.
#[derive(Clone, Debug)]
pub struct Request {
    /// Procedure descriptor
    pub descriptor: Descriptor,
    /// Request headers
    pub headers: Headers,
    /// Input data as JSON
    pub input: serde_json::Value,
}

impl Request {
    /// Creates a request with no headers.
    pub fn new(descriptor: Descriptor, input: serde_json::Value) -> Self {
        Self {
            descriptor,
            headers: Headers::new(),
            input,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Raw procedure path.
    pub fn procedure(&self) -> &str {
        &self.descriptor.procedure
    }

    /// Local role for this call.
    pub fn role(&self) -> Role {
        self.descriptor.role
    }
}

/// Response type (JSON value)
pub type Response = serde_json::Value;
