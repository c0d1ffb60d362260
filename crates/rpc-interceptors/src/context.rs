//! Request-scoped context threaded through interceptors and handlers

use crate::logging::Fields;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Default)]
struct ContextInner {
    fields: Fields,
    deadline: Option<SystemTime>,
    peer: Option<SocketAddr>,
}

/// Per-call context.
///
/// Cloning is cheap. Setters return a new context and leave the original
/// untouched, so values seen by an outer interceptor never change under it.
///
/// ```rust,ignore
/// let ctx = Context::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_peer("10.0.0.7:51234".parse()?);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ambient log fields.
    pub fn fields(&self) -> &Fields {
        &self.inner.fields
    }

    /// Returns a context with the ambient fields replaced.
    ///
    /// Prefer [`inject_fields`](crate::logging::inject_fields), which merges.
    pub fn with_fields(&self, fields: Fields) -> Self {
        self.derive(|inner| inner.fields = fields)
    }

    /// Call deadline, if the caller set one.
    ///
    /// Informational only; nothing in this crate enforces it.
    pub fn deadline(&self) -> Option<SystemTime> {
        self.inner.deadline
    }

    /// Returns a context with the given deadline.
    pub fn with_deadline(&self, deadline: SystemTime) -> Self {
        self.derive(|inner| inner.deadline = Some(deadline))
    }

    /// Returns a context whose deadline is `timeout` from now.
    ///
    /// A timeout too large to represent (such as `Duration::MAX`) means no
    /// deadline, so the current one is kept.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match SystemTime::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Remote address of the other party, when the transport knows it.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.inner.peer
    }

    /// Returns a context with the peer address set.
    pub fn with_peer(&self, peer: SocketAddr) -> Self {
        self.derive(|inner| inner.peer = Some(peer))
    }

    fn derive(&self, f: impl FnOnce(&mut ContextInner)) -> Self {
        let mut inner = (*self.inner).clone();
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }
}
