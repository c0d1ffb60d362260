//! Per-call reporting hooks
//!
//! A [`Reportable`] is the factory an interceptor holds. For every call it
//! produces a fresh [`Reporter`] bound to that call, plus the context the
//! handler should see. The reporter is owned by the task driving the call
//! and dropped when the call completes.

use crate::callmeta::CallMeta;
use crate::context::Context;
use crate::error::RpcError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Lifecycle hooks invoked around a single call.
///
/// Every hook is called at most once per call by the unary interceptor.
/// `post_call` is always last and always called.
#[async_trait]
pub trait Reporter: Send {
    /// Called once when the call completes, with the final error.
    async fn post_call(&mut self, err: Option<&RpcError>, duration: Duration);

    /// Called after a message has been sent.
    async fn post_msg_send(
        &mut self,
        payload: Option<&Value>,
        err: Option<&RpcError>,
        duration: Duration,
    );

    /// Called after a message has been received.
    async fn post_msg_receive(
        &mut self,
        payload: Option<&Value>,
        err: Option<&RpcError>,
        duration: Duration,
    );
}

/// A reporter that ignores every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

#[async_trait]
impl Reporter for NoopReporter {
    async fn post_call(&mut self, _err: Option<&RpcError>, _duration: Duration) {}

    async fn post_msg_send(
        &mut self,
        _payload: Option<&Value>,
        _err: Option<&RpcError>,
        _duration: Duration,
    ) {
    }

    async fn post_msg_receive(
        &mut self,
        _payload: Option<&Value>,
        _err: Option<&RpcError>,
        _duration: Duration,
    ) {
    }
}

/// Produces a reporter for each call.
///
/// Implemented for closures of the matching shape:
///
/// ```rust,ignore
/// let reportable = |ctx: &Context, _meta: CallMeta| -> (Box<dyn Reporter>, Context) {
///     (Box::new(NoopReporter), ctx.clone())
/// };
/// let interceptor = unary_interceptor(reportable);
/// ```
pub trait Reportable: Send + Sync {
    /// Builds the reporter for `meta` and the context passed to the handler.
    fn reporter(&self, ctx: &Context, meta: CallMeta) -> (Box<dyn Reporter>, Context);
}

impl<F> Reportable for F
where
    F: Fn(&Context, CallMeta) -> (Box<dyn Reporter>, Context) + Send + Sync,
{
    fn reporter(&self, ctx: &Context, meta: CallMeta) -> (Box<dyn Reporter>, Context) {
        self(ctx, meta)
    }
}

/// Call identity plus the instant the call started.
#[derive(Debug, Clone)]
pub struct Report {
    /// Call identity
    pub call_meta: CallMeta,
    /// Monotonic start time
    pub start: Instant,
}

impl Report {
    /// Starts timing a call.
    pub fn new(call_meta: CallMeta) -> Self {
        Self {
            call_meta,
            start: Instant::now(),
        }
    }

    /// Time since the call started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
