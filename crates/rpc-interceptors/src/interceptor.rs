//! Handler and interceptor function types
//!
//! A handler ([`Next`]) answers a call. An interceptor ([`InterceptorFn`])
//! receives the call together with the handler it wraps and decides when to
//! invoke it.

use crate::context::Context;
use crate::error::RpcResult;
use crate::request::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by handlers and interceptors.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Next function in the interceptor chain (ultimately the call handler)
pub type Next = Arc<dyn Fn(Context, Request) -> BoxFuture<RpcResult<Response>> + Send + Sync>;

/// Interceptor function type
pub type InterceptorFn =
    Arc<dyn Fn(Context, Request, Next) -> BoxFuture<RpcResult<Response>> + Send + Sync>;

/// Trait for implementing custom interceptors
pub trait Interceptor: Send + Sync {
    /// Process the call, optionally invoking next
    fn intercept(&self, ctx: Context, req: Request, next: Next) -> BoxFuture<RpcResult<Response>>;
}

/// Lets async closures and functions act as interceptors.
///
/// ```rust,ignore
/// async fn timing(ctx: Context, req: Request, next: Next) -> RpcResult<Response> {
///     let start = std::time::Instant::now();
///     let result = next(ctx, req).await;
///     tracing::debug!(elapsed = ?start.elapsed(), "call done");
///     result
/// }
/// ```
impl<F, Fut> Interceptor for F
where
    F: Fn(Context, Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcResult<Response>> + Send + 'static,
{
    fn intercept(&self, ctx: Context, req: Request, next: Next) -> BoxFuture<RpcResult<Response>> {
        Box::pin(self(ctx, req, next))
    }
}

/// Create an interceptor from an async function
pub fn from_fn<F, Fut>(f: F) -> InterceptorFn
where
    F: Fn(Context, Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcResult<Response>> + Send + 'static,
{
    Arc::new(move |ctx, req, next| Box::pin(f(ctx, req, next)))
}

/// Create a handler from an async function
///
/// ```rust,ignore
/// let handler = handler_fn(|_ctx, req: Request| async move {
///     Ok(serde_json::json!({ "echo": req.input }))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Next
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcResult<Response>> + Send + 'static,
{
    Arc::new(move |ctx, req| Box::pin(f(ctx, req)))
}

/// Compose interceptors around a handler.
///
/// The first interceptor in the list is the outermost one.
///
/// ```rust,ignore
/// // Given interceptors [I1, I2, I3] and handler H:
/// // Execution order: I1 → I2 → I3 → H → I3 → I2 → I1
/// let handler = chain(vec![i1, i2, i3], h);
/// ```
pub fn chain(interceptors: Vec<InterceptorFn>, handler: Next) -> Next {
    interceptors
        .into_iter()
        .rev()
        .fold(handler, |next, interceptor| {
            Arc::new(move |ctx, req| {
                let interceptor = interceptor.clone();
                let next = next.clone();
                Box::pin(async move { (interceptor)(ctx, req, next).await })
            })
        })
}
