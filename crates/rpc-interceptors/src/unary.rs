//! Unary call orchestration
//!
//! Drives a [`Reporter`](crate::reporter::Reporter) around one
//! request/response exchange. The handler's result is returned untouched.

use crate::callmeta::{CallMeta, Role};
use crate::context::Context;
use crate::error::RpcResult;
use crate::interceptor::{BoxFuture, InterceptorFn, Next};
use crate::reporter::{Report, Reportable};
use crate::request::{Request, Response};
use std::sync::Arc;

/// Reports every call through `reportable`, taking the role from each
/// request's descriptor.
///
/// Server role hook order:
/// 1. `post_msg_receive` with the request
/// 2. the handler
/// 3. `post_msg_send` with the response or error
/// 4. `post_call` with the error, always
///
/// The client role sends before it receives, so the request goes through
/// `post_msg_send` before the handler runs and the response through
/// `post_msg_receive` after it. `post_call` is still last.
pub fn unary_interceptor<R>(reportable: R) -> InterceptorFn
where
    R: Reportable + 'static,
{
    reporting_interceptor(reportable, None)
}

/// Like [`unary_interceptor`], with every call reported as server side.
pub fn unary_server_interceptor<R>(reportable: R) -> InterceptorFn
where
    R: Reportable + 'static,
{
    reporting_interceptor(reportable, Some(Role::Server))
}

/// Like [`unary_interceptor`], with every call reported as client side.
pub fn unary_client_interceptor<R>(reportable: R) -> InterceptorFn
where
    R: Reportable + 'static,
{
    reporting_interceptor(reportable, Some(Role::Client))
}

fn reporting_interceptor<R>(reportable: R, role: Option<Role>) -> InterceptorFn
where
    R: Reportable + 'static,
{
    let reportable = Arc::new(reportable);

    Arc::new(move |ctx: Context, req: Request, next: Next| -> BoxFuture<RpcResult<Response>> {
        let reportable = reportable.clone();
        Box::pin(async move {
            let mut call_meta = CallMeta::new(&req.descriptor, Some(req.input.clone()));
            if let Some(role) = role {
                call_meta.role = role;
            }
            let report = Report::new(call_meta);
            let role = report.call_meta.role;
            let (mut reporter, ctx) = reportable.reporter(&ctx, report.call_meta.clone());

            tracing::trace!(
                procedure = %req.procedure(),
                role = %role,
                "reporting call"
            );

            let result = match role {
                Role::Server => {
                    reporter
                        .post_msg_receive(Some(&req.input), None, report.elapsed())
                        .await;
                    let result = next(ctx, req).await;
                    reporter
                        .post_msg_send(result.as_ref().ok(), result.as_ref().err(), report.elapsed())
                        .await;
                    result
                }
                Role::Client => {
                    reporter
                        .post_msg_send(Some(&req.input), None, report.elapsed())
                        .await;
                    let result = next(ctx, req).await;
                    reporter
                        .post_msg_receive(
                            result.as_ref().ok(),
                            result.as_ref().err(),
                            report.elapsed(),
                        )
                        .await;
                    result
                }
            };

            reporter
                .post_call(result.as_ref().err(), report.elapsed())
                .await;
            result
        })
    })
}
