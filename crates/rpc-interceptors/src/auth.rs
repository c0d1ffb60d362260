//! Authorization header parsing
//!
//! Extracts the credential from an `authorization: <scheme> <credential>`
//! header. The scheme is matched case-insensitively (RFC 2617, section 1.2).
//! Deciding whether the credential is any good is left to the caller.
//!
//! ```rust,ignore
//! use rpc_interceptors::auth;
//!
//! async fn whoami(ctx: Context, req: Request) -> RpcResult<Response> {
//!     let token = auth::from_request(&req, "bearer")?;
//!     let user = sessions.lookup(token).await?;
//!     Ok(serde_json::json!({ "user": user }))
//! }
//! ```

use crate::error::{RpcError, RpcResult};
use crate::request::Request;

/// Header carrying the credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Extracts the credential for `expected_scheme` from a raw header value.
///
/// # Errors
///
/// Returns an `unauthenticated` error when the header is missing or empty,
/// has no space between scheme and credential, or names another scheme.
pub fn from_header<'a>(header: Option<&'a str>, expected_scheme: &str) -> RpcResult<&'a str> {
    let header = match header {
        Some(header) if !header.is_empty() => header,
        _ => return Err(unauthenticated_with(expected_scheme)),
    };

    let Some((scheme, credential)) = header.split_once(' ') else {
        return Err(RpcError::unauthenticated("bad authorization string"));
    };

    if !scheme.eq_ignore_ascii_case(expected_scheme) {
        return Err(unauthenticated_with(expected_scheme));
    }

    Ok(credential)
}

/// Extracts the credential for `expected_scheme` from the request's
/// `authorization` header.
///
/// # Errors
///
/// See [`from_header`].
pub fn from_request<'a>(req: &'a Request, expected_scheme: &str) -> RpcResult<&'a str> {
    from_header(req.headers.get(AUTHORIZATION_HEADER), expected_scheme)
}

fn unauthenticated_with(scheme: &str) -> RpcError {
    RpcError::unauthenticated(format!("request unauthenticated with {}", scheme))
}
