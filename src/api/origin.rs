//! Same-origin guard
//!
//! The widget serves files from the local disk, so only the page it serves
//! may drive it. Browsers attach `Origin` to cross-origin fetches and to
//! every non-GET request; a request whose origin is not this server's own
//! host is refused before it reaches a handler. Requests without `Origin`
//! (same-origin GETs, media elements, curl) pass through.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::responses::ApiError;

/// Reject requests whose `Origin` does not name the `Host` they were sent to
pub async fn reject_cross_origin(request: Request, next: Next) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !is_same_origin(origin, request.headers()) {
            warn!(
                "Rejected cross-origin {} {} from {:?}",
                request.method(),
                request.uri().path(),
                origin
            );
            return ApiError::new(StatusCode::FORBIDDEN, "Cross-origin requests are not allowed")
                .into_response();
        }
    }
    next.run(request).await
}

fn is_same_origin(origin: &str, headers: &HeaderMap) -> bool {
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    // `Origin: null` (sandboxed frames, file:// pages) has no authority
    let Some((scheme, authority)) = origin.split_once("://") else {
        return false;
    };
    matches!(scheme, "http" | "https") && authority.eq_ignore_ascii_case(host)
}
