//! Request inspection and request IDs.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for every request
//! - Extract the host, decoded path and `go-get` marker used by vanity handling
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Incoming X-Request-ID values are kept and echoed back

use std::borrow::Cow;

use axum::http::header::{HeaderName, HeaderValue, HOST};
use axum::http::Request;
use percent_encoding::percent_decode_str;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use url::form_urlencoded;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Query parameter the go tool sets when fetching metadata.
pub const GO_GET_PARAM: &str = "go-get";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Layer assigning a request ID to requests that do not carry one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuidV4> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Accessors for request metadata used in logs.
pub trait RequestIdExt {
    /// The request ID, or `"unknown"` if none was assigned.
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// The host the client addressed: the Host header, or the URI authority for HTTP/2.
pub fn request_host<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
}

/// The percent-decoded request path, as mounts and submodules are declared.
///
/// Malformed escapes are kept literally; invalid UTF-8 is replaced.
pub fn request_path<B>(req: &Request<B>) -> Cow<'_, str> {
    percent_decode_str(req.uri().path()).decode_utf8_lossy()
}

/// True when the query string carries `go-get=1`.
///
/// Only the first `go-get` value counts.
pub fn is_tooling_request(query: Option<&str>) -> bool {
    query
        .and_then(|q| form_urlencoded::parse(q.as_bytes()).find(|(key, _)| key == GO_GET_PARAM))
        .is_some_and(|(_, value)| value == "1")
}
