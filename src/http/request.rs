//! Outbound request construction.
//!
//! # Responsibilities
//! - Copy method and headers from the inbound request
//! - Replace `Host` with the target authority, drop `Connection`
//! - Point the URI at the target path and query
//! - Hand the inbound body through unread for body-carrying methods
//!
//! # Design Decisions
//! - No I/O and no failure path: a bad header surfaces as a transport error
//! - GET, HEAD, DELETE and PROPFIND are forwarded without a body, and without
//!   the framing headers that would announce one

use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING},
        HeaderMap, HeaderValue, Method, Request, Uri,
    },
};

use crate::routing::TargetUrl;
use crate::security::headers::strip_hop_by_hop;

/// Returns true for methods forwarded without a body.
pub fn is_bodyless(method: &Method) -> bool {
    matches!(method.as_str(), "GET" | "HEAD" | "DELETE" | "PROPFIND")
}

/// A request ready to be sent to the target.
pub struct OutboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// `None` for body-less methods.
    pub body: Option<Body>,
}

impl OutboundRequest {
    /// Derive the outbound request from the inbound one.
    pub fn build(inbound: Request<Body>, target: &TargetUrl) -> Self {
        let (parts, body) = inbound.into_parts();
        let method = parts.method;
        let mut headers = parts.headers;

        strip_hop_by_hop(&mut headers);
        headers.remove(HOST);
        // An unrepresentable authority is left unset; the client then derives
        // Host from the URI, which fails the same way if it is invalid.
        if let Ok(host) = HeaderValue::from_str(&target.authority()) {
            headers.insert(HOST, host);
        }

        let body = if is_bodyless(&method) {
            headers.remove(CONTENT_LENGTH);
            headers.remove(TRANSFER_ENCODING);
            None
        } else {
            Some(body)
        };

        // Only fails on characters `http` rejects but `url` let through. The
        // client refuses a relative URI, so the defect becomes a 502.
        let uri = target
            .to_string()
            .parse::<Uri>()
            .unwrap_or_else(|_| Uri::from_static("/"));

        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Convert into a hyper request carrying the streamed body.
    pub fn into_request(self) -> Request<Body> {
        let mut request = Request::new(self.body.unwrap_or_else(Body::empty));
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}
