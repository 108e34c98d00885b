//! Header manipulation and CORS header blocks.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers from requests crossing the proxy boundary
//! - Build the permissive CORS blocks for preflight, relayed and error responses
//! - Define the cache and hardening headers attached to static responses
//!
//! # Design Decisions
//! - CORS is permissive: the allowed origin is always `*`, no `Origin` check
//! - Header blocks are built as `HeaderMap` so callers can overlay or merge them

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, CACHE_CONTROL, CONNECTION,
        EXPIRES, PRAGMA, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
    },
    HeaderMap, HeaderName, HeaderValue,
};

/// Methods advertised to cross-origin callers of the proxy.
pub const PROXY_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, PROPFIND, HEAD, OPTIONS";

/// Request headers advertised to cross-origin callers of the proxy.
pub const PROXY_ALLOW_HEADERS: &str = "Content-Type, Authorization, Depth, User-Agent";

/// Preflight cache lifetime in seconds (one day).
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Methods advertised by the static file server.
pub const STATIC_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers advertised by the static file server.
pub const STATIC_ALLOW_HEADERS: &str = "Content-Type";

/// Headers attached to every response served by the proxy for a preflight request.
pub fn preflight_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(PROXY_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PROXY_ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE));
    headers
}

/// Base header block for relayed responses, before target headers are overlaid.
pub fn relay_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(PROXY_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PROXY_ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("*"));
    headers
}

/// Headers set on every static file response, in the order they are applied.
pub fn static_headers() -> Vec<(HeaderName, HeaderValue)> {
    vec![
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(STATIC_ALLOW_METHODS),
        ),
        (
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(STATIC_ALLOW_HEADERS),
        ),
        (
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ),
        (PRAGMA, HeaderValue::from_static("no-cache")),
        (EXPIRES, HeaderValue::from_static("0")),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
    ]
}

/// Remove hop-by-hop headers in place.
///
/// Only `Connection` is stripped: the two legs never share a connection, so
/// its directives cannot apply to the outbound one.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    headers.remove(CONNECTION);
}

/// Overlay `upstream` onto `base`.
///
/// Every key present in `upstream` replaces all values `base` held for it;
/// repeated upstream values are kept in order.
pub fn overlay(mut base: HeaderMap, upstream: &HeaderMap) -> HeaderMap {
    for name in upstream.keys() {
        base.remove(name);
    }
    for (name, value) in upstream.iter() {
        base.append(name.clone(), value.clone());
    }
    base
}
