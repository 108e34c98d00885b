//! Response relay back to the caller.
//!
//! # Responsibilities
//! - Copy the target status verbatim
//! - Merge headers: CORS block first, target headers overlaid on top
//! - Stream the target body to the caller as it arrives
//!
//! # Design Decisions
//! - The body is wrapped, never collected; if the caller goes away the wrapped
//!   body is dropped and the outbound connection closes with it
//! - A target failure mid-body truncates the caller's response; nothing is
//!   buffered, so nothing can be retried

use axum::{body::Body, http::Response};
use hyper::body::Incoming;

use crate::security::headers::{overlay, relay_headers};

/// Turn the target's response into the caller-facing response.
pub fn relay(upstream: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = upstream.into_parts();
    parts.headers = overlay(relay_headers(), &parts.headers);
    Response::from_parts(parts, Body::new(body))
}
