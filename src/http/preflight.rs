//! CORS preflight short-circuit.
//!
//! `OPTIONS` requests are answered locally with the CORS header block and an
//! empty body. No target is resolved and no connection is opened.

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
};

use crate::security::headers::preflight_headers;

/// Answer `request` if it is a preflight, otherwise hand it back.
pub fn intercept(request: Request<Body>) -> Result<Response<Body>, Request<Body>> {
    if request.method() != Method::OPTIONS {
        return Err(request);
    }

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    *response.headers_mut() = preflight_headers();
    Ok(response)
}
