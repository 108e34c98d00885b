//! Proxy error taxonomy and its mapping to caller-visible responses.
//!
//! Every failure before an upstream response arrives ends here. The mapped
//! response is always JSON and always carries `Access-Control-Allow-Origin: *`
//! so a browser caller can read the error body.

use axum::{
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that terminate a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The `url` query parameter is absent.
    #[error("Missing target URL. Use ?url=...")]
    MissingTarget,

    /// The `url` query parameter is not an absolute http(s) URL.
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    /// Connecting to or talking to the target failed.
    #[error("Proxy request failed: {0}")]
    UpstreamUnavailable(String),
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// JSON body of a mapped error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProxyError {
    /// Status code sent to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingTarget | ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::MissingTarget => "missing_target",
            ProxyError::InvalidTarget(_) => "invalid_target",
            ProxyError::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }

    /// JSON body sent to the caller.
    pub fn body(&self) -> ErrorBody {
        match self {
            ProxyError::MissingTarget => ErrorBody {
                error: "Missing target URL. Use ?url=...",
                message: None,
            },
            ProxyError::InvalidTarget(detail) => ErrorBody {
                error: "Invalid target URL",
                message: Some(detail.clone()),
            },
            ProxyError::UpstreamUnavailable(detail) => ErrorBody {
                error: "Proxy request failed",
                message: Some(detail.clone()),
            },
        }
    }

    /// Build an `UpstreamUnavailable` from an error and its whole source chain.
    ///
    /// Client errors from hyper only say "client error (Connect)" at the top
    /// level; the useful detail (refused, DNS, TLS) sits in the sources.
    pub fn upstream(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(inner) = source {
            detail.push_str(": ");
            detail.push_str(&inner.to_string());
            source = inner.source();
        }
        ProxyError::UpstreamUnavailable(detail)
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body())).into_response();
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        response
    }
}
