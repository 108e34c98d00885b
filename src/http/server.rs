//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum Router for the proxy listener
//! - Wire up middleware (request span with request id)
//! - Run the pipeline: preflight → resolve → build → forward → relay
//! - Route every pre-response failure through the error mapper
//! - Record per-request metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::forward::Forwarder;
use crate::http::request::OutboundRequest;
use crate::http::{preflight, response};
use crate::net::ConnectorError;
use crate::observability::metrics;
use crate::routing::TargetUrl;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ConnectorError> {
        let state = AppState {
            forwarder: Forwarder::new()?,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Every path is handled the same way; only the query names the target.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
    }

    /// Router for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            configured = %self.config.listener.bind_address,
            "Proxy server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Span for one inbound request, tagged with a fresh request id.
pub fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        request_id = %uuid::Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    let request = match preflight::intercept(request) {
        Ok(response) => {
            metrics::record_request(&method, StatusCode::OK.as_u16(), "preflight", start_time);
            return response;
        }
        Err(request) => request,
    };

    let target = match TargetUrl::from_request_uri(request.uri()) {
        Ok(target) => target,
        Err(e) => {
            tracing::debug!(error = %e, "Target rejected");
            metrics::record_request(&method, e.status().as_u16(), e.kind(), start_time);
            return e.into_response();
        }
    };

    tracing::debug!(target_url = %target, "Forwarding request");

    let outbound = OutboundRequest::build(request, &target);
    match state.forwarder.forward(outbound).await {
        Ok(upstream) => {
            let status = upstream.status();
            tracing::debug!(target_url = %target, status = %status, "Relaying response");
            metrics::record_request(&method, status.as_u16(), "relayed", start_time);
            response::relay(upstream)
        }
        Err(e) => {
            metrics::record_request(&method, e.status().as_u16(), e.kind(), start_time);
            e.into_response()
        }
    }
}
