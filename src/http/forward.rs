//! Transport forwarding to the target.
//!
//! # Responsibilities
//! - Open one new outbound connection per request (pooling disabled)
//! - Send method, URI and headers, then stream the request body if any
//! - Classify every connect, DNS, TLS and I/O failure as `UpstreamUnavailable`
//!
//! # Design Decisions
//! - The inbound `Body` is handed to hyper as is; hyper polls it only as fast
//!   as the outbound socket accepts writes, which is the backpressure path
//! - No retries and no timeouts beyond the platform defaults

use axum::body::Body;
use axum::http::Response;
use hyper::body::Incoming;
use hyper_util::{client::legacy::Client, rt::TokioExecutor};

use crate::http::error::{ProxyError, ProxyResult};
use crate::http::request::OutboundRequest;
use crate::net::{build_connector, ConnectorError, UpstreamConnector};

/// Sends outbound requests over fresh connections.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<UpstreamConnector, Body>,
}

impl Forwarder {
    /// Create a forwarder with the scheme-aware connector.
    pub fn new() -> Result<Self, ConnectorError> {
        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build(build_connector()?);
        Ok(Self { client })
    }

    /// Send `outbound` and wait for the target's response head.
    ///
    /// The returned body is still streaming from the target.
    pub async fn forward(&self, outbound: OutboundRequest) -> ProxyResult<Response<Incoming>> {
        let uri = outbound.uri.clone();
        let request = outbound.into_request();

        self.client.request(request).await.map_err(|e| {
            tracing::warn!(target_uri = %uri, error = %e, "Upstream request failed");
            ProxyError::upstream(&e)
        })
    }
}
