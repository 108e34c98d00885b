//! Outbound connector construction.
//!
//! # Responsibilities
//! - Build a connector that speaks plain TCP for `http` targets and TLS for
//!   `https` targets
//! - Pin the TLS crypto provider explicitly instead of relying on a
//!   process-wide default
//!
//! # Design Decisions
//! - Server certificates are verified against the bundled webpki roots
//! - Only HTTP/1.1 is negotiated; the forwarded request is always HTTP/1.1

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

/// Connector used for every outbound leg.
pub type UpstreamConnector = HttpsConnector<HttpConnector>;

/// Error type for connector construction.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

/// Build the scheme-aware outbound connector.
pub fn build_connector() -> Result<UpstreamConnector, ConnectorError> {
    let provider = rustls::crypto::ring::default_provider();

    let mut http = HttpConnector::new();
    // hyper-rustls decides the scheme; the inner connector must accept https URIs.
    http.enforce_http(false);
    http.set_nodelay(true);

    let connector = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(provider)?
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    tracing::debug!("Outbound connector ready (http + https)");
    Ok(connector)
}
