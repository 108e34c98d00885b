//! Static file server setup.
//!
//! A second Axum router bound to its own listener. Every response, including
//! errors, gets the CORS, cache-busting and hardening header set.

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::StaticFilesConfig;
use crate::http::server::request_span;
use crate::security::headers::static_headers;
use crate::static_files::handler::{serve, StaticSite};

/// HTTP server for static files.
pub struct StaticServer {
    router: Router,
    site: Arc<StaticSite>,
}

impl StaticServer {
    /// Create a static server for the given configuration.
    pub fn new(config: &StaticFilesConfig) -> Self {
        let site = Arc::new(StaticSite::new(config));
        let router = Self::build_router(site.clone());
        Self { router, site }
    }

    /// Build the router with the static header set applied to every response.
    pub fn build_router(site: Arc<StaticSite>) -> Router {
        let mut router = Router::new()
            .route("/", any(serve))
            .route("/{*path}", any(serve))
            .with_state(site);

        for (name, value) in static_headers() {
            router = router.layer(SetResponseHeaderLayer::overriding(name, value));
        }

        router.layer(TraceLayer::new_for_http().make_span_with(request_span))
    }

    /// Router for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.site.root().display(),
            "Static file server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Static file server stopped");
        Ok(())
    }
}
