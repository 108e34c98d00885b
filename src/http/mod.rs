//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, request span)
//!     → preflight.rs (OPTIONS answered locally, pipeline ends)
//!     → routing::target (TargetUrl from `?url=`)
//!     → request.rs (OutboundRequest: headers, URI, body)
//!     → forward.rs (fresh connection, stream request body)
//!     → response.rs (CORS overlay, stream response body)
//!     → Send to caller
//!
//! Any failure before the response head arrives:
//!     → error.rs (ProxyError → JSON body + CORS origin header)
//! ```

pub mod error;
pub mod forward;
pub mod preflight;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ProxyError, ProxyResult};
pub use forward::Forwarder;
pub use request::OutboundRequest;
pub use server::{AppState, HttpServer};
