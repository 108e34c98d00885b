//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest
//!     → connector.rs (scheme-aware connect: TCP, or TCP + TLS)
//!     → one fresh connection per proxied request
//! ```
//!
//! # Design Decisions
//! - No connection pooling: idle connections are never kept
//! - TLS is client-side only, following the target's scheme

pub mod connector;

pub use connector::{build_connector, ConnectorError, UpstreamConnector};
