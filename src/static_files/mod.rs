//! Static file serving subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (static listener)
//!     → handler.rs (method dispatch, path guard, index files)
//!     → mime.rs (content type by extension)
//!     → server.rs (CORS + cache + hardening headers on every response)
//! ```
//!
//! # Design Decisions
//! - Runs beside the proxy on its own listener; the two share nothing
//! - Root, index file and MIME table come from configuration

pub mod handler;
pub mod mime;
pub mod server;

pub use handler::StaticSite;
pub use mime::MimeTable;
pub use server::StaticServer;
